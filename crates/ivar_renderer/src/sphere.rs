//! Sphere primitive for ray tracing.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use ivar_math::{Interval, Vec3};
use std::sync::Arc;

/// A sphere primitive. The material is shared with any other surface using it.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(ray, root, outward_normal, self.material.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Color, Lambertian};

    const FORWARD: Interval = Interval::new(0.001, f32::INFINITY);

    fn gray_sphere(center: Vec3, radius: f32) -> Sphere {
        Sphere::new(center, radius, Arc::new(Lambertian::new(Color::splat(0.5))))
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = gray_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = sphere.hit(&ray, FORWARD).unwrap();
        assert!((rec.t - 0.5).abs() < 0.001); // Should hit at t=0.5
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_sphere_hit_distance_and_normal() {
        let center = Vec3::new(3.0, -2.0, 7.0);
        let radius = 1.5;
        let sphere = gray_sphere(center, radius);
        let origin = Vec3::new(-4.0, 1.0, -2.0);
        let ray = Ray::new(origin, (center - origin).normalize());

        let rec = sphere.hit(&ray, FORWARD).unwrap();

        let expected_t = (center - origin).length() - radius;
        assert!((rec.t - expected_t).abs() < 1e-4, "t={} expected {}", rec.t, expected_t);

        let expected_normal = (rec.p - center).normalize();
        assert!((rec.normal - expected_normal).length() < 1e-4);
        assert!((rec.normal.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_sphere_hit_translation_invariant() {
        let origin = Vec3::new(0.3, 0.1, 2.0);
        let direction = Vec3::new(-0.1, 0.05, -1.0);
        let center = Vec3::new(0.0, 0.0, -1.0);

        let sphere = gray_sphere(center, 0.8);
        let base = sphere.hit(&Ray::new(origin, direction), FORWARD).unwrap();

        for offset in [Vec3::new(5.0, 0.0, 0.0), Vec3::new(-2.0, 3.0, 1.0), Vec3::splat(-10.0)] {
            let moved = gray_sphere(center + offset, 0.8);
            let rec = moved.hit(&Ray::new(origin + offset, direction), FORWARD).unwrap();
            assert!((rec.t - base.t).abs() < 1e-4, "t={} vs {}", rec.t, base.t);
        }
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = gray_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.hit(&ray, FORWARD).is_none());
    }

    #[test]
    fn test_sphere_behind_ray_is_rejected() {
        let sphere = gray_sphere(Vec3::new(0.0, 0.0, 5.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(sphere.hit(&ray, FORWARD).is_none());
    }

    #[test]
    fn test_sphere_hit_from_inside_uses_far_root() {
        let sphere = gray_sphere(Vec3::ZERO, 2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let rec = sphere.hit(&ray, FORWARD).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-5);
        assert!(!rec.front_face);
        // Normal flipped to face the ray
        assert!((rec.normal - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_sphere_interval_upper_bound() {
        let sphere = gray_sphere(Vec3::new(0.0, 0.0, -10.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        assert!(sphere.hit(&ray, Interval::new(0.001, 8.0)).is_none());
        // Near root excluded, far root accepted
        let rec = sphere.hit(&ray, Interval::new(9.5, 20.0)).unwrap();
        assert!((rec.t - 11.0).abs() < 1e-4);
    }

    #[test]
    fn test_negative_radius_clamped() {
        let sphere = gray_sphere(Vec3::ZERO, -3.0);
        assert_eq!(sphere.radius, 0.0);
    }
}
