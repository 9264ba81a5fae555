//! Ray-surface intersection: the `Hittable` trait, hit records and the scene list.

use crate::{Material, Ray};
use ivar_math::{Interval, Vec3};

/// Record of a ray-object intersection.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal, oriented against the incoming ray
    pub normal: Vec3,
    /// Material at the intersection point, borrowed from the surface that was hit
    pub material: &'a dyn Material,
    /// Ray parameter of the intersection
    pub t: f32,
    /// Whether the ray arrived from outside the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build the record for a hit at `t` along `ray`.
    ///
    /// `outward_normal` must be unit length and point out of the surface; it is
    /// flipped when the ray arrives from inside.
    pub fn new(ray: &Ray, t: f32, outward_normal: Vec3, material: &'a dyn Material) -> Self {
        let (front_face, normal) = face_normal(ray, outward_normal);
        Self {
            p: ray.at(t),
            normal,
            material,
            t,
            front_face,
        }
    }
}

/// Orient `outward_normal` against `ray`, reporting whether the ray hit the front face.
pub fn face_normal(ray: &Ray, outward_normal: Vec3) -> (bool, Vec3) {
    let front_face = ray.direction().dot(outward_normal) < 0.0;
    let normal = if front_face { outward_normal } else { -outward_normal };
    (front_face, normal)
}

/// Anything a ray can intersect.
pub trait Hittable: Send + Sync {
    /// Closest intersection with `t` strictly inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;
}

/// The scene: a flat list of surfaces searched linearly for the closest hit.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
}

impl HittableList {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Hittable + 'static> FromIterator<H> for HittableList {
    fn from_iter<I: IntoIterator<Item = H>>(iter: I) -> Self {
        Self {
            objects: iter
                .into_iter()
                .map(|object| Box::new(object) as Box<dyn Hittable>)
                .collect(),
        }
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // Each accepted hit shrinks the search range for the rest
        self.objects.iter().fold(None::<HitRecord<'_>>, |closest, object| {
            let max = closest.map_or(ray_t.max, |rec| rec.t);
            object.hit(ray, ray_t.with_max(max)).or(closest)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian, Sphere};
    use std::sync::Arc;

    const FORWARD: Interval = Interval::new(0.001, f32::INFINITY);

    fn sphere_at(z: f32, radius: f32) -> Sphere {
        Sphere::new(
            Vec3::new(0.0, 0.0, z),
            radius,
            Arc::new(Lambertian::new(Color::splat(0.5))),
        )
    }

    #[test]
    fn test_face_normal_front() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(face_normal(&ray, Vec3::Z), (true, Vec3::Z));
    }

    #[test]
    fn test_face_normal_back() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(face_normal(&ray, Vec3::NEG_Z), (false, Vec3::Z));
    }

    #[test]
    fn test_hit_record_new_evaluates_ray() {
        let material = Lambertian::new(Color::ONE);
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -2.0));
        let rec = HitRecord::new(&ray, 1.5, Vec3::Z, &material);

        assert_eq!(rec.p, Vec3::new(1.0, 0.0, -3.0));
        assert_eq!(rec.t, 1.5);
        assert!(rec.front_face);
    }

    #[test]
    fn test_empty_list_misses() {
        let world = HittableList::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(world.is_empty());
        assert!(world.hit(&ray, FORWARD).is_none());
    }

    #[test]
    fn test_list_reports_closest_hit_regardless_of_order() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        // Far sphere first, near sphere second
        let mut world = HittableList::new();
        world.add(Box::new(sphere_at(-10.0, 1.0)));
        world.add(Box::new(sphere_at(-3.0, 1.0)));
        assert_eq!(world.len(), 2);

        let rec = world.hit(&ray, FORWARD).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-5);

        // Near sphere first
        let world: HittableList = [sphere_at(-3.0, 1.0), sphere_at(-10.0, 1.0)]
            .into_iter()
            .collect();
        let rec = world.hit(&ray, FORWARD).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_list_keeps_earlier_hit_when_later_objects_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let world: HittableList = [sphere_at(-3.0, 1.0), sphere_at(-10.0, 1.0), sphere_at(5.0, 1.0)]
            .into_iter()
            .collect();

        let rec = world.hit(&ray, FORWARD).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_list_respects_upper_bound() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let world: HittableList = [sphere_at(-10.0, 1.0)].into_iter().collect();
        assert!(world.hit(&ray, Interval::new(0.001, 5.0)).is_none());
    }
}
