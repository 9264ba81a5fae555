//! Demo scenes.

use crate::cli::SceneChoice;
use ivar_math::{gen_f32, gen_range_f32, random_vector, random_vector_range, Vec3};
use ivar_renderer::{
    CameraConfig, Color, Dielectric, HittableList, Lambertian, Material, Metal, Sphere,
};
use rand::RngCore;
use std::sync::Arc;

/// Geometry plus the camera it was composed for.
pub struct Scene {
    pub world: HittableList,
    pub camera: CameraConfig,
}

pub fn build(choice: SceneChoice, rng: &mut dyn RngCore) -> Scene {
    match choice {
        SceneChoice::Cover => cover(rng),
        SceneChoice::Materials => materials(),
    }
}

/// Ground plane of small random spheres with three large feature spheres.
pub fn cover(rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::new();

    let ground: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)));
    world.add(Box::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground)));

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let material: Arc<dyn Material> = if choose_mat < 0.8 {
                // Diffuse
                let albedo = random_vector(rng) * random_vector(rng);
                Arc::new(Lambertian::new(albedo))
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = random_vector_range(rng, 0.5, 1.0);
                let fuzz = gen_range_f32(rng, 0.0, 0.5);
                Arc::new(Metal::new(albedo, fuzz))
            } else {
                Arc::clone(&glass)
            };
            world.add(Box::new(Sphere::new(center, 0.2, material)));
        }
    }

    world.add(Box::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass)));
    world.add(Box::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    log::info!("Created {} objects", world.len());

    let camera = CameraConfig::default()
        .with_resolution(1200, 16.0 / 9.0)
        .with_quality(100, 50)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0);

    Scene { world, camera }
}

/// Diffuse, hollow glass and fuzzy metal spheres on a large ground sphere.
pub fn materials() -> Scene {
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    let air_bubble: Arc<dyn Material> = Arc::new(Dielectric::new(1.0 / 1.5));

    let world: HittableList = [
        Sphere::new(
            Vec3::new(0.0, -100.5, -1.0),
            100.0,
            Arc::new(Lambertian::new(Color::new(0.8, 0.8, 0.0))),
        ),
        Sphere::new(
            Vec3::new(0.0, 0.0, -1.2),
            0.5,
            Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.5))),
        ),
        Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, glass),
        Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.4, air_bubble),
        Sphere::new(
            Vec3::new(1.0, 0.0, -1.0),
            0.5,
            Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 1.0)),
        ),
    ]
    .into_iter()
    .collect();

    let camera = CameraConfig::default()
        .with_resolution(400, 16.0 / 9.0)
        .with_quality(100, 50)
        .with_position(Vec3::new(-2.0, 2.0, 1.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(20.0, 10.0, 3.4);

    Scene { world, camera }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ivar_renderer::{Camera, Hittable, Interval, Ray};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_cover_scene_contents() {
        let scene = cover(&mut StdRng::seed_from_u64(1));
        // Ground + three feature spheres + most of the 22x22 grid
        assert!(scene.world.len() > 400 && scene.world.len() <= 4 + 22 * 22);
        assert!(Camera::new(scene.camera).is_ok());
    }

    #[test]
    fn test_cover_scene_is_seed_deterministic() {
        let a = cover(&mut StdRng::seed_from_u64(5));
        let b = cover(&mut StdRng::seed_from_u64(5));
        assert_eq!(a.world.len(), b.world.len());
    }

    #[test]
    fn test_materials_scene_camera_sees_center_sphere() {
        let scene = materials();
        assert_eq!(scene.world.len(), 5);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z);
        let rec = scene.world.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 1.7).abs() < 1e-4);
        assert!(Camera::new(scene.camera).is_ok());
    }
}
