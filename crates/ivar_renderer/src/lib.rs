//! Ivar - CPU path tracing of sphere scenes.
//!
//! A Monte Carlo path tracer: many jittered camera rays per pixel, each
//! followed through diffuse, metallic and dielectric bounces, averaged and
//! gamma corrected. The image is rendered in parallel row bands.

mod band;
mod camera;
mod error;
mod hittable;
mod material;
mod output;
mod renderer;
mod sphere;

pub use band::{generate_bands, Band};
pub use camera::{Camera, CameraConfig};
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Color, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use output::{save, save_png, save_ppm, write_ppm};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, ray_color, render_pixel, sky_gradient, Background,
    ImageBuffer, RenderSettings,
};
pub use sphere::Sphere;

/// Re-export vector, interval and ray types from ivar_math
pub use ivar_math::{Interval, Ray, Vec3};
