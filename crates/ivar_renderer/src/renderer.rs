//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Iterative bounce loop with a configurable depth budget
//! - Sky gradient or solid background
//! - Gamma correction
//! - Anti-aliasing via multi-sampling

use crate::{Camera, Color, Hittable, Ray};
use ivar_math::Interval;
use rand::RngCore;

/// Closest parameter accepted for a hit; keeps scattered rays from
/// re-hitting the surface they start on.
pub const MIN_HIT_DISTANCE: f32 = 0.001;

/// Displayable range of a gamma-corrected channel before quantization.
pub const INTENSITY: Interval = Interval::new(0.0, 0.999);

/// What a ray sees when it leaves the scene.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Background {
    /// Vertical white-to-blue gradient
    #[default]
    Sky,
    /// Uniform color
    Solid(Color),
}

impl Background {
    /// Radiance arriving along a ray that missed everything.
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Sky => sky_gradient(ray),
            Background::Solid(color) => *color,
        }
    }
}

/// Per-render settings that are not part of the camera.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Number of parallel row bands
    pub workers: usize,
    /// Base seed for the per-band generators; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Background radiance
    pub background: Background,
}

impl RenderSettings {
    /// Settings with the given worker count and defaults elsewhere.
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism().map_or(1, |n| n.get()),
            seed: None,
            background: Background::Sky,
        }
    }
}

/// Compute the color seen by a ray.
///
/// Follows the ray through at most `depth` scatter events, multiplying the
/// attenuation of each bounce. Returns black once the budget is spent or a
/// material absorbs the ray, and the background (scaled by the accumulated
/// attenuation) when the ray escapes.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for _ in 0..depth {
        let Some(rec) = world.hit(&ray, Interval::new(MIN_HIT_DISTANCE, f32::INFINITY)) else {
            return throughput * background.color(&ray);
        };

        match rec.material.scatter(&ray, &rec, rng) {
            Some(result) => {
                throughput *= result.attenuation;
                ray = result.scattered;
            }
            None => return Color::ZERO,
        }
    }

    Color::ZERO
}

/// Compute sky gradient background.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Gamma-correct a linear color and quantize it to 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let quantize = |c: f32| (256.0 * INTENSITY.clamp(linear_to_gamma(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Render a single pixel with multi-sampling.
///
/// Returns the average linear color of the camera's samples.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel() {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth(), background, rng);
    }

    pixel_color * camera.samples_scale()
}

/// Linear color image, row-major from the top-left pixel.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Average linear color over the whole image.
    pub fn mean(&self) -> Color {
        if self.pixels.is_empty() {
            return Color::ZERO;
        }
        self.pixels.iter().copied().sum::<Color>() / self.pixels.len() as f32
    }
}
