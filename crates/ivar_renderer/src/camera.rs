//! Camera configuration, ray generation and the parallel render loop.

use crate::band::{generate_bands, render_band, Progress};
use crate::error::{RenderError, RenderResult};
use crate::renderer::{ImageBuffer, RenderSettings};
use crate::{Color, Hittable, Ray};
use ivar_math::{gen_f32, random_in_unit_disk, NearZero, Vec3};
use rand::RngCore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Largest accepted image width or height, in pixels.
pub const MAX_IMAGE_DIMENSION: u32 = 1 << 16;

/// Largest accepted pixel count for one render.
pub const MAX_IMAGE_PIXELS: u64 = 1 << 28;

/// User-facing camera parameters. Read-only for the duration of a render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    // Image settings
    pub aspect_ratio: f32,
    pub image_width: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,

    // Camera positioning
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,

    // Lens settings
    pub vfov: f32,          // Vertical field of view in degrees
    pub defocus_angle: f32, // Variation angle of rays through each pixel, in degrees
    pub focus_dist: f32,    // Distance from camera to plane of perfect focus
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            look_from: Vec3::new(0.0, 0.0, -1.0),
            look_at: Vec3::new(0.0, 0.0, 0.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
        }
    }
}

impl CameraConfig {
    /// Set image width and aspect ratio. Height is derived.
    pub fn with_resolution(mut self, width: u32, aspect_ratio: f32) -> Self {
        self.image_width = width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Image height implied by width and aspect ratio, at least one row.
    pub fn image_height(&self) -> u32 {
        ((self.image_width as f32 / self.aspect_ratio) as u32).max(1)
    }

    /// Reject parameters that would make the camera geometry undefined.
    pub fn validate(&self) -> RenderResult<()> {
        let invalid = |msg: String| Err(RenderError::InvalidConfig(msg));

        if self.image_width == 0 {
            return invalid("image width must be at least 1".into());
        }
        if self.samples_per_pixel == 0 {
            return invalid("samples per pixel must be at least 1".into());
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return invalid(format!("aspect ratio must be positive, got {}", self.aspect_ratio));
        }
        let height = self.image_width as f32 / self.aspect_ratio;
        if !height.is_finite() || height > MAX_IMAGE_DIMENSION as f32 {
            return invalid(format!(
                "image height {} exceeds {} rows (width {}, aspect ratio {})",
                height, MAX_IMAGE_DIMENSION, self.image_width, self.aspect_ratio
            ));
        }
        if self.image_width > MAX_IMAGE_DIMENSION {
            return invalid(format!(
                "image width {} exceeds {} columns",
                self.image_width, MAX_IMAGE_DIMENSION
            ));
        }
        let pixels = self.image_width as u64 * self.image_height() as u64;
        if pixels > MAX_IMAGE_PIXELS {
            return invalid(format!("image has {} pixels, limit is {}", pixels, MAX_IMAGE_PIXELS));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return invalid(format!("vertical fov must be in (0, 180) degrees, got {}", self.vfov));
        }
        if !(self.defocus_angle >= 0.0 && self.defocus_angle < 180.0) {
            return invalid(format!(
                "defocus angle must be in [0, 180) degrees, got {}",
                self.defocus_angle
            ));
        }
        if !(self.focus_dist.is_finite() && self.focus_dist > 0.0) {
            return invalid(format!("focus distance must be positive, got {}", self.focus_dist));
        }
        for (name, vector) in [("look_from", self.look_from), ("look_at", self.look_at), ("vup", self.vup)] {
            if !vector.is_finite() {
                return invalid(format!("{} must be finite, got {}", name, vector));
            }
        }
        if (self.look_from - self.look_at).near_zero() {
            return invalid("look_from and look_at coincide".into());
        }
        if self.vup.cross(self.look_from - self.look_at).near_zero() {
            return invalid("up vector is parallel to the view direction".into());
        }

        Ok(())
    }
}

/// Camera with its viewport geometry derived from a `CameraConfig`.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    image_height: u32,
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
    samples_scale: f32,
}

impl Camera {
    /// Validate the configuration and derive the camera basis and viewport.
    pub fn new(config: CameraConfig) -> RenderResult<Self> {
        config.validate()?;

        let image_height = config.image_height();
        let center = config.look_from;

        // Calculate viewport dimensions
        let theta = config.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * config.focus_dist;
        let viewport_width = viewport_height * (config.image_width as f32 / image_height as f32);

        // Calculate camera basis vectors
        let w = (config.look_from - config.look_at).normalize();
        let u = config.vup.cross(w).normalize();
        let v = w.cross(u);

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        let pixel_delta_u = viewport_u / config.image_width as f32;
        let pixel_delta_v = viewport_v / image_height as f32;

        let viewport_upper_left =
            center - config.focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = config.focus_dist * (config.defocus_angle / 2.0).to_radians().tan();

        Ok(Self {
            samples_scale: 1.0 / config.samples_per_pixel as f32,
            image_height,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            u,
            v,
            w,
            defocus_disk_u: u * defocus_radius,
            defocus_disk_v: v * defocus_radius,
            config,
        })
    }

    pub fn image_width(&self) -> u32 {
        self.config.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.config.samples_per_pixel
    }

    pub fn max_depth(&self) -> u32 {
        self.config.max_depth
    }

    /// Get the samples scale factor (1 / samples_per_pixel).
    pub fn samples_scale(&self) -> f32 {
        self.samples_scale
    }

    /// Camera frame: right, up and backward unit vectors.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    ///
    /// The target is jittered within the pixel's footprint; the origin is
    /// sampled on the defocus disk when the defocus angle is positive.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.config.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    /// Render the scene across `settings.workers` row bands.
    ///
    /// Blocks until every band is finished. The returned buffer holds the
    /// averaged linear color of each pixel.
    pub fn render(&self, world: &dyn Hittable, settings: &RenderSettings) -> RenderResult<ImageBuffer> {
        if settings.workers == 0 {
            return Err(RenderError::InvalidConfig(
                "worker count must be at least 1".into(),
            ));
        }

        let width = self.image_width();
        let height = self.image_height;
        let bands = generate_bands(height, settings.workers);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(bands.len())
            .thread_name(|i| format!("ivar-band-{i}"))
            .build()?;

        log::info!(
            "Rendering {}x{} @ {} spp, max depth {}, {} bands",
            width,
            height,
            self.samples_per_pixel(),
            self.max_depth(),
            bands.len()
        );

        let mut image = ImageBuffer::new(width, height);
        let progress = Progress::new(height);

        // Carve the buffer into disjoint per-band slices
        let mut work: Vec<_> = Vec::with_capacity(bands.len());
        let mut rest: &mut [Color] = &mut image.pixels;
        for band in &bands {
            let (head, tail) =
                std::mem::take(&mut rest).split_at_mut(band.row_count() as usize * width as usize);
            work.push((band, head));
            rest = tail;
        }

        pool.install(|| {
            work.into_par_iter().for_each(|(band, pixels)| {
                let mut rng = band.rng(settings.seed);
                render_band(band, self, world, &settings.background, &mut rng, pixels, &progress);
            });
        });

        log::info!("Done in {:.2} seconds", progress.elapsed_secs());

        Ok(image)
    }
}

/// Sample a random offset in the unit square [-0.5, 0.5) x [-0.5, 0.5).
fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5, 0.0)
}
