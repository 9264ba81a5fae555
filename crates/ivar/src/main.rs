use anyhow::{Context, Result};
use clap::Parser;
use ivar_renderer::{Camera, CameraConfig, RenderSettings};
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::time::Instant;

mod cli;
mod scene;

use cli::Args;

fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_camera(path: &Path) -> Result<CameraConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read camera file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse camera file {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.clone().into());

    let start = Instant::now();
    let mut scene_rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let scene = scene::build(args.scene, &mut scene_rng);
    log::info!("Scene built in {:?}", start.elapsed());

    let mut config = match &args.camera {
        Some(path) => load_camera(path)?,
        None => scene.camera,
    };
    if let Some(width) = args.width {
        config.image_width = width;
    }
    if let Some(aspect) = args.aspect {
        config.aspect_ratio = aspect;
    }
    if let Some(samples) = args.samples {
        config.samples_per_pixel = samples;
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }

    let camera = Camera::new(config).context("Invalid camera configuration")?;

    let mut settings = RenderSettings::default();
    if let Some(workers) = args.workers {
        settings.workers = workers;
    }
    settings.seed = args.seed;

    let image = camera.render(&scene.world, &settings)?;

    ivar_renderer::save(&image, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}
