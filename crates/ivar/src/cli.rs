use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

/// Log levels selectable on the command line
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Built-in demo scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneChoice {
    /// Field of small random spheres around three large ones
    Cover,
    /// Three spheres showing diffuse, hollow glass and fuzzy metal
    Materials,
}

#[derive(Parser, Debug)]
#[command(name = "ivar")]
#[command(about = "Path trace a scene of spheres to a PPM or PNG image")]
pub struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value = "cover")]
    pub scene: SceneChoice,

    /// JSON camera configuration replacing the scene's camera
    #[arg(long)]
    pub camera: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image aspect ratio (width / height)
    #[arg(long)]
    pub aspect: Option<f32>,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum number of bounces per ray
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Number of parallel row bands (defaults to available cores)
    #[arg(long, short = 'j')]
    pub workers: Option<usize>,

    /// Seed for scene generation and sampling; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file path (.png for PNG, anything else for P3 PPM)
    #[arg(short, long, default_value = "output.ppm")]
    pub output: PathBuf,

    /// Set the logging level; RUST_LOG takes precedence
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
