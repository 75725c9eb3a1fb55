pub mod config;
pub mod draw;
pub mod opponent;
pub mod pipeline;
pub mod source;

use desc_core::{ChannelOrder, ColorImage, DescError};

pub use config::RunConfig;
pub use pipeline::{Pipeline, RunSummary, UnitReport};
pub use source::PrecomputedSource;

pub use desc_core::{self, DescriptorKind, DescriptorSpec, Keypoint};
pub use desc_eval::{self, EvalConfig, Homography, MatchEvaluator};

#[derive(Debug)]
pub enum RunError {
    Desc(DescError),
    Image(image::ImageError),
    Toml(toml::de::Error),
    ThreadPool(rayon::ThreadPoolBuildError),
    Config(String),
    UnitsFailed { failed: usize, total: usize },
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Desc(e) => write!(f, "{}", e),
            RunError::Image(e) => write!(f, "Image error: {}", e),
            RunError::Toml(e) => write!(f, "Config parse error: {}", e),
            RunError::ThreadPool(e) => write!(f, "Thread pool error: {}", e),
            RunError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
            RunError::UnitsFailed { failed, total } => {
                write!(f, "{} of {} evaluations failed", failed, total)
            }
        }
    }
}

impl std::error::Error for RunError {}

impl From<DescError> for RunError {
    fn from(err: DescError) -> Self {
        RunError::Desc(err)
    }
}

impl From<std::io::Error> for RunError {
    fn from(err: std::io::Error) -> Self {
        RunError::Desc(DescError::Io(err))
    }
}

impl From<image::ImageError> for RunError {
    fn from(err: image::ImageError) -> Self {
        RunError::Image(err)
    }
}

impl From<toml::de::Error> for RunError {
    fn from(err: toml::de::Error) -> Self {
        RunError::Toml(err)
    }
}

impl From<rayon::ThreadPoolBuildError> for RunError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        RunError::ThreadPool(err)
    }
}

pub type RunResult<T> = Result<T, RunError>;

/// Wraps a decoded RGB image without copying channel order around
pub fn color_image_from_rgb(img: &image::RgbImage) -> RunResult<ColorImage> {
    let (w, h) = img.dimensions();
    Ok(ColorImage::new(w as usize, h as usize, 3, ChannelOrder::Rgb, img.as_raw().clone())?)
}
