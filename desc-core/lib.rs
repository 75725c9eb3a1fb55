pub mod descriptors;
pub mod error;
pub mod merge;
pub mod source;
pub mod spec;
#[cfg(feature = "serde")]
pub mod store;

pub use descriptors::DescriptorSet;
pub use error::{DescError, DescResult};
pub use merge::merge_descriptors;
pub use source::DescriptorSource;
pub use spec::{DescriptorKind, DescriptorSpec};
#[cfg(feature = "serde")]
pub use store::{image_key, DescriptorStore, FeatureStore, KeypointStore};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Row-major 8-bit single-channel image
pub type Image = Vec<u8>;

/// Detected image location. Produced by an external detector, never mutated here.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    /// Diameter of the meaningful neighbourhood, in pixels
    pub size: f32,
    /// Orientation in degrees, -1 when not applicable
    pub angle: f32,
    pub response: f32,
}

impl Keypoint {
    /// Keypoint at `(x, y)` with the given size and no orientation
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self { x, y, size, angle: -1.0, response: 0.0 }
    }
}

/// Interleaving order of a 3-channel image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Bgr,
    Rgb,
}

impl ChannelOrder {
    /// Byte offsets of (red, green, blue) inside one pixel
    pub fn rgb_offsets(self) -> (usize, usize, usize) {
        match self {
            ChannelOrder::Bgr => (2, 1, 0),
            ChannelOrder::Rgb => (0, 1, 2),
        }
    }
}

/// Interleaved 8-bit color image
#[derive(Debug, Clone)]
pub struct ColorImage {
    width: usize,
    height: usize,
    channels: usize,
    order: ChannelOrder,
    data: Vec<u8>,
}

impl ColorImage {
    /// Wraps raw interleaved pixels, checking the buffer length against the shape
    pub fn new(width: usize, height: usize, channels: usize, order: ChannelOrder, data: Vec<u8>) -> DescResult<Self> {
        if channels == 0 {
            return Err(DescError::InvalidInput("image must have at least one channel".to_string()));
        }
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(DescError::DimensionMismatch {
                context: "image buffer length",
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, channels, order, data })
    }

    /// Single-color image, mostly useful for tests
    pub fn filled(width: usize, height: usize, order: ChannelOrder, pixel: [u8; 3]) -> Self {
        let data = pixel.iter().copied().cycle().take(width * height * 3).collect();
        Self { width, height, channels: 3, order, data }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }
}

/// Initialize Rayon thread pool with the specified number of threads
pub fn init_thread_pool(n_threads: usize) -> Result<(), rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build_global()
}

/// Default worker count: one per logical CPU
pub fn default_threads() -> usize {
    num_cpus::get().max(1)
}
