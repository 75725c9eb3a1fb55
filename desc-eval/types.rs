use desc_core::{DescriptorSet, Keypoint};

/// Nearest-neighbor pairing of a query descriptor (image A) with a train descriptor (image B)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub query_idx: usize,
    pub train_idx: usize,
    pub distance: f32,
}

/// Geometric outcome of a match under the ground-truth homography
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    /// Projection fell outside image B or was degenerate
    OutOfBounds,
}

impl Verdict {
    pub fn is_correct(self) -> bool {
        self == Verdict::Correct
    }
}

/// Match with its verdict, as produced after ranking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerifiedMatch {
    pub matched: Match,
    pub verdict: Verdict,
}

/// Pixel extent of an image; projections are tested against `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBounds {
    pub width: f64,
    pub height: f64,
}

impl ImageBounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width: width as f64, height: height as f64 }
    }

    /// Inclusive on both ends: a point exactly on the far edge is inside
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }
}

/// Borrowed features of one image: keypoints, their descriptors and the image extent
#[derive(Debug, Clone, Copy)]
pub struct FeatureView<'a> {
    pub keypoints: &'a [Keypoint],
    pub descriptors: &'a DescriptorSet,
    pub bounds: ImageBounds,
}

impl<'a> FeatureView<'a> {
    pub fn new(keypoints: &'a [Keypoint], descriptors: &'a DescriptorSet, width: u32, height: u32) -> Self {
        Self { keypoints, descriptors, bounds: ImageBounds::new(width, height) }
    }
}
