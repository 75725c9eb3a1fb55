use desc_core::Keypoint;

use crate::homography::Homography;
use crate::types::{ImageBounds, Verdict};

/// Checks a match against the ground-truth homography.
///
/// The query keypoint is projected into image B. Degenerate or out-of-extent
/// projections are `OutOfBounds`. Otherwise the match is correct when the
/// projection lands closer to the matched keypoint than that keypoint's size.
pub fn verify_match(query: &Keypoint, matched: &Keypoint, h: &Homography, bounds: ImageBounds) -> Verdict {
    let Some((px, py)) = h.project(query.x as f64, query.y as f64) else {
        return Verdict::OutOfBounds;
    };
    if !bounds.contains(px, py) {
        return Verdict::OutOfBounds;
    }

    let dx = matched.x as f64 - px;
    let dy = matched.y as f64 - py;
    if (dx * dx + dy * dy).sqrt() < matched.size as f64 {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}
