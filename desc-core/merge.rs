use crate::descriptors::DescriptorSet;
use crate::error::{DescError, DescResult};

/// Concatenates two descriptor sets computed for the same keypoints.
///
/// Row `i` of the result is `first.row(i)` followed by `second.row(i)`, so the
/// keypoint alignment of both inputs is preserved.
pub fn merge_descriptors(first: &DescriptorSet, second: &DescriptorSet) -> DescResult<DescriptorSet> {
    if first.len() != second.len() {
        return Err(DescError::DimensionMismatch {
            context: "merged descriptor row count",
            expected: first.len(),
            actual: second.len(),
        });
    }

    let dim = first.dim() + second.dim();
    let mut data = Vec::with_capacity(dim * first.len());
    for (a, b) in first.rows().zip(second.rows()) {
        data.extend_from_slice(a);
        data.extend_from_slice(b);
    }
    DescriptorSet::from_flat(dim, data)
}
