use crate::descriptors::DescriptorSet;
use crate::error::{DescError, DescResult};
use crate::spec::{DescriptorKind, DescriptorSpec};
use crate::{ColorImage, Keypoint};

/// External descriptor extractor.
///
/// Implementations return one row per keypoint, in keypoint order, each row
/// `kind.dim()` values wide. `name` is the image's file name; sources backed
/// by persisted data use it as the lookup key.
pub trait DescriptorSource: Sync {
    fn describe(
        &self,
        name: &str,
        image: &ColorImage,
        keypoints: &[Keypoint],
        kind: DescriptorKind,
    ) -> DescResult<DescriptorSet>;
}

impl DescriptorSpec {
    /// Computes this descriptor type with `source`, merging both parts of a composite
    pub fn describe_with<S: DescriptorSource + ?Sized>(
        &self,
        source: &S,
        name: &str,
        image: &ColorImage,
        keypoints: &[Keypoint],
    ) -> DescResult<DescriptorSet> {
        let set = match *self {
            DescriptorSpec::Single(kind) => checked_describe(source, name, image, keypoints, kind)?,
            DescriptorSpec::Composite(first, second) => {
                let a = checked_describe(source, name, image, keypoints, first)?;
                let b = checked_describe(source, name, image, keypoints, second)?;
                a.merge(&b)?
            }
        };
        Ok(set)
    }
}

fn checked_describe<S: DescriptorSource + ?Sized>(
    source: &S,
    name: &str,
    image: &ColorImage,
    keypoints: &[Keypoint],
    kind: DescriptorKind,
) -> DescResult<DescriptorSet> {
    let set = source.describe(name, image, keypoints, kind)?;
    if set.len() != keypoints.len() {
        return Err(DescError::DimensionMismatch {
            context: "descriptor rows vs keypoints",
            expected: keypoints.len(),
            actual: set.len(),
        });
    }
    if !set.is_empty() && set.dim() != kind.dim() {
        return Err(DescError::DimensionMismatch {
            context: "descriptor width",
            expected: kind.dim(),
            actual: set.dim(),
        });
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChannelOrder;

    /// Encodes the keypoint index and the kind into every value
    struct IndexSource;

    impl DescriptorSource for IndexSource {
        fn describe(
            &self,
            _name: &str,
            _image: &ColorImage,
            keypoints: &[Keypoint],
            kind: DescriptorKind,
        ) -> DescResult<DescriptorSet> {
            let tag = kind.dim() as f32;
            let rows: Vec<Vec<f32>> = (0..keypoints.len())
                .map(|i| vec![i as f32 + tag; kind.dim()])
                .collect();
            DescriptorSet::from_rows(kind.dim(), &rows)
        }
    }

    /// Always returns one row too few
    struct ShortSource;

    impl DescriptorSource for ShortSource {
        fn describe(
            &self,
            _name: &str,
            _image: &ColorImage,
            keypoints: &[Keypoint],
            kind: DescriptorKind,
        ) -> DescResult<DescriptorSet> {
            let rows = vec![vec![0.0; kind.dim()]; keypoints.len().saturating_sub(1)];
            DescriptorSet::from_rows(kind.dim(), &rows)
        }
    }

    fn keypoints(n: usize) -> Vec<Keypoint> {
        (0..n).map(|i| Keypoint::new(i as f32, i as f32, 4.0)).collect()
    }

    #[test]
    fn test_single_spec() {
        let img = ColorImage::filled(8, 8, ChannelOrder::Bgr, [0, 0, 0]);
        let spec = DescriptorSpec::Single(DescriptorKind::GraySurf);
        let set = spec.describe_with(&IndexSource, "a.png", &img, &keypoints(3)).unwrap();
        assert_eq!(set.dim(), 64);
        assert_eq!(set.len(), 3);
        assert_eq!(set.row(2)[0], 66.0);
    }

    #[test]
    fn test_composite_spec_merges_parts() {
        let img = ColorImage::filled(8, 8, ChannelOrder::Bgr, [0, 0, 0]);
        let spec = DescriptorSpec::compose(DescriptorKind::GraySurf, DescriptorKind::GraySift);
        let set = spec.describe_with(&IndexSource, "a.png", &img, &keypoints(2)).unwrap();
        assert_eq!(set.dim(), spec.dim());
        assert_eq!(set.row(1)[0], 65.0);
        assert_eq!(set.row(1)[64], 129.0);
    }

    #[test]
    fn test_misaligned_source_rejected() {
        let img = ColorImage::filled(8, 8, ChannelOrder::Bgr, [0, 0, 0]);
        let spec = DescriptorSpec::Single(DescriptorKind::GraySift);
        let result = spec.describe_with(&ShortSource, "a.png", &img, &keypoints(4));
        assert!(matches!(result, Err(DescError::DimensionMismatch { expected: 4, actual: 3, .. })));
    }
}
