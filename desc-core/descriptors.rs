use crate::error::{DescError, DescResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Descriptor vectors for one image, stored row-major.
///
/// Row `i` describes keypoint `i` of the keypoint sequence the set was
/// computed from. Every row has exactly `dim` values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawSet", into = "RawSet"))]
pub struct DescriptorSet {
    dim: usize,
    data: Vec<f32>,
}

impl DescriptorSet {
    /// Empty set with a fixed row width
    pub fn new(dim: usize) -> Self {
        Self { dim, data: Vec::new() }
    }

    /// Build a set from flat row-major values
    pub fn from_flat(dim: usize, data: Vec<f32>) -> DescResult<Self> {
        if dim == 0 {
            if !data.is_empty() {
                return Err(DescError::DimensionMismatch {
                    context: "descriptor data for zero-width rows",
                    expected: 0,
                    actual: data.len(),
                });
            }
        } else if data.len() % dim != 0 {
            return Err(DescError::DimensionMismatch {
                context: "descriptor data length",
                expected: (data.len() / dim + 1) * dim,
                actual: data.len(),
            });
        }
        Ok(Self { dim, data })
    }

    /// Build a set from individual rows; every row must have length `dim`
    pub fn from_rows<R: AsRef<[f32]>>(dim: usize, rows: &[R]) -> DescResult<Self> {
        let mut set = Self::new(dim);
        set.data.reserve(dim * rows.len());
        for row in rows {
            set.push_row(row.as_ref())?;
        }
        Ok(set)
    }

    pub fn push_row(&mut self, row: &[f32]) -> DescResult<()> {
        if row.len() != self.dim {
            return Err(DescError::DimensionMismatch {
                context: "descriptor row",
                expected: self.dim,
                actual: row.len(),
            });
        }
        self.data.extend_from_slice(row);
        Ok(())
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of rows (one per keypoint)
    pub fn len(&self) -> usize {
        if self.dim == 0 { 0 } else { self.data.len() / self.dim }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f32]> + '_ {
        // chunks_exact panics on zero, and a zero-width set has no rows anyway
        self.data.chunks_exact(self.dim.max(1)).take(self.len())
    }

    pub fn as_flat(&self) -> &[f32] {
        &self.data
    }

    /// Row-wise concatenation with another set of equal length
    pub fn merge(&self, other: &DescriptorSet) -> DescResult<DescriptorSet> {
        crate::merge::merge_descriptors(self, other)
    }
}

/// Serialized shape: explicit dimension plus flat values
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct RawSet {
    dim: usize,
    data: Vec<f32>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSet> for DescriptorSet {
    type Error = DescError;

    fn try_from(raw: RawSet) -> DescResult<Self> {
        DescriptorSet::from_flat(raw.dim, raw.data)
    }
}

#[cfg(feature = "serde")]
impl From<DescriptorSet> for RawSet {
    fn from(set: DescriptorSet) -> Self {
        RawSet { dim: set.dim, data: set.data }
    }
}
