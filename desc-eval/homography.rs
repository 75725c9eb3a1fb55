use std::path::Path;

use desc_core::{DescError, DescResult};
use nalgebra as na;

/// Projective transform mapping image-A pixel coordinates to image-B coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography(na::Matrix3<f64>);

impl Homography {
    pub fn identity() -> Self {
        Self(na::Matrix3::identity())
    }

    pub fn from_matrix(m: na::Matrix3<f64>) -> DescResult<Self> {
        if m.iter().any(|v| !v.is_finite()) {
            return Err(DescError::InvalidHomography("matrix has non-finite entries".to_string()));
        }
        Ok(Self(m))
    }

    /// Exactly nine finite values in row-major order
    pub fn from_row_slice(values: &[f64]) -> DescResult<Self> {
        if values.len() != 9 {
            return Err(DescError::InvalidHomography(format!(
                "expected 9 values, got {}",
                values.len()
            )));
        }
        Self::from_matrix(na::Matrix3::from_row_slice(values))
    }

    /// Parses nine whitespace-separated numbers, row-major
    pub fn parse(text: &str) -> DescResult<Self> {
        let values = text
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>()
                    .map_err(|_| DescError::InvalidHomography(format!("'{}' is not a number", tok)))
            })
            .collect::<DescResult<Vec<f64>>>()?;
        Self::from_row_slice(&values)
    }

    /// Reads a homography file; an unreadable file is an I/O error, bad content is invalid
    pub fn from_file<P: AsRef<Path>>(path: P) -> DescResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn matrix(&self) -> &na::Matrix3<f64> {
        &self.0
    }

    /// Applies the transform to `(x, y, 1)` and dehomogenizes.
    ///
    /// Returns `None` when the homogeneous component is zero or the result is not finite.
    pub fn project(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let p = self.0 * na::Vector3::new(x, y, 1.0);
        if p.z == 0.0 {
            return None;
        }
        let (px, py) = (p.x / p.z, p.y / p.z);
        if px.is_finite() && py.is_finite() { Some((px, py)) } else { None }
    }
}

impl Default for Homography {
    fn default() -> Self {
        Self::identity()
    }
}
