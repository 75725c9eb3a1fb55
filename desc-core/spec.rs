use std::fmt;
use std::str::FromStr;

use crate::error::{DescError, DescResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Base descriptor variants an external extractor can compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DescriptorKind {
    /// Grayscale SIFT, 128 values
    GraySift,
    /// Grayscale SURF, 64 values
    GraySurf,
    /// SIFT over the three opponent color channels, 384 values
    OpponentSift,
    /// Hue/saturation weighted SIFT, 128 values
    HueSatSift,
}

impl DescriptorKind {
    pub const ALL: [DescriptorKind; 4] = [
        DescriptorKind::GraySift,
        DescriptorKind::GraySurf,
        DescriptorKind::OpponentSift,
        DescriptorKind::HueSatSift,
    ];

    pub fn parse(code: &str) -> DescResult<Self> {
        match code.trim() {
            "SIFT" => Ok(DescriptorKind::GraySift),
            "SURF" => Ok(DescriptorKind::GraySurf),
            "OPSIFT" => Ok(DescriptorKind::OpponentSift),
            "NEWSIFT" => Ok(DescriptorKind::HueSatSift),
            _ => Err(DescError::UnknownDescriptorCode(code.to_string())),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            DescriptorKind::GraySift => "SIFT",
            DescriptorKind::GraySurf => "SURF",
            DescriptorKind::OpponentSift => "OPSIFT",
            DescriptorKind::HueSatSift => "NEWSIFT",
        }
    }

    /// Number of values per descriptor row
    pub fn dim(self) -> usize {
        match self {
            DescriptorKind::GraySift => 128,
            DescriptorKind::GraySurf => 64,
            DescriptorKind::OpponentSift => 384,
            DescriptorKind::HueSatSift => 128,
        }
    }
}

impl FromStr for DescriptorKind {
    type Err = DescError;

    fn from_str(s: &str) -> DescResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A descriptor type: one base variant, or two variants concatenated row-wise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum DescriptorSpec {
    Single(DescriptorKind),
    Composite(DescriptorKind, DescriptorKind),
}

impl DescriptorSpec {
    /// Separator between the two codes of a composite spec
    pub const SEPARATOR: char = '+';

    /// Parses `"SIFT"` or `"SIFT+OPSIFT"`
    pub fn parse(code: &str) -> DescResult<Self> {
        let mut parts = code.split(Self::SEPARATOR);
        let first = parts.next().unwrap_or_default();
        match (parts.next(), parts.next()) {
            (None, _) => Ok(DescriptorSpec::Single(DescriptorKind::parse(first)?)),
            (Some(second), None) => Ok(Self::compose(
                DescriptorKind::parse(first)?,
                DescriptorKind::parse(second)?,
            )),
            (Some(_), Some(_)) => Err(DescError::UnknownDescriptorCode(code.to_string())),
        }
    }

    pub fn compose(first: DescriptorKind, second: DescriptorKind) -> Self {
        DescriptorSpec::Composite(first, second)
    }

    pub fn dim(&self) -> usize {
        match *self {
            DescriptorSpec::Single(kind) => kind.dim(),
            DescriptorSpec::Composite(first, second) => first.dim() + second.dim(),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, DescriptorSpec::Composite(..))
    }

    /// Base variants in concatenation order
    pub fn parts(&self) -> Vec<DescriptorKind> {
        match *self {
            DescriptorSpec::Single(kind) => vec![kind],
            DescriptorSpec::Composite(first, second) => vec![first, second],
        }
    }

    pub fn code(&self) -> String {
        self.to_string()
    }
}

impl From<DescriptorKind> for DescriptorSpec {
    fn from(kind: DescriptorKind) -> Self {
        DescriptorSpec::Single(kind)
    }
}

impl FromStr for DescriptorSpec {
    type Err = DescError;

    fn from_str(s: &str) -> DescResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DescriptorSpec {
    type Error = DescError;

    fn try_from(code: String) -> DescResult<Self> {
        Self::parse(&code)
    }
}

impl From<DescriptorSpec> for String {
    fn from(spec: DescriptorSpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for DescriptorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorSpec::Single(kind) => write!(f, "{}", kind),
            DescriptorSpec::Composite(first, second) => write!(f, "{}{}{}", first, Self::SEPARATOR, second),
        }
    }
}
