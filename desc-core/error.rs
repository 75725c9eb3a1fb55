#[derive(Debug)]
pub enum DescError {
    InvalidInput(String),
    DimensionMismatch { context: &'static str, expected: usize, actual: usize },
    UnknownDescriptorCode(String),
    InvalidHomography(String),
    MissingEntry(String),
    Io(std::io::Error),
}

impl std::fmt::Display for DescError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DescError::InvalidInput(msg) => {
                write!(f, "Invalid input: {}", msg)
            }
            DescError::DimensionMismatch { context, expected, actual } => {
                write!(f, "Dimension mismatch in {}: expected {}, got {}", context, expected, actual)
            }
            DescError::UnknownDescriptorCode(code) => {
                write!(f, "Unknown descriptor code: '{}' (expected SIFT, SURF, OPSIFT or NEWSIFT)", code)
            }
            DescError::InvalidHomography(msg) => {
                write!(f, "Invalid homography: {}", msg)
            }
            DescError::MissingEntry(key) => {
                write!(f, "No stored entry for '{}'", key)
            }
            DescError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for DescError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DescError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DescError {
    fn from(err: std::io::Error) -> Self {
        DescError::Io(err)
    }
}

pub type DescResult<T> = Result<T, DescError>;
