use std::fmt;

/// Result type for dueling_q operations
pub type Result<T> = std::result::Result<T, DuelingError>;

/// Main error type for the dueling_q library
#[derive(Debug, Clone, PartialEq)]
pub enum DuelingError {
    /// Input width or shape does not match what a layer expects
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid construction parameter
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Accelerated execution requested without a usable device
    DeviceUnavailable(String),

    /// Failure reported by a compute backend
    Backend(String),

    /// Configuration parsing errors
    Config(String),

    /// IO errors (file operations)
    Io(String),
}

impl fmt::Display for DuelingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuelingError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            DuelingError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            DuelingError::DeviceUnavailable(msg) => write!(f, "Device unavailable: {}", msg),
            DuelingError::Backend(msg) => write!(f, "Backend error: {}", msg),
            DuelingError::Config(msg) => write!(f, "Configuration error: {}", msg),
            DuelingError::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for DuelingError {}

impl From<std::io::Error> for DuelingError {
    fn from(err: std::io::Error) -> Self {
        DuelingError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DuelingError {
    fn from(err: serde_json::Error) -> Self {
        DuelingError::Config(err.to_string())
    }
}

impl From<ndarray::ShapeError> for DuelingError {
    fn from(err: ndarray::ShapeError) -> Self {
        DuelingError::DimensionMismatch {
            expected: "compatible array layout".to_string(),
            actual: err.to_string(),
        }
    }
}

// Helper functions for common error patterns
impl DuelingError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        DuelingError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        DuelingError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Error for a 2-D part whose feature width is wrong
    pub fn width_mismatch(part: &str, expected: usize, actual: usize) -> Self {
        DuelingError::DimensionMismatch {
            expected: format!("{} width {}", part, expected),
            actual: format!("{} width {}", part, actual),
        }
    }
}
