//! Error types for image operations.

use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpsError {
    /// Buffer dimensions are invalid or inconsistent with its data.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unknown operation selector.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

impl From<rasterlab_core::Error> for OpsError {
    fn from(err: rasterlab_core::Error) -> Self {
        match err {
            rasterlab_core::Error::InvalidDimensions { .. } => {
                OpsError::InvalidDimensions(err.to_string())
            }
        }
    }
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
