//! Error types for rasterlab-core.
//!
//! Buffer construction is the only fallible step in the core crate: every
//! [`crate::PixelBuffer`] that exists satisfies `data.len() == width * height * 4`
//! with non-zero dimensions, so downstream operations never re-validate.
//!
//! # Usage
//!
//! ```rust
//! use rasterlab_core::{Error, PixelBuffer};
//!
//! let err = PixelBuffer::from_raw(2, 2, vec![0; 15]).unwrap_err();
//! assert!(err.is_dimension_error());
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation
//!
//! # Used By
//!
//! - [`crate::buffer::PixelBuffer`] - Construction
//! - `rasterlab-ops` - Wrapped into `OpsError`
//! - `rasterlab-io` - Wrapped into `IoError`

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when building pixel buffers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid buffer dimensions.
    ///
    /// Returned when width or height is zero, when `width * height * 4`
    /// overflows, or when the supplied data length doesn't match.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is a dimension error.
    #[inline]
    pub fn is_dimension_error(&self) -> bool {
        matches!(self, Self::InvalidDimensions { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimensions() {
        let err = Error::invalid_dimensions(0, 10, "width must be > 0");
        let msg = err.to_string();
        assert!(msg.contains("0x10"));
        assert!(msg.contains("width must be > 0"));
        assert!(err.is_dimension_error());
    }
}
