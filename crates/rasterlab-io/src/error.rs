//! Error types for image file I/O.

use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not a valid PNG.
    #[error("decode error: {0}")]
    Decode(String),

    /// The encoder rejected the image.
    #[error("encode error: {0}")]
    Encode(String),

    /// Valid PNG in a layout the engine does not accept (e.g. 16-bit).
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoded data could not form a buffer.
    #[error(transparent)]
    Core(#[from] rasterlab_core::Error),
}

impl IoError {
    /// Returns true if the file was readable but not in an accepted layout.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, IoError::UnsupportedFormat(_))
    }
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
