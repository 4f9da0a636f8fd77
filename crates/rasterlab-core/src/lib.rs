//! # rasterlab-core
//!
//! Core types for the rasterlab image-processing engine.
//!
//! - [`PixelBuffer`] - Owned 8-bit RGBA buffer, validated at construction
//! - [`Channel`] - Named RGBA channel
//! - [`clamp_u8`] - Saturating float-to-byte conversion shared by all transforms
//! - Rec.601 luma helpers ([`luma_round`], [`luma_trunc`])
//! - [`Error`] / [`Result`] - Construction and addressing errors
//!
//! ## Crate Structure
//!
//! ```text
//! rasterlab-core (this crate)
//!    ^
//!    |
//!    +-- rasterlab-ops (point transforms, convolution, resize, histogram)
//!    +-- rasterlab-io  (PNG decode/encode)
//!    +-- rasterlab-cli
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod pixel;

pub use buffer::PixelBuffer;
pub use error::{Error, Result};
pub use pixel::{
    CHANNELS, Channel, REC601_LUMA_B, REC601_LUMA_G, REC601_LUMA_R, clamp_u8, luma_rec601,
    luma_round, luma_trunc,
};

/// Prelude module for convenient imports.
///
/// ```
/// use rasterlab_core::prelude::*;
///
/// let img = PixelBuffer::filled(1, 1, [0, 0, 0, 255]).unwrap();
/// assert_eq!(img.pixel(0, 0)[Channel::Alpha.index()], 255);
/// ```
pub mod prelude {
    pub use crate::buffer::PixelBuffer;
    pub use crate::error::{Error, Result};
    pub use crate::pixel::{Channel, clamp_u8, luma_round, luma_trunc};
}
