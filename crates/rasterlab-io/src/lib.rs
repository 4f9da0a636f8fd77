//! # rasterlab-io
//!
//! PNG file collaborator for the rasterlab engine: turns files into
//! [`PixelBuffer`](rasterlab_core::PixelBuffer)s and back.
//!
//! ```rust,ignore
//! let img = rasterlab_io::read("in.png")?;
//! rasterlab_io::write("out.png", &img)?;
//! ```

#![warn(missing_docs)]

mod error;
pub mod png;

pub use error::{IoError, IoResult};
pub use png::{read, write};
