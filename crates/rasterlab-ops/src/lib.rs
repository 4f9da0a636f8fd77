//! # rasterlab-ops
//!
//! Pure image operations over [`PixelBuffer`](rasterlab_core::PixelBuffer).
//!
//! Every operation takes a borrowed source and returns a newly allocated
//! result; inputs are never modified.
//!
//! # Modules
//!
//! - [`point`] - Negative, threshold, grayscale, log and gamma
//! - [`filter`] - Kernel convolution with edge clamping, scale, offset and repeat
//! - [`catalog`] - Smoothing, sharpening and edge detection built on [`filter`]
//! - [`resize`] - Nearest-neighbor resize
//! - [`histogram`] - Channel histograms and chart rendering
//! - [`op`] - Name-based operation selection and chaining
//! - [`parallel`] - Row scheduling (rayon with the `parallel` feature)
//!
//! # Example
//!
//! ```rust
//! use rasterlab_core::PixelBuffer;
//! use rasterlab_ops::{catalog, point, SmoothingMode, Strength};
//!
//! let img = PixelBuffer::filled(2, 2, [128, 128, 128, 255]).unwrap();
//! assert_eq!(point::negative(&img).unwrap().pixel(0, 0), [127, 127, 127, 255]);
//!
//! let smoothed = catalog::smooth(&img, SmoothingMode::Gaussian, Strength::Low).unwrap();
//! assert_eq!(smoothed, img);
//! ```
//!
//! # Chaining
//!
//! ```rust
//! use rasterlab_core::PixelBuffer;
//! use rasterlab_ops::op::{apply_chain, Operation};
//!
//! let img = PixelBuffer::filled(4, 4, [10, 200, 30, 255]).unwrap();
//! let out = apply_chain(&img, &[Operation::Grayscale, Operation::Log]).unwrap();
//! assert!(out.into_image().is_some());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod catalog;
pub mod filter;
pub mod histogram;
pub mod op;
pub mod parallel;
pub mod point;
pub mod resize;

pub use catalog::{SharpenOrder, SmoothingMode, Strength};
pub use error::{OpsError, OpsResult};
pub use filter::Kernel;
pub use histogram::Histogram;
pub use op::{Operation, Output};
