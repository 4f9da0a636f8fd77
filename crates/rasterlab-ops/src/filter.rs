//! Kernel convolution.
//!
//! Applies an odd-sized kernel to the color channels of a buffer with
//! edge-replicating borders, a post-summation `scale` and `offset`, and a
//! repeat count for progressively stronger results.
//!
//! # Kernels
//!
//! - [`Kernel::mean`] - All ones (use with scale 1/9)
//! - [`Kernel::weighted`] / [`Kernel::gaussian`] - 1-2-1 outer product (scale 1/16)
//! - [`Kernel::sharpen`] - Identity minus 4-neighbor Laplacian
//! - [`Kernel::laplacian`] - 4-neighbor Laplacian
//!
//! # Borders
//!
//! Neighbor coordinates are clamped into `[0, w-1] x [0, h-1]`, so a border
//! pixel sees copies of itself where the kernel hangs over the edge.
//!
//! # Example
//!
//! ```rust
//! use rasterlab_core::PixelBuffer;
//! use rasterlab_ops::filter::{convolve, Kernel};
//!
//! let src = PixelBuffer::filled(8, 8, [100, 150, 200, 255]).unwrap();
//! let blurred = convolve(&src, &Kernel::weighted(), 1.0 / 16.0, 0.0, 2).unwrap();
//! assert_eq!(blurred, src);
//! ```

use crate::parallel::build_rows;
use crate::{OpsError, OpsResult};
use rasterlab_core::{CHANNELS, PixelBuffer, clamp_u8};
use tracing::{debug, trace};

/// Immutable convolution kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    data: Vec<f64>,
    width: usize,
    height: usize,
}

impl Kernel {
    /// Creates a kernel from row-major weights.
    ///
    /// Width and height must be odd and every weight finite.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rasterlab_ops::filter::Kernel;
    ///
    /// let k = Kernel::new(vec![1.0; 15], 5, 3).unwrap();
    /// assert_eq!(k.radius(), (2, 1));
    /// assert!(Kernel::new(vec![1.0; 4], 2, 2).is_err());
    /// ```
    pub fn new(data: Vec<f64>, width: usize, height: usize) -> OpsResult<Self> {
        if width % 2 == 0 || height % 2 == 0 {
            return Err(OpsError::InvalidParameter(
                "kernel dimensions must be odd".into(),
            ));
        }
        if data.len() != width * height {
            return Err(OpsError::InvalidParameter(format!(
                "kernel data size {} doesn't match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        if data.iter().any(|w| !w.is_finite()) {
            return Err(OpsError::InvalidParameter(
                "kernel weights must be finite".into(),
            ));
        }
        Ok(Self { data, width, height })
    }

    fn fixed3(data: [f64; 9]) -> Self {
        Self {
            data: data.to_vec(),
            width: 3,
            height: 3,
        }
    }

    /// Box kernel of ones.
    pub fn mean() -> Self {
        Self::fixed3([1.0; 9])
    }

    /// 1-2-1 outer product, summing to 16.
    pub fn weighted() -> Self {
        Self::fixed3([
            1.0, 2.0, 1.0,
            2.0, 4.0, 2.0,
            1.0, 2.0, 1.0,
        ])
    }

    /// Same weights as [`Kernel::weighted`].
    pub fn gaussian() -> Self {
        Self::weighted()
    }

    /// Sharpening kernel: center 5, 4-neighbors -1, sums to 1.
    pub fn sharpen() -> Self {
        Self::fixed3([
            0.0, -1.0, 0.0,
            -1.0, 5.0, -1.0,
            0.0, -1.0, 0.0,
        ])
    }

    /// Laplacian: center -4, 4-neighbors 1, sums to 0.
    pub fn laplacian() -> Self {
        Self::fixed3([
            0.0, 1.0, 0.0,
            1.0, -4.0, 1.0,
            0.0, 1.0, 0.0,
        ])
    }

    /// Kernel width.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Kernel height.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major weights.
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Weight at column `kx`, row `ky`.
    #[inline]
    pub fn weight(&self, kx: usize, ky: usize) -> f64 {
        self.data[ky * self.width + kx]
    }

    /// Returns the kernel radius (half-size).
    #[inline]
    pub fn radius(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

/// Convolves the color channels of `src` with `kernel`, `repeat` times.
///
/// Each output channel is `clamp(sum * scale + offset)` where `sum` is the
/// kernel-weighted sum over the edge-clamped neighborhood. Alpha is copied
/// from the center pixel. Every pass reads only the fully materialized
/// output of the previous pass.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] for `repeat == 0` or a non-finite
/// `scale`/`offset`.
///
/// # Example
///
/// ```rust
/// use rasterlab_core::PixelBuffer;
/// use rasterlab_ops::filter::{convolve, Kernel};
///
/// let src = PixelBuffer::filled(1, 1, [20, 40, 60, 255]).unwrap();
/// let out = convolve(&src, &Kernel::mean(), 1.0 / 9.0, 5.0, 1).unwrap();
/// assert_eq!(out.pixel(0, 0), [25, 45, 65, 255]);
/// ```
pub fn convolve(
    src: &PixelBuffer,
    kernel: &Kernel,
    scale: f64,
    offset: f64,
    repeat: u32,
) -> OpsResult<PixelBuffer> {
    trace!(
        width = src.width(),
        height = src.height(),
        kernel_w = kernel.width,
        kernel_h = kernel.height,
        scale,
        offset,
        repeat,
        "convolve"
    );

    if repeat == 0 {
        return Err(OpsError::InvalidParameter("repeat must be >= 1".into()));
    }
    if !scale.is_finite() || !offset.is_finite() {
        return Err(OpsError::InvalidParameter(format!(
            "scale and offset must be finite (got {}, {})",
            scale, offset
        )));
    }

    let mut current = convolve_pass(src, kernel, scale, offset)?;
    for pass in 1..repeat {
        debug!(pass = pass + 1, repeat, "convolution pass");
        current = convolve_pass(&current, kernel, scale, offset)?;
    }
    Ok(current)
}

/// One full pass: frozen `src` in, new buffer out.
fn convolve_pass(
    src: &PixelBuffer,
    kernel: &Kernel,
    scale: f64,
    offset: f64,
) -> OpsResult<PixelBuffer> {
    let width = src.width() as usize;
    let height = src.height() as usize;
    let (rx, ry) = kernel.radius();
    let data = src.data();

    build_rows(src.width(), src.height(), |y, row| {
        for x in 0..width {
            let mut sums = [0.0f64; 3];

            for ky in 0..kernel.height {
                // Source coordinates with edge clamping
                let sy = (y as isize + ky as isize - ry as isize).clamp(0, height as isize - 1)
                    as usize;
                for kx in 0..kernel.width {
                    let sx = (x as isize + kx as isize - rx as isize)
                        .clamp(0, width as isize - 1) as usize;

                    let src_idx = (sy * width + sx) * CHANNELS;
                    let kw = kernel.weight(kx, ky);

                    for c in 0..3 {
                        sums[c] += data[src_idx + c] as f64 * kw;
                    }
                }
            }

            let dst_idx = x * CHANNELS;
            for c in 0..3 {
                row[dst_idx + c] = clamp_u8(sums[c] * scale + offset);
            }
            row[dst_idx + 3] = data[(y * width + x) * CHANNELS + 3];
        }
    })
}
