//! RGBA pixel buffer.
//!
//! [`PixelBuffer`] is the single image type every operation consumes and
//! produces: a width, a height and a flat byte store holding interleaved
//! 8-bit RGBA with straight (non-premultiplied) alpha.
//!
//! # Memory Layout
//!
//! Pixels are stored in **row-major** order, top-to-bottom, with no padding:
//!
//! ```text
//! Memory: [R G B A R G B A R G B A ...]  ← Row 0
//!         [R G B A R G B A R G B A ...]  ← Row 1
//!         ...
//! ```
//!
//! # Invariants
//!
//! - `width >= 1` and `height >= 1`
//! - `data.len() == width * height * 4`
//!
//! Both are enforced at construction, so a buffer that exists is always
//! well-formed. Operations never mutate their input; each returns a freshly
//! allocated buffer.
//!
//! # Usage
//!
//! ```rust
//! use rasterlab_core::PixelBuffer;
//!
//! let img = PixelBuffer::from_fn(4, 3, |x, y| {
//!     if (x, y) == (1, 2) { [255, 0, 0, 255] } else { [128, 128, 128, 255] }
//! })
//! .unwrap();
//!
//! assert_eq!(img.pixel(1, 2), [255, 0, 0, 255]);
//! assert_eq!(img.data().len(), 4 * 3 * 4);
//! ```

use crate::{CHANNELS, Error, Result};
use std::fmt;

/// Owned RGBA8 image buffer.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a buffer with every byte set to zero (transparent black).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for a zero dimension or a byte
    /// count that overflows `usize`.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Creates a buffer from existing interleaved RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if a dimension is zero or the
    /// data length is not exactly `width * height * 4`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rasterlab_core::PixelBuffer;
    ///
    /// let img = PixelBuffer::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    /// assert_eq!(img.pixel(1, 0), [5, 6, 7, 8]);
    ///
    /// assert!(PixelBuffer::from_raw(2, 1, vec![0; 7]).is_err());
    /// ```
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} bytes, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates a buffer filled with one RGBA value.
    pub fn filled(width: u32, height: u32, pixel: [u8; 4]) -> Result<Self> {
        let len = byte_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..len / CHANNELS {
            data.extend_from_slice(&pixel);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates a buffer by evaluating `f(x, y)` for every pixel.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rasterlab_core::PixelBuffer;
    ///
    /// let ramp = PixelBuffer::from_fn(256, 1, |x, _| [x as u8, 0, 0, 255]).unwrap();
    /// assert_eq!(ramp.pixel(200, 0)[0], 200);
    /// ```
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> [u8; 4],
    {
        let len = byte_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Returns the buffer width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the buffer height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the buffer dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns the number of bytes in one row.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width as usize * CHANNELS
    }

    /// Returns the raw interleaved RGBA bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the buffer and returns its bytes.
    #[inline]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Returns row `y` as a byte slice.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let len = self.row_len();
        let start = y as usize * len;
        &self.data[start..start + len]
    }

    /// Iterates over rows, top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u8]> {
        self.data.chunks_exact(self.row_len())
    }

    /// Iterates over pixels as `[R, G, B, A]` slices in storage order.
    pub fn pixels(&self) -> impl ExactSizeIterator<Item = &[u8]> {
        self.data.chunks_exact(CHANNELS)
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{}",
            self.width,
            self.height
        );
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Returns `true` if both buffers have the same dimensions.
    #[inline]
    pub fn same_size(&self, other: &PixelBuffer) -> bool {
        self.dimensions() == other.dimensions()
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Validates dimensions and returns the byte length of a buffer.
fn byte_len(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(
            width,
            height,
            "width and height must be > 0",
        ));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(CHANNELS))
        .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflows"))
}
