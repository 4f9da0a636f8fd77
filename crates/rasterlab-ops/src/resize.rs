//! Nearest-neighbor resize.
//!
//! Output pixel `(x, y)` copies source pixel
//! `(min(floor(x * W / w), W - 1), min(floor(y * H / h), H - 1))`.
//! All four channels are copied unchanged; there is no interpolation.
//!
//! # Example
//!
//! ```rust
//! use rasterlab_core::PixelBuffer;
//! use rasterlab_ops::resize::resize;
//!
//! let src = PixelBuffer::filled(4, 4, [1, 2, 3, 4]).unwrap();
//! let dst = resize(&src, 8, 2).unwrap();
//! assert_eq!(dst.dimensions(), (8, 2));
//! ```

use crate::OpsResult;
use crate::parallel::build_rows;
use rasterlab_core::{CHANNELS, PixelBuffer};
use tracing::{debug, trace};

/// Largest accepted target width or height.
pub const MAX_RESIZE_DIM: u32 = 10_000;

/// Clamps a requested dimension into `[1, MAX_RESIZE_DIM]`.
#[inline]
pub fn clamp_dim(v: u32) -> u32 {
    v.clamp(1, MAX_RESIZE_DIM)
}

/// Source index for output index `i` when mapping `src_len` onto `dst_len`.
#[inline]
fn source_index(i: u32, src_len: u32, dst_len: u32) -> usize {
    let s = (i as u64 * src_len as u64 / dst_len as u64) as u32;
    s.min(src_len - 1) as usize
}

/// Resizes `src` to `width x height` by nearest-neighbor sampling.
///
/// Target dimensions are clamped into `[1, MAX_RESIZE_DIM]`.
pub fn resize(src: &PixelBuffer, width: u32, height: u32) -> OpsResult<PixelBuffer> {
    let (dst_w, dst_h) = (clamp_dim(width), clamp_dim(height));
    if (dst_w, dst_h) != (width, height) {
        debug!(
            requested_w = width,
            requested_h = height,
            dst_w,
            dst_h,
            "resize target clamped"
        );
    }
    trace!(
        src_w = src.width(),
        src_h = src.height(),
        dst_w,
        dst_h,
        "resize"
    );

    // Column lookup shared by every row.
    let cols: Vec<usize> = (0..dst_w)
        .map(|x| source_index(x, src.width(), dst_w) * CHANNELS)
        .collect();

    build_rows(dst_w, dst_h, |y, row| {
        let sy = source_index(y as u32, src.height(), dst_h);
        let src_row = src.row(sy as u32);
        for (d, &sx) in row.chunks_exact_mut(CHANNELS).zip(&cols) {
            d.copy_from_slice(&src_row[sx..sx + CHANNELS]);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexed(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::from_fn(w, h, |x, y| [x as u8, y as u8, (x + y) as u8, 255 - x as u8]).unwrap()
    }

    #[test]
    fn test_same_size_is_identity() {
        let src = indexed(7, 5);
        assert_eq!(resize(&src, 7, 5).unwrap(), src);
    }

    #[test]
    fn test_upscale_replicates() {
        let src = indexed(2, 2);
        let dst = resize(&src, 4, 4).unwrap();
        assert_eq!(dst.pixel(0, 0), src.pixel(0, 0));
        assert_eq!(dst.pixel(1, 1), src.pixel(0, 0));
        assert_eq!(dst.pixel(2, 1), src.pixel(1, 0));
        assert_eq!(dst.pixel(3, 3), src.pixel(1, 1));
    }

    #[test]
    fn test_downscale_picks_floor() {
        let src = indexed(10, 3);
        let dst = resize(&src, 3, 1).unwrap();
        // floor(x * 10 / 3) = 0, 3, 6
        let xs: Vec<u8> = (0..3).map(|x| dst.pixel(x, 0)[0]).collect();
        assert_eq!(xs, vec![0, 3, 6]);
        assert_eq!(dst.pixel(0, 0)[1], 0);
    }

    #[test]
    fn test_preserves_alpha() {
        let src = PixelBuffer::filled(3, 3, [9, 8, 7, 13]).unwrap();
        for px in resize(&src, 5, 2).unwrap().pixels() {
            assert_eq!(px, [9, 8, 7, 13]);
        }
    }

    #[test]
    fn test_dimensions_clamped() {
        let src = indexed(3, 3);
        assert_eq!(resize(&src, 0, 2).unwrap().dimensions(), (1, 2));
        assert_eq!(clamp_dim(20_000), MAX_RESIZE_DIM);
        assert_eq!(clamp_dim(0), 1);
    }
}
