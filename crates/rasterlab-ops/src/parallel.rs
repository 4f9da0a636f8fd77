//! Row scheduling for per-pixel algorithms.
//!
//! Every operation in this crate computes an output row from frozen input
//! data only, so rows can be produced in any order. With the `parallel`
//! feature (default) rows are distributed over the rayon global pool;
//! without it they are produced sequentially. Each output byte is the same
//! expression either way, so results are bit-identical.
//!
//! # Example
//!
//! ```rust
//! use rasterlab_ops::parallel;
//!
//! let img = parallel::build_rows(4, 2, |y, row| {
//!     for px in row.chunks_exact_mut(4) {
//!         px.copy_from_slice(&[y as u8, 0, 0, 255]);
//!     }
//! })
//! .unwrap();
//! assert_eq!(img.pixel(3, 1), [1, 0, 0, 255]);
//! ```

use crate::{OpsError, OpsResult};
use rasterlab_core::{CHANNELS, PixelBuffer};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Calls `f(y, row)` for every `row_len`-byte row of `dst`.
///
/// Rows run on the rayon pool when the `parallel` feature is enabled.
pub fn for_each_row<F>(dst: &mut [u8], row_len: usize, f: F)
where
    F: Fn(usize, &mut [u8]) + Sync + Send,
{
    #[cfg(feature = "parallel")]
    dst.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));

    #[cfg(not(feature = "parallel"))]
    for_each_row_sequential(dst, row_len, f);
}

/// Sequential counterpart of [`for_each_row`].
pub fn for_each_row_sequential<F>(dst: &mut [u8], row_len: usize, f: F)
where
    F: Fn(usize, &mut [u8]),
{
    dst.chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}

/// Allocates a `width x height` buffer and fills it row by row.
///
/// The closure receives the row index and that row's bytes
/// (`width * 4` of them, zero-initialized).
pub fn build_rows<F>(width: u32, height: u32, f: F) -> OpsResult<PixelBuffer>
where
    F: Fn(usize, &mut [u8]) + Sync + Send,
{
    let mut data = PixelBuffer::new(width, height)?.into_raw();
    for_each_row(&mut data, width as usize * CHANNELS, f);
    Ok(PixelBuffer::from_raw(width, height, data)?)
}

/// Builds a same-sized buffer by mapping every source pixel independently.
///
/// `f(src_px, dst_px)` receives one `[R, G, B, A]` slice of the source and
/// the matching output slice.
pub fn map_pixels<F>(src: &PixelBuffer, f: F) -> OpsResult<PixelBuffer>
where
    F: Fn(&[u8], &mut [u8]) + Sync + Send,
{
    let row_len = src.row_len();
    let mut data = vec![0u8; src.data().len()];
    for_each_row(&mut data, row_len, |y, row| {
        let src_row = &src.data()[y * row_len..(y + 1) * row_len];
        for (s, d) in src_row
            .chunks_exact(CHANNELS)
            .zip(row.chunks_exact_mut(CHANNELS))
        {
            f(s, d);
        }
    });
    Ok(PixelBuffer::from_raw(src.width(), src.height(), data)?)
}

/// Builds a buffer by combining two same-sized buffers pixel by pixel.
///
/// # Errors
///
/// [`OpsError::InvalidDimensions`] if `a` and `b` differ in size.
pub fn zip_pixels<F>(a: &PixelBuffer, b: &PixelBuffer, f: F) -> OpsResult<PixelBuffer>
where
    F: Fn(&[u8], &[u8], &mut [u8]) + Sync + Send,
{
    if !a.same_size(b) {
        return Err(OpsError::InvalidDimensions(format!(
            "size mismatch: {}x{} vs {}x{}",
            a.width(),
            a.height(),
            b.width(),
            b.height()
        )));
    }
    let row_len = a.row_len();
    build_rows(a.width(), a.height(), |y, row| {
        let range = y * row_len..(y + 1) * row_len;
        let pa = a.data()[range.clone()].chunks_exact(CHANNELS);
        let pb = b.data()[range].chunks_exact(CHANNELS);
        for ((sa, sb), d) in pa.zip(pb).zip(row.chunks_exact_mut(CHANNELS)) {
            f(sa, sb, d);
        }
    })
}

/// Folds every source row into an accumulator and merges partial results.
///
/// In parallel mode each worker folds a subset of rows starting from
/// `identity()` and the partial accumulators are combined with `merge`;
/// `merge` must therefore be associative and commutative for the result
/// to be order-independent.
#[cfg(feature = "parallel")]
pub fn fold_rows<T, I, F, M>(src: &PixelBuffer, identity: I, fold: F, merge: M) -> T
where
    T: Send,
    I: Fn() -> T + Sync + Send,
    F: Fn(T, &[u8]) -> T + Sync + Send,
    M: Fn(T, T) -> T + Sync + Send,
{
    src.data()
        .par_chunks(src.row_len())
        .fold(&identity, &fold)
        .reduce(&identity, &merge)
}

/// Folds every source row into an accumulator.
#[cfg(not(feature = "parallel"))]
pub fn fold_rows<T, I, F, M>(src: &PixelBuffer, identity: I, fold: F, _merge: M) -> T
where
    I: Fn() -> T,
    F: Fn(T, &[u8]) -> T,
    M: Fn(T, T) -> T,
{
    src.rows().fold(identity(), fold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(y: usize, row: &mut [u8]) {
        for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
            px.copy_from_slice(&[(x * 7 + y) as u8, (x ^ y) as u8, (y * 3) as u8, 255]);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (w, h) = (37usize, 23usize);
        let mut a = vec![0u8; w * h * CHANNELS];
        let mut b = vec![0u8; w * h * CHANNELS];
        for_each_row(&mut a, w * CHANNELS, pattern);
        for_each_row_sequential(&mut b, w * CHANNELS, pattern);
        assert_eq!(a, b);
    }

    #[test]
    fn test_build_rows_rejects_zero() {
        assert!(build_rows(0, 4, |_, _| {}).is_err());
    }

    #[test]
    fn test_map_pixels_preserves_size() {
        let src = PixelBuffer::filled(5, 3, [1, 2, 3, 4]).unwrap();
        let out = map_pixels(&src, |s, d| {
            d.copy_from_slice(&[s[3], s[2], s[1], s[0]]);
        })
        .unwrap();
        assert_eq!(out.dimensions(), (5, 3));
        assert_eq!(out.pixel(4, 2), [4, 3, 2, 1]);
    }

    #[test]
    fn test_zip_pixels() {
        let a = PixelBuffer::filled(3, 2, [10, 20, 30, 40]).unwrap();
        let b = PixelBuffer::filled(3, 2, [1, 2, 3, 4]).unwrap();
        let out = zip_pixels(&a, &b, |pa, pb, d| {
            for c in 0..CHANNELS {
                d[c] = pa[c] - pb[c];
            }
        })
        .unwrap();
        assert_eq!(out.pixel(2, 1), [9, 18, 27, 36]);

        let c = PixelBuffer::filled(2, 3, [0; 4]).unwrap();
        assert!(matches!(
            zip_pixels(&a, &c, |_, _, _| {}),
            Err(OpsError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_fold_rows_counts_every_pixel() {
        let src = PixelBuffer::filled(13, 11, [0; 4]).unwrap();
        let n = fold_rows(
            &src,
            || 0usize,
            |acc, row| acc + row.len() / CHANNELS,
            |a, b| a + b,
        );
        assert_eq!(n, 13 * 11);
    }
}
