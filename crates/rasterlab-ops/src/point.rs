//! Point transforms.
//!
//! Per-pixel, per-channel mappings that never look at neighboring pixels.
//! Every transform writes R, G and B and copies alpha through untouched.
//!
//! # Operations
//!
//! - [`negative`] - `255 - v`
//! - [`threshold`] - binarize on rounded Rec.601 luma
//! - [`grayscale`] - truncated Rec.601 luma on all color channels
//! - [`log_transform`] - `(255 / ln 256) * ln(1 + v)`
//! - [`gamma_transform`] - `(v / 255)^(1/γ) * 255` through a 256-entry table
//!
//! # Example
//!
//! ```rust
//! use rasterlab_core::PixelBuffer;
//! use rasterlab_ops::point::{negative, threshold};
//!
//! let img = PixelBuffer::filled(2, 2, [128, 128, 128, 255]).unwrap();
//! assert_eq!(negative(&img).unwrap().pixel(0, 0), [127, 127, 127, 255]);
//! assert_eq!(threshold(&img, 150).unwrap().pixel(1, 1), [0, 0, 0, 255]);
//! ```

use crate::OpsResult;
use crate::parallel::map_pixels;
use rasterlab_core::{PixelBuffer, clamp_u8, luma_round, luma_trunc};
use tracing::{debug, trace};

/// Threshold level used when none is supplied.
pub const DEFAULT_THRESHOLD: u8 = 150;

/// Gamma used when none is supplied.
pub const DEFAULT_GAMMA: f64 = 2.2;

/// Smallest gamma accepted; lower (or non-finite) values are clamped to it.
pub const MIN_GAMMA: f64 = 0.01;

/// A 256-entry byte-to-byte lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lut([u8; 256]);

impl Lut {
    /// Builds a table by evaluating `f` for every input byte.
    pub fn from_fn(f: impl Fn(u8) -> u8) -> Self {
        let mut table = [0u8; 256];
        for (i, v) in table.iter_mut().enumerate() {
            *v = f(i as u8);
        }
        Self(table)
    }

    /// Looks up one value.
    #[inline]
    pub fn get(&self, v: u8) -> u8 {
        self.0[v as usize]
    }

    /// Applies the table to R, G and B of every pixel.
    pub fn apply(&self, src: &PixelBuffer) -> OpsResult<PixelBuffer> {
        map_pixels(src, |s, d| {
            d[0] = self.get(s[0]);
            d[1] = self.get(s[1]);
            d[2] = self.get(s[2]);
            d[3] = s[3];
        })
    }
}

/// Inverts R, G and B: `out = 255 - v`.
///
/// Exact and involutive: `negative(negative(img)) == img`.
pub fn negative(src: &PixelBuffer) -> OpsResult<PixelBuffer> {
    trace!(width = src.width(), height = src.height(), "negative");
    map_pixels(src, |s, d| {
        d[0] = 255 - s[0];
        d[1] = 255 - s[1];
        d[2] = 255 - s[2];
        d[3] = s[3];
    })
}

/// Binarizes on luma: black where `round(luma) < level`, white elsewhere.
///
/// `level` is clamped into `[0, 255]`. The output only contains pure black
/// and pure white color channels, so the transform is idempotent.
pub fn threshold(src: &PixelBuffer, level: i32) -> OpsResult<PixelBuffer> {
    let t = level.clamp(0, 255) as u8;
    if t as i32 != level {
        debug!(requested = level, used = t, "threshold level clamped");
    }
    trace!(width = src.width(), height = src.height(), level = t, "threshold");

    map_pixels(src, |s, d| {
        let v = if luma_round(s[0], s[1], s[2]) < t { 0 } else { 255 };
        d[0] = v;
        d[1] = v;
        d[2] = v;
        d[3] = s[3];
    })
}

/// Replaces R, G and B with truncated Rec.601 luma.
pub fn grayscale(src: &PixelBuffer) -> OpsResult<PixelBuffer> {
    trace!(width = src.width(), height = src.height(), "grayscale");
    map_pixels(src, |s, d| {
        let g = luma_trunc(s[0], s[1], s[2]);
        d[0] = g;
        d[1] = g;
        d[2] = g;
        d[3] = s[3];
    })
}

/// Logarithmic table: `clamp((255 / ln 256) * ln(1 + v))`.
pub fn log_lut() -> Lut {
    let c = 255.0 / 256.0f64.ln();
    Lut::from_fn(|v| clamp_u8(c * (1.0 + v as f64).ln()))
}

/// Log transform, expanding dark values and compressing bright ones.
///
/// Maps 0 to 0 and 255 to 255.
pub fn log_transform(src: &PixelBuffer) -> OpsResult<PixelBuffer> {
    trace!(width = src.width(), height = src.height(), "log_transform");
    log_lut().apply(src)
}

/// Clamps a gamma value into the accepted domain.
#[inline]
pub fn sanitize_gamma(gamma: f64) -> f64 {
    if gamma.is_nan() || gamma < MIN_GAMMA {
        MIN_GAMMA
    } else {
        gamma
    }
}

/// Gamma table: `lut[i] = (i / 255)^(1/γ) * 255`, rounded to nearest.
///
/// This is the only point transform that rounds instead of truncating;
/// truncation drifts by up to 5 levels on a `γ` then `1/γ` round-trip.
pub fn gamma_lut(gamma: f64) -> Lut {
    let inv = 1.0 / sanitize_gamma(gamma);
    Lut::from_fn(|v| clamp_u8(((v as f64 / 255.0).powf(inv) * 255.0).round()))
}

/// Gamma transform through a precomputed 256-entry table.
///
/// `γ > 1` brightens, `γ < 1` darkens. Values below [`MIN_GAMMA`] are
/// clamped.
pub fn gamma_transform(src: &PixelBuffer, gamma: f64) -> OpsResult<PixelBuffer> {
    let g = sanitize_gamma(gamma);
    if g != gamma {
        debug!(requested = gamma, used = g, "gamma clamped");
    }
    trace!(width = src.width(), height = src.height(), gamma = g, "gamma_transform");
    gamma_lut(g).apply(src)
}
