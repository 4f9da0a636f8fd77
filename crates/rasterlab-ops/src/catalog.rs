//! Named filters built on [`convolve`].
//!
//! # Filters
//!
//! - [`smooth`] - Mean or 1-2-1 weighted blur, repeated 1/2/3 times
//! - [`sharpen_first`] - Identity-minus-Laplacian kernel, repeated 1/2/3 times
//! - [`sharpen_second`] - `src - α * (lap - 128)` with α 0.2/0.4/0.6
//! - [`laplacian_edge`] - `|lap - 128| + 128`, `lap` clamped to `[0, 255]`
//!
//! The strength of a filter is a [`Strength`]; the repeat count and the
//! second-order weight are both derived from it.
//!
//! # Example
//!
//! ```rust
//! use rasterlab_core::PixelBuffer;
//! use rasterlab_ops::catalog::{smooth, SmoothingMode, Strength};
//!
//! let flat = PixelBuffer::filled(4, 4, [90, 90, 90, 255]).unwrap();
//! let out = smooth(&flat, SmoothingMode::Mean, Strength::High).unwrap();
//! assert_eq!(out, flat);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::filter::{Kernel, convolve};
use crate::parallel::{map_pixels, zip_pixels};
use crate::{OpsError, OpsResult};
use rasterlab_core::{PixelBuffer, clamp_u8};
use tracing::trace;

/// Center value that a signed Laplacian response is shifted around.
pub const LAPLACIAN_BIAS: f64 = 128.0;

/// Filter strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strength {
    /// One pass / α = 0.2.
    Low,
    /// Two passes / α = 0.4.
    #[default]
    Medium,
    /// Three passes / α = 0.6.
    High,
}

impl Strength {
    /// All strengths, weakest first.
    pub const ALL: [Strength; 3] = [Strength::Low, Strength::Medium, Strength::High];

    /// Number of convolution passes.
    #[inline]
    pub fn repeat(self) -> u32 {
        match self {
            Strength::Low => 1,
            Strength::Medium => 2,
            Strength::High => 3,
        }
    }

    /// Weight of the Laplacian term in second-order sharpening.
    #[inline]
    pub fn alpha(self) -> f64 {
        match self {
            Strength::Low => 0.2,
            Strength::Medium => 0.4,
            Strength::High => 0.6,
        }
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Strength::Low => "low",
            Strength::Medium => "medium",
            Strength::High => "high",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strength {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "1" => Ok(Strength::Low),
            "medium" | "med" | "2" => Ok(Strength::Medium),
            "high" | "3" => Ok(Strength::High),
            other => Err(OpsError::InvalidParameter(format!(
                "unknown strength '{}' (expected low, medium or high)",
                other
            ))),
        }
    }
}

/// Smoothing kernel family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SmoothingMode {
    /// Box blur, scale 1/9.
    Mean,
    /// 1-2-1 outer product, scale 1/16.
    #[default]
    Weighted,
    /// Same kernel as [`SmoothingMode::Weighted`].
    Gaussian,
}

impl SmoothingMode {
    /// Kernel and its normalizing scale.
    pub fn kernel(self) -> (Kernel, f64) {
        match self {
            SmoothingMode::Mean => (Kernel::mean(), 1.0 / 9.0),
            SmoothingMode::Weighted => (Kernel::weighted(), 1.0 / 16.0),
            SmoothingMode::Gaussian => (Kernel::gaussian(), 1.0 / 16.0),
        }
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            SmoothingMode::Mean => "mean",
            SmoothingMode::Weighted => "weighted",
            SmoothingMode::Gaussian => "gaussian",
        }
    }
}

impl fmt::Display for SmoothingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SmoothingMode {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" | "box" | "average" => Ok(SmoothingMode::Mean),
            "weighted" => Ok(SmoothingMode::Weighted),
            "gaussian" | "gauss" => Ok(SmoothingMode::Gaussian),
            other => Err(OpsError::InvalidParameter(format!(
                "unknown smoothing mode '{}' (expected mean, weighted or gaussian)",
                other
            ))),
        }
    }
}

/// Sharpening method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SharpenOrder {
    /// Convolve with the sharpen kernel.
    #[default]
    First,
    /// Subtract a weighted Laplacian.
    Second,
}

impl SharpenOrder {
    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            SharpenOrder::First => "first",
            SharpenOrder::Second => "second",
        }
    }
}

impl fmt::Display for SharpenOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SharpenOrder {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "1" | "1st" => Ok(SharpenOrder::First),
            "second" | "2" | "2nd" => Ok(SharpenOrder::Second),
            other => Err(OpsError::InvalidParameter(format!(
                "unknown sharpen order '{}' (expected first or second)",
                other
            ))),
        }
    }
}

/// Blurs `src` with the kernel selected by `mode`.
pub fn smooth(src: &PixelBuffer, mode: SmoothingMode, strength: Strength) -> OpsResult<PixelBuffer> {
    trace!(%mode, %strength, "smooth");
    let (kernel, scale) = mode.kernel();
    convolve(src, &kernel, scale, 0.0, strength.repeat())
}

/// Dispatches to [`sharpen_first`] or [`sharpen_second`].
pub fn sharpen(src: &PixelBuffer, order: SharpenOrder, strength: Strength) -> OpsResult<PixelBuffer> {
    match order {
        SharpenOrder::First => sharpen_first(src, strength),
        SharpenOrder::Second => sharpen_second(src, strength),
    }
}

/// First-order sharpening: the sharpen kernel applied `strength.repeat()` times.
pub fn sharpen_first(src: &PixelBuffer, strength: Strength) -> OpsResult<PixelBuffer> {
    trace!(%strength, "sharpen_first");
    convolve(src, &Kernel::sharpen(), 1.0, 0.0, strength.repeat())
}

/// Second-order sharpening.
///
/// Computes one Laplacian pass `lap = clamp(L)`, then per color channel
/// `clamp(src - α * (lap - 128))` with `α = strength.alpha()`. Alpha comes
/// from `src`.
///
/// `lap` is clamped into `[0, 255]` before recentering, so a flat region
/// (`L = 0`) is brightened by `128 * α`.
pub fn sharpen_second(src: &PixelBuffer, strength: Strength) -> OpsResult<PixelBuffer> {
    let alpha = strength.alpha();
    trace!(%strength, alpha, "sharpen_second");
    let lap = laplacian_pass(src)?;
    zip_pixels(src, &lap, |s, l, d| {
        for c in 0..3 {
            d[c] = clamp_u8(s[c] as f64 - alpha * (l[c] as f64 - LAPLACIAN_BIAS));
        }
        d[3] = s[3];
    })
}

/// Edge map: `clamp(|lap - 128| + 128)` per color channel.
///
/// The Laplacian response is clamped to `[0, 255]` first, so flat regions
/// and negative responses both map to 255.
pub fn laplacian_edge(src: &PixelBuffer) -> OpsResult<PixelBuffer> {
    trace!(width = src.width(), height = src.height(), "laplacian_edge");
    let lap = laplacian_pass(src)?;
    map_pixels(&lap, |l, d| {
        for c in 0..3 {
            d[c] = clamp_u8((l[c] as f64 - LAPLACIAN_BIAS).abs() + LAPLACIAN_BIAS);
        }
        d[3] = l[3];
    })
}

fn laplacian_pass(src: &PixelBuffer) -> OpsResult<PixelBuffer> {
    convolve(src, &Kernel::laplacian(), 1.0, 0.0, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> PixelBuffer {
        PixelBuffer::from_fn(9, 6, |x, y| {
            let v = if (x + y) % 2 == 0 { 40 } else { 210 };
            [v, 255 - v, (x * 20) as u8, 200]
        })
        .unwrap()
    }

    /// 3x3 black with one gray center pixel.
    fn spot(v: u8) -> PixelBuffer {
        PixelBuffer::from_fn(3, 3, |x, y| {
            if (x, y) == (1, 1) {
                [v, v, v, 255]
            } else {
                [0, 0, 0, 255]
            }
        })
        .unwrap()
    }

    #[test]
    fn test_strength_table() {
        let repeats: Vec<u32> = Strength::ALL.iter().map(|s| s.repeat()).collect();
        assert_eq!(repeats, vec![1, 2, 3]);
        assert_eq!(Strength::default(), Strength::Medium);
        assert_eq!("HIGH".parse::<Strength>().unwrap(), Strength::High);
        assert!("extreme".parse::<Strength>().is_err());
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!(SmoothingMode::default(), SmoothingMode::Weighted);
        assert_eq!("box".parse::<SmoothingMode>().unwrap(), SmoothingMode::Mean);
        assert_eq!("2".parse::<SharpenOrder>().unwrap(), SharpenOrder::Second);
        assert!(matches!(
            "median".parse::<SmoothingMode>(),
            Err(OpsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_smooth_flat_fixed_point() {
        let flat = PixelBuffer::filled(2, 2, [128, 128, 128, 255]).unwrap();
        for mode in [SmoothingMode::Mean, SmoothingMode::Weighted, SmoothingMode::Gaussian] {
            for s in Strength::ALL {
                assert_eq!(smooth(&flat, mode, s).unwrap(), flat, "{} {}", mode, s);
            }
        }
    }

    #[test]
    fn test_smooth_uses_repeat() {
        let img = checker();
        let low = smooth(&img, SmoothingMode::Mean, Strength::Low).unwrap();
        let high = smooth(&img, SmoothingMode::Mean, Strength::High).unwrap();
        let expected = convolve(&img, &Kernel::mean(), 1.0 / 9.0, 0.0, 3).unwrap();
        assert_eq!(high, expected);
        assert_ne!(low, high);
    }

    #[test]
    fn test_gaussian_matches_weighted() {
        let img = checker();
        assert_eq!(
            smooth(&img, SmoothingMode::Gaussian, Strength::Medium).unwrap(),
            smooth(&img, SmoothingMode::Weighted, Strength::Medium).unwrap()
        );
    }

    #[test]
    fn test_sharpen_first_flat() {
        let flat = PixelBuffer::filled(2, 2, [128, 128, 128, 255]).unwrap();
        for s in Strength::ALL {
            assert_eq!(sharpen_first(&flat, s).unwrap(), flat);
        }
    }

    #[test]
    fn test_sharpen_second_flat_shifts_by_alpha() {
        // Flat input: lap = 0, so out = 100 + 128 * α
        let flat = PixelBuffer::filled(3, 3, [100, 100, 100, 77]).unwrap();
        let got: Vec<u8> = Strength::ALL
            .iter()
            .map(|&s| sharpen_second(&flat, s).unwrap().pixel(1, 1)[0])
            .collect();
        assert_eq!(got, vec![125, 151, 176]);
        assert_eq!(sharpen_second(&flat, Strength::Low).unwrap().pixel(0, 0)[3], 77);
    }

    #[test]
    fn test_sharpen_first_single_spot() {
        let out = sharpen_first(&spot(100), Strength::Low).unwrap();
        // center: 5 * 100 saturates
        assert_eq!(out.pixel(1, 1), [255, 255, 255, 255]);
        // 4-neighbors: -100 saturates to 0
        assert_eq!(out.pixel(1, 0), [0, 0, 0, 255]);
        assert_eq!(out.pixel(0, 1), [0, 0, 0, 255]);
        // corners see no kernel tap
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(out.pixel(2, 2), [0, 0, 0, 255]);

        // 5 * 40 = 200 after one pass, saturated after the second
        let dim = spot(40);
        let low = sharpen_first(&dim, Strength::Low).unwrap();
        let medium = sharpen_first(&dim, Strength::Medium).unwrap();
        assert_eq!(low.pixel(1, 1), [200, 200, 200, 255]);
        assert_eq!(medium.pixel(1, 1), [255, 255, 255, 255]);
        assert_ne!(low, medium);
    }

    #[test]
    fn test_sharpen_second_single_spot() {
        let out = sharpen_second(&spot(100), Strength::Low).unwrap();
        // center: lap clamps to 0, 100 - 0.2 * (0 - 128) = 125.6
        assert_eq!(out.pixel(1, 1), [125, 125, 125, 255]);
        // 4-neighbors: lap = 100, 0 - 0.2 * (100 - 128) = 5.6
        assert_eq!(out.pixel(1, 0), [5, 5, 5, 255]);
        assert_eq!(out.pixel(2, 1), [5, 5, 5, 255]);
        // corners: lap = 0, 0 + 25.6
        assert_eq!(out.pixel(0, 0), [25, 25, 25, 255]);
    }

    #[test]
    fn test_sharpen_dispatch() {
        let img = spot(100);
        let first = sharpen(&img, SharpenOrder::First, Strength::Low).unwrap();
        let second = sharpen(&img, SharpenOrder::Second, Strength::Low).unwrap();
        assert_eq!(first.pixel(1, 1)[0], 255);
        assert_eq!(second.pixel(1, 1)[0], 125);
        assert_eq!(
            sharpen(&img, SharpenOrder::default(), Strength::Low).unwrap(),
            first
        );
    }

    #[test]
    fn test_laplacian_edge_single_spot() {
        let edge = laplacian_edge(&spot(100)).unwrap();
        // center: L = -400, clamped to 0 -> 255
        assert_eq!(edge.pixel(1, 1), [255, 255, 255, 255]);
        // 4-neighbors: L = 100 -> |100 - 128| + 128
        assert_eq!(edge.pixel(1, 0), [156, 156, 156, 255]);
        // corners see no response
        assert_eq!(edge.pixel(0, 0), [255, 255, 255, 255]);
    }
}
