//! Pixel-level helpers shared by all operations.
//!
//! # Contents
//!
//! - [`Channel`] - Named RGBA channel with its byte offset
//! - [`clamp_u8`] - The single saturating float-to-byte conversion used by
//!   every transform (clamp to `[0, 255]`, then truncate toward zero)
//! - Rec.601 luma weights and the two luma quantizations
//!
//! # Memory Layout
//!
//! Pixels are stored as interleaved `[R G B A]` bytes; [`Channel::index`]
//! is the offset of a channel inside one pixel.
//!
//! # Used By
//!
//! - `rasterlab-ops` - point transforms, convolution, histograms

use std::fmt;

/// Number of interleaved channels per pixel.
pub const CHANNELS: usize = 4;

/// Rec.601 luma coefficient for red channel.
///
/// Used in the luma formula: `Y = 0.299*R + 0.587*G + 0.114*B`
pub const REC601_LUMA_R: f64 = 0.299;

/// Rec.601 luma coefficient for green channel.
pub const REC601_LUMA_G: f64 = 0.587;

/// Rec.601 luma coefficient for blue channel.
pub const REC601_LUMA_B: f64 = 0.114;

/// A single channel of an RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Red, offset 0.
    Red,
    /// Green, offset 1.
    Green,
    /// Blue, offset 2.
    Blue,
    /// Alpha, offset 3.
    Alpha,
}

impl Channel {
    /// The three color channels in storage order.
    pub const COLOR: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Byte offset of this channel inside a pixel.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
            Channel::Alpha => 3,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Red => "R",
            Channel::Green => "G",
            Channel::Blue => "B",
            Channel::Alpha => "A",
        };
        f.pad(name)
    }
}

/// Saturating conversion of a channel value to a byte.
///
/// Values below 0 (and NaN) map to 0, values above 255 map to 255, everything
/// else is truncated toward zero. Point transforms, convolution and
/// recombination all produce their bytes through this function. The gamma
/// table is the one exception that rounds to nearest first; it still
/// saturates through here.
///
/// # Example
///
/// ```rust
/// use rasterlab_core::clamp_u8;
///
/// assert_eq!(clamp_u8(-3.5), 0);
/// assert_eq!(clamp_u8(127.9), 127);
/// assert_eq!(clamp_u8(300.0), 255);
/// ```
#[inline]
pub fn clamp_u8(v: f64) -> u8 {
    if v < 0.0 {
        0
    } else if v > 255.0 {
        255
    } else {
        // NaN also lands here and casts to 0
        v as u8
    }
}

/// Computes unquantized Rec.601 luma of an RGB triple.
#[inline]
pub fn luma_rec601(r: u8, g: u8, b: u8) -> f64 {
    REC601_LUMA_R * r as f64 + REC601_LUMA_G * g as f64 + REC601_LUMA_B * b as f64
}

/// Rec.601 luma rounded to the nearest integer (ties away from zero).
#[inline]
pub fn luma_round(r: u8, g: u8, b: u8) -> u8 {
    clamp_u8(luma_rec601(r, g, b).round())
}

/// Rec.601 luma truncated toward zero.
#[inline]
pub fn luma_trunc(r: u8, g: u8, b: u8) -> u8 {
    clamp_u8(luma_rec601(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_luma_weights_sum_to_one() {
        assert_relative_eq!(REC601_LUMA_R + REC601_LUMA_G + REC601_LUMA_B, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_luma_of_gray_is_gray() {
        for v in [0u8, 1, 64, 128, 200, 255] {
            assert_eq!(luma_round(v, v, v), v);
        }
        assert_relative_eq!(luma_rec601(255, 255, 255), 255.0, epsilon = 1e-9);
    }

    #[test]
    fn test_luma_round_vs_trunc() {
        // 0.299*10 + 0.587*20 + 0.114*30 = 18.15
        assert_eq!(luma_round(10, 20, 30), 18);
        assert_eq!(luma_trunc(10, 20, 30), 18);
        // 0.299*255 = 76.245
        assert_eq!(luma_round(255, 0, 0), 76);
        // 0.587*255 = 149.685
        assert_eq!(luma_round(0, 255, 0), 150);
        assert_eq!(luma_trunc(0, 255, 0), 149);
    }

    #[test]
    fn test_clamp_u8() {
        assert_eq!(clamp_u8(f64::NAN), 0);
        assert_eq!(clamp_u8(-0.1), 0);
        assert_eq!(clamp_u8(0.99), 0);
        assert_eq!(clamp_u8(254.999), 254);
        assert_eq!(clamp_u8(255.0), 255);
        assert_eq!(clamp_u8(f64::INFINITY), 255);
    }

    #[test]
    fn test_channel_index() {
        assert_eq!(Channel::Red.index(), 0);
        assert_eq!(Channel::Alpha.index(), 3);
        assert_eq!(Channel::COLOR.map(Channel::index), [0, 1, 2]);
        assert_eq!(Channel::Green.to_string(), "G");
    }
}
