//! Per-channel intensity histograms.
//!
//! [`histogram`] counts how often each 0-255 value occurs in R, G and B
//! (alpha is ignored). Rows are counted independently and the partial
//! counts summed, so the result does not depend on scheduling.
//!
//! [`render`] draws a bar chart of a histogram into a new buffer.
//!
//! # Example
//!
//! ```rust
//! use rasterlab_core::{Channel, PixelBuffer};
//! use rasterlab_ops::histogram::histogram;
//!
//! let img = PixelBuffer::filled(4, 2, [10, 20, 30, 0]).unwrap();
//! let h = histogram(&img);
//! assert_eq!(h.channel(Channel::Green).unwrap()[20], 8);
//! assert!(h.channel(Channel::Alpha).is_none());
//! assert_eq!(h.total(), 8);
//! ```

use crate::OpsResult;
use crate::parallel::{build_rows, fold_rows};
use crate::resize::clamp_dim;
use rasterlab_core::{CHANNELS, Channel, PixelBuffer};
use tracing::trace;

/// Number of bins per channel.
pub const BINS: usize = 256;

/// Default chart size.
pub const DEFAULT_PLOT_WIDTH: u32 = 800;
/// Default chart size.
pub const DEFAULT_PLOT_HEIGHT: u32 = 240;

/// Three 256-bin frequency tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    /// Red counts.
    pub r: [u32; BINS],
    /// Green counts.
    pub g: [u32; BINS],
    /// Blue counts.
    pub b: [u32; BINS],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            r: [0; BINS],
            g: [0; BINS],
            b: [0; BINS],
        }
    }
}

/// Summary of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    /// Smallest value present.
    pub min: u8,
    /// Largest value present.
    pub max: u8,
    /// Mean value.
    pub mean: f64,
}

impl Histogram {
    /// Counts for one color channel; `None` for [`Channel::Alpha`], which
    /// is never counted.
    pub fn channel(&self, channel: Channel) -> Option<&[u32; BINS]> {
        match channel {
            Channel::Red => Some(&self.r),
            Channel::Green => Some(&self.g),
            Channel::Blue => Some(&self.b),
            Channel::Alpha => None,
        }
    }

    /// Largest count over all three channels.
    pub fn max_count(&self) -> u32 {
        self.r
            .iter()
            .chain(&self.g)
            .chain(&self.b)
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Number of pixels counted (the sum of any one channel).
    pub fn total(&self) -> u64 {
        self.r.iter().map(|&c| c as u64).sum()
    }

    /// Counts of `channel` divided by [`max_count`](Self::max_count).
    ///
    /// All zero for an empty histogram, `None` for [`Channel::Alpha`].
    pub fn normalized(&self, channel: Channel) -> Option<[f64; BINS]> {
        let bins = self.channel(channel)?;
        let max = self.max_count();
        let mut out = [0.0; BINS];
        if max == 0 {
            return Some(out);
        }
        for (o, &c) in out.iter_mut().zip(bins) {
            *o = c as f64 / max as f64;
        }
        Some(out)
    }

    /// Min, max and mean of `channel`, or `None` if nothing was counted
    /// (always for [`Channel::Alpha`]).
    pub fn stats(&self, channel: Channel) -> Option<ChannelStats> {
        let bins = self.channel(channel)?;
        let min = bins.iter().position(|&c| c > 0)?;
        let max = bins.iter().rposition(|&c| c > 0)?;
        let sum: u64 = bins
            .iter()
            .enumerate()
            .map(|(v, &c)| v as u64 * c as u64)
            .sum();
        Some(ChannelStats {
            min: min as u8,
            max: max as u8,
            mean: sum as f64 / self.total() as f64,
        })
    }

    fn add_row(mut self, row: &[u8]) -> Self {
        for px in row.chunks_exact(CHANNELS) {
            self.r[px[0] as usize] += 1;
            self.g[px[1] as usize] += 1;
            self.b[px[2] as usize] += 1;
        }
        self
    }

    fn merge(mut self, other: Self) -> Self {
        for i in 0..BINS {
            self.r[i] += other.r[i];
            self.g[i] += other.g[i];
            self.b[i] += other.b[i];
        }
        self
    }
}

/// Counts R, G and B intensities of `src`.
pub fn histogram(src: &PixelBuffer) -> Histogram {
    trace!(width = src.width(), height = src.height(), "histogram");
    fold_rows(src, Histogram::default, Histogram::add_row, Histogram::merge)
}

// Chart colors, straight RGB plus opacity.
const GRID: ([u8; 3], f64) = ([255, 255, 255], 0.06);
const BARS: [([u8; 3], f64); 3] = [
    ([255, 95, 95], 0.9),
    ([90, 235, 130], 0.9),
    ([95, 150, 255], 0.9),
];
const GRID_LINES: u32 = 10;
const TOP_MARGIN: u32 = 20;

/// Source-over onto an opaque pixel.
#[inline]
fn blend_over(dst: &mut [u8], (rgb, alpha): ([u8; 3], f64)) {
    for c in 0..3 {
        let v = rgb[c] as f64 * alpha + dst[c] as f64 * (1.0 - alpha);
        dst[c] = v.round() as u8;
    }
    dst[3] = 255;
}

/// Draws `hist` as an opaque bar chart of `width x height` pixels.
///
/// Black background, ten faint white grid lines, then R, G and B bars
/// (in that order) at 90% opacity. Bars are `max(1, width / 256)` wide and
/// `round(count / max * (height - 20))` tall, with `max` taken over all
/// three channels. Dimensions are clamped like resize targets.
pub fn render(hist: &Histogram, width: u32, height: u32) -> OpsResult<PixelBuffer> {
    let (w, h) = (clamp_dim(width), clamp_dim(height));
    trace!(width = w, height = h, "render histogram");

    let max = hist.max_count();
    let bar_w = (w / BINS as u32).max(1) as usize;
    let usable = h.saturating_sub(TOP_MARGIN) as f64;
    let channels = [&hist.r, &hist.g, &hist.b];

    // Bar heights per channel and bin.
    let heights: Vec<[u32; BINS]> = channels
        .iter()
        .map(|bins| {
            let mut out = [0u32; BINS];
            if max > 0 {
                for (o, &c) in out.iter_mut().zip(bins.iter()) {
                    *o = (c as f64 / max as f64 * usable).round() as u32;
                }
            }
            out
        })
        .collect();

    let grid_rows: Vec<u32> = (0..GRID_LINES)
        .map(|i| (i as f64 * h as f64 / GRID_LINES as f64).round() as u32)
        .collect();

    build_rows(w, h, |y, row| {
        let y = y as u32;
        let on_grid = grid_rows.contains(&y);
        for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
            px.copy_from_slice(&[0, 0, 0, 255]);
            if on_grid {
                blend_over(px, GRID);
            }
            let bin = x / bar_w;
            if bin >= BINS {
                continue;
            }
            for (bars, &color) in heights.iter().zip(BARS.iter()) {
                // Bar occupies rows [h - bh, h).
                if y + bars[bin] >= h {
                    blend_over(px, color);
                }
            }
        }
    })
}
