//! Operation selection by name.
//!
//! [`Operation`] is the value form of every engine entry point. It can be
//! built from a name plus `key=value` parameters ([`Operation::from_name`])
//! and run with [`apply`] or, for several steps, [`apply_chain`].
//!
//! | Name                     | Parameters                          |
//! |--------------------------|-------------------------------------|
//! | `identity`, `none`       |                                     |
//! | `negative`, `invert`     |                                     |
//! | `grayscale`, `gray`      |                                     |
//! | `threshold`              | `t` (default 150)                   |
//! | `log`                    |                                     |
//! | `gamma`                  | `gamma` (default 2.2)               |
//! | `smooth`, `smoothing`    | `mode`, `strength`                  |
//! | `sharpen`                | `order`, `strength`                 |
//! | `laplacian`, `edges`     |                                     |
//! | `resize`                 | `width`, `height` (default: source) |
//! | `histogram`              |                                     |
//! | `histogram-plot`         | `width`, `height` (800 x 240)       |
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use rasterlab_core::PixelBuffer;
//! use rasterlab_ops::op::{apply, Operation};
//!
//! let params = HashMap::from([("t".to_string(), "100".to_string())]);
//! let op = Operation::from_name("threshold", &params).unwrap();
//! let img = PixelBuffer::filled(2, 2, [128, 128, 128, 255]).unwrap();
//! let out = apply(&img, &op).unwrap().into_image().unwrap();
//! assert_eq!(out.pixel(0, 0), [255, 255, 255, 255]);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::catalog::{self, SharpenOrder, SmoothingMode, Strength};
use crate::histogram::{self, DEFAULT_PLOT_HEIGHT, DEFAULT_PLOT_WIDTH, Histogram};
use crate::point::{self, DEFAULT_GAMMA, DEFAULT_THRESHOLD};
use crate::resize;
use crate::{OpsError, OpsResult};
use rasterlab_core::PixelBuffer;
use tracing::{debug, warn};

/// One engine operation with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Returns a copy of the input.
    Identity,
    /// `255 - v`.
    Negative,
    /// Truncated Rec.601 luma.
    Grayscale,
    /// Binarize on luma.
    Threshold {
        /// Level, clamped into `[0, 255]` when applied.
        level: i32,
    },
    /// Logarithmic range compression.
    Log,
    /// Power-law transform.
    Gamma {
        /// Exponent; see [`point::MIN_GAMMA`].
        gamma: f64,
    },
    /// Blur.
    Smooth {
        /// Kernel family.
        mode: SmoothingMode,
        /// Pass count.
        strength: Strength,
    },
    /// Sharpen.
    Sharpen {
        /// First or second order.
        order: SharpenOrder,
        /// Pass count or Laplacian weight.
        strength: Strength,
    },
    /// Laplacian magnitude map.
    LaplacianEdge,
    /// Nearest-neighbor resize; `None` keeps the source dimension.
    Resize {
        /// Target width.
        width: Option<u32>,
        /// Target height.
        height: Option<u32>,
    },
    /// Channel histogram.
    Histogram,
    /// Histogram rendered as a chart image.
    HistogramPlot {
        /// Chart width.
        width: u32,
        /// Chart height.
        height: u32,
    },
}

/// Result of an [`Operation`].
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// A new image.
    Image(PixelBuffer),
    /// Histogram counts.
    Histogram(Histogram),
}

impl Output {
    /// Returns the image, if this is one.
    pub fn into_image(self) -> Option<PixelBuffer> {
        match self {
            Output::Image(img) => Some(img),
            Output::Histogram(_) => None,
        }
    }

    /// Returns the histogram, if this is one.
    pub fn as_histogram(&self) -> Option<&Histogram> {
        match self {
            Output::Histogram(h) => Some(h),
            Output::Image(_) => None,
        }
    }
}

fn param<T: FromStr>(params: &HashMap<String, String>, key: &str) -> OpsResult<Option<T>>
where
    T::Err: fmt::Display,
{
    match params.get(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            OpsError::InvalidParameter(format!("{}='{}': {}", key, raw, e))
        }),
    }
}

impl Operation {
    /// Parameter keys each operation understands.
    fn known_keys(&self) -> &'static [&'static str] {
        match self {
            Operation::Threshold { .. } => &["t"],
            Operation::Gamma { .. } => &["gamma"],
            Operation::Smooth { .. } => &["mode", "strength"],
            Operation::Sharpen { .. } => &["order", "strength"],
            Operation::Resize { .. } | Operation::HistogramPlot { .. } => &["width", "height"],
            _ => &[],
        }
    }

    /// Builds an operation from its name and string parameters.
    ///
    /// Names are case-insensitive. Missing parameters take their defaults;
    /// unknown keys are ignored with a warning.
    ///
    /// # Errors
    ///
    /// - [`OpsError::Unsupported`] for an unknown name
    /// - [`OpsError::InvalidParameter`] for a value that does not parse
    pub fn from_name(name: &str, params: &HashMap<String, String>) -> OpsResult<Self> {
        let op = match name.trim().to_ascii_lowercase().as_str() {
            "identity" | "none" => Operation::Identity,
            "negative" | "invert" => Operation::Negative,
            "grayscale" | "gray" => Operation::Grayscale,
            "threshold" => Operation::Threshold {
                level: param(params, "t")?.unwrap_or(DEFAULT_THRESHOLD as i32),
            },
            "log" => Operation::Log,
            "gamma" => Operation::Gamma {
                gamma: param(params, "gamma")?.unwrap_or(DEFAULT_GAMMA),
            },
            "smooth" | "smoothing" => Operation::Smooth {
                mode: param(params, "mode")?.unwrap_or_default(),
                strength: param(params, "strength")?.unwrap_or_default(),
            },
            "sharpen" => Operation::Sharpen {
                order: param(params, "order")?.unwrap_or_default(),
                strength: param(params, "strength")?.unwrap_or_default(),
            },
            "laplacian" | "edges" => Operation::LaplacianEdge,
            "resize" => Operation::Resize {
                width: param(params, "width")?,
                height: param(params, "height")?,
            },
            "histogram" => Operation::Histogram,
            "histogram-plot" => Operation::HistogramPlot {
                width: param(params, "width")?.unwrap_or(DEFAULT_PLOT_WIDTH),
                height: param(params, "height")?.unwrap_or(DEFAULT_PLOT_HEIGHT),
            },
            other => return Err(OpsError::Unsupported(other.to_string())),
        };

        let known = op.known_keys();
        for key in params.keys().filter(|k| !known.contains(&k.as_str())) {
            warn!(op = op.name(), key = %key, "ignoring unknown parameter");
        }
        Ok(op)
    }

    /// Canonical name, accepted by [`from_name`](Self::from_name).
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Identity => "identity",
            Operation::Negative => "negative",
            Operation::Grayscale => "grayscale",
            Operation::Threshold { .. } => "threshold",
            Operation::Log => "log",
            Operation::Gamma { .. } => "gamma",
            Operation::Smooth { .. } => "smooth",
            Operation::Sharpen { .. } => "sharpen",
            Operation::LaplacianEdge => "laplacian",
            Operation::Resize { .. } => "resize",
            Operation::Histogram => "histogram",
            Operation::HistogramPlot { .. } => "histogram-plot",
        }
    }

    /// All canonical names.
    pub const NAMES: [&'static str; 12] = [
        "identity",
        "negative",
        "grayscale",
        "threshold",
        "log",
        "gamma",
        "smooth",
        "sharpen",
        "laplacian",
        "resize",
        "histogram",
        "histogram-plot",
    ];
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Threshold { level } => write!(f, "threshold(t={})", level),
            Operation::Gamma { gamma } => write!(f, "gamma({})", gamma),
            Operation::Smooth { mode, strength } => write!(f, "smooth({}, {})", mode, strength),
            Operation::Sharpen { order, strength } => {
                write!(f, "sharpen({}, {})", order, strength)
            }
            Operation::Resize { width, height } => {
                let dim = |v: &Option<u32>| v.map_or_else(|| "src".to_string(), |v| v.to_string());
                write!(f, "resize({}x{})", dim(width), dim(height))
            }
            Operation::HistogramPlot { width, height } => {
                write!(f, "histogram-plot({}x{})", width, height)
            }
            other => f.write_str(other.name()),
        }
    }
}

/// Runs `op` on `src`.
pub fn apply(src: &PixelBuffer, op: &Operation) -> OpsResult<Output> {
    debug!(op = %op, width = src.width(), height = src.height(), "apply");
    let img = match *op {
        Operation::Identity => src.clone(),
        Operation::Negative => point::negative(src)?,
        Operation::Grayscale => point::grayscale(src)?,
        Operation::Threshold { level } => point::threshold(src, level)?,
        Operation::Log => point::log_transform(src)?,
        Operation::Gamma { gamma } => point::gamma_transform(src, gamma)?,
        Operation::Smooth { mode, strength } => catalog::smooth(src, mode, strength)?,
        Operation::Sharpen { order, strength } => catalog::sharpen(src, order, strength)?,
        Operation::LaplacianEdge => catalog::laplacian_edge(src)?,
        Operation::Resize { width, height } => resize::resize(
            src,
            width.unwrap_or(src.width()),
            height.unwrap_or(src.height()),
        )?,
        Operation::Histogram => return Ok(Output::Histogram(histogram::histogram(src))),
        Operation::HistogramPlot { width, height } => {
            histogram::render(&histogram::histogram(src), width, height)?
        }
    };
    Ok(Output::Image(img))
}

/// Runs `ops` in order, feeding each image into the next step.
///
/// An empty chain returns a copy of `src`.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] if a histogram result would have to be
/// fed into a further operation, plus any error of the individual steps.
pub fn apply_chain(src: &PixelBuffer, ops: &[Operation]) -> OpsResult<Output> {
    let mut current = Output::Image(src.clone());
    for (i, op) in ops.iter().enumerate() {
        current = match current {
            Output::Image(img) => apply(&img, op)?,
            Output::Histogram(_) => {
                return Err(OpsError::InvalidParameter(format!(
                    "step {} ({}) follows a histogram result",
                    i + 1,
                    op.name()
                )));
            }
        };
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_names_round_trip() {
        for name in Operation::NAMES {
            let op = Operation::from_name(name, &HashMap::new()).unwrap();
            assert_eq!(op.name(), name);
        }
    }

    #[test]
    fn test_aliases_and_case() {
        let empty = HashMap::new();
        assert_eq!(
            Operation::from_name("INVERT", &empty).unwrap(),
            Operation::Negative
        );
        assert_eq!(
            Operation::from_name("edges", &empty).unwrap(),
            Operation::LaplacianEdge
        );
        assert_eq!(
            Operation::from_name("smoothing", &empty).unwrap(),
            Operation::Smooth {
                mode: SmoothingMode::Weighted,
                strength: Strength::Medium
            }
        );
    }

    #[test]
    fn test_defaults() {
        let empty = HashMap::new();
        assert_eq!(
            Operation::from_name("threshold", &empty).unwrap(),
            Operation::Threshold { level: 150 }
        );
        assert_eq!(
            Operation::from_name("gamma", &empty).unwrap(),
            Operation::Gamma { gamma: 2.2 }
        );
        assert_eq!(
            Operation::from_name("resize", &empty).unwrap(),
            Operation::Resize {
                width: None,
                height: None
            }
        );
    }

    #[test]
    fn test_parses_params() {
        let op = Operation::from_name(
            "sharpen",
            &params(&[("order", "second"), ("strength", "high")]),
        )
        .unwrap();
        assert_eq!(
            op,
            Operation::Sharpen {
                order: SharpenOrder::Second,
                strength: Strength::High
            }
        );
        let op = Operation::from_name("resize", &params(&[("width", "64")])).unwrap();
        assert_eq!(
            op,
            Operation::Resize {
                width: Some(64),
                height: None
            }
        );
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            Operation::from_name("sepia", &HashMap::new()),
            Err(OpsError::Unsupported(_))
        ));
        assert!(matches!(
            Operation::from_name("threshold", &params(&[("t", "high")])),
            Err(OpsError::InvalidParameter(_))
        ));
        assert!(matches!(
            Operation::from_name("smooth", &params(&[("mode", "median")])),
            Err(OpsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_resize_defaults_to_source() {
        let img = PixelBuffer::filled(6, 4, [1, 2, 3, 4]).unwrap();
        let op = Operation::Resize {
            width: Some(3),
            height: None,
        };
        let out = apply(&img, &op).unwrap().into_image().unwrap();
        assert_eq!(out.dimensions(), (3, 4));
    }

    #[test]
    fn test_histogram_output() {
        let img = PixelBuffer::filled(2, 3, [5, 6, 7, 8]).unwrap();
        let out = apply(&img, &Operation::Histogram).unwrap();
        assert_eq!(out.as_histogram().unwrap().r[5], 6);
        assert!(out.into_image().is_none());
    }

    #[test]
    fn test_chain() {
        let img = PixelBuffer::filled(2, 2, [128, 128, 128, 255]).unwrap();
        let out = apply_chain(&img, &[Operation::Negative, Operation::Negative])
            .unwrap()
            .into_image()
            .unwrap();
        assert_eq!(out, img);
        assert_eq!(apply_chain(&img, &[]).unwrap(), Output::Image(img.clone()));

        let err = apply_chain(&img, &[Operation::Histogram, Operation::Negative]);
        assert!(matches!(err, Err(OpsError::InvalidParameter(_))));
    }

    #[test]
    fn test_display() {
        let op = Operation::Smooth {
            mode: SmoothingMode::Mean,
            strength: Strength::Low,
        };
        assert_eq!(op.to_string(), "smooth(mean, low)");
        assert_eq!(Operation::Log.to_string(), "log");
    }
}
