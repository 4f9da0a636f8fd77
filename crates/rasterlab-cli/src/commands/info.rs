//! Image info command.
//!
//! Prints dimensions and per-channel min/max/mean for each input.

use crate::InfoArgs;
use anyhow::Result;
use rasterlab_core::{Channel, PixelBuffer};
use rasterlab_ops::histogram::{Histogram, histogram};
use serde_json::json;
use std::path::Path;
use tracing::trace;

/// Runs the info command.
pub fn run(args: InfoArgs, verbose: bool) -> Result<()> {
    for path in &args.input {
        trace!(path = %path.display(), "info::run");
        let image = super::load_image(path)?;
        let hist = histogram(&image);

        if args.json {
            println!("{}", serde_json::to_string_pretty(&to_json(path, &image, &hist))?);
        } else {
            print_text(path, &image, &hist, verbose);
        }

        if args.input.len() > 1 {
            println!();
        }
    }
    Ok(())
}

fn print_text(path: &Path, image: &PixelBuffer, hist: &Histogram, verbose: bool) {
    println!("{}", path.display());
    println!("  Resolution: {}x{}", image.width(), image.height());
    println!("  Pixels:     {}", image.pixel_count());
    for ch in Channel::COLOR {
        if let Some(s) = hist.stats(ch) {
            println!(
                "  {}           min {:>3}  max {:>3}  mean {:.2}",
                ch, s.min, s.max, s.mean
            );
        }
    }
    if verbose {
        let opaque = image.pixels().filter(|p| p[3] == 255).count();
        println!("  Opaque:     {} of {}", opaque, image.pixel_count());
        println!("  Peak bin:   {}", hist.max_count());
    }
}

fn to_json(path: &Path, image: &PixelBuffer, hist: &Histogram) -> serde_json::Value {
    let channels: serde_json::Map<String, serde_json::Value> = Channel::COLOR
        .iter()
        .filter_map(|&ch| {
            hist.stats(ch).map(|s| {
                (
                    ch.to_string().to_lowercase(),
                    json!({ "min": s.min, "max": s.max, "mean": s.mean }),
                )
            })
        })
        .collect();
    json!({
        "file": path.display().to_string(),
        "width": image.width(),
        "height": image.height(),
        "channels": channels,
    })
}
