//! Histogram command.

use crate::HistogramArgs;
use anyhow::Result;
use rasterlab_core::Channel;
use rasterlab_ops::histogram::{Histogram, histogram, render};
use serde_json::json;
use tracing::trace;

/// Number of text buckets (32 bins each).
const BUCKETS: usize = 8;

pub fn run(args: HistogramArgs, verbose: bool) -> Result<()> {
    trace!(input = %args.input.display(), "histogram::run");
    let image = super::load_image(&args.input)?;
    let hist = histogram(&image);

    if args.json {
        let value = json!({
            "file": args.input.display().to_string(),
            "pixels": hist.total(),
            "r": hist.r.to_vec(),
            "g": hist.g.to_vec(),
            "b": hist.b.to_vec(),
        });
        println!("{}", serde_json::to_string(&value)?);
    } else {
        print_summary(&hist);
    }

    if let Some(plot) = &args.plot {
        let chart = render(&hist, args.width, args.height)?;
        super::save_image(plot, &chart)?;
        if verbose {
            println!("Wrote {} ({}x{})", plot.display(), chart.width(), chart.height());
        }
    }
    Ok(())
}

/// Prints counts grouped into coarse buckets plus channel statistics.
pub fn print_summary(hist: &Histogram) {
    let width = 256 / BUCKETS;
    println!("Pixels: {}  peak bin: {}", hist.total(), hist.max_count());
    for ch in Channel::COLOR {
        let Some(bins) = hist.channel(ch) else {
            continue;
        };
        let buckets: Vec<String> = bins
            .chunks(width)
            .map(|c| c.iter().map(|&n| n as u64).sum::<u64>().to_string())
            .collect();
        match hist.stats(ch) {
            Some(s) => println!(
                "{}: [{}]  min {} max {} mean {:.2}",
                ch,
                buckets.join(" "),
                s.min,
                s.max,
                s.mean
            ),
            None => println!("{}: empty", ch),
        }
    }
}
