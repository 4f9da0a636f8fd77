//! rasterlab - raster image-processing CLI
//!
//! Point transforms, 3x3 filters, nearest-neighbor resize and histograms
//! on PNG files.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "rasterlab")]
#[command(author, version, about = "Raster image-processing engine")]
#[command(long_about = "
Pure per-pixel and 3x3-neighborhood operations on RGBA PNG images.

Examples:
  rasterlab info photo.png
  rasterlab apply photo.png -o neg.png --op negative
  rasterlab apply photo.png -o t.png --op threshold --arg t=120
  rasterlab apply photo.png -o s.png --op smooth --arg mode=mean --arg strength=high
  rasterlab apply photo.png -o e.png --op grayscale --then laplacian
  rasterlab histogram photo.png --plot hist.png
  rasterlab batch -i 'in/*.png' -o out --op gamma --arg gamma=1.8
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dimensions and per-channel statistics
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Apply one operation (or a chain) and write the result
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),

    /// Print or plot channel histograms
    #[command(visible_alias = "h")]
    Histogram(HistogramArgs),

    /// Apply one operation to many files in parallel
    Batch(BatchArgs),
}

#[derive(Args)]
struct InfoArgs {
    /// Input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ApplyArgs {
    /// Input image
    input: PathBuf,

    /// Output image (required unless the result is a histogram)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Operation name (see `--list`)
    #[arg(long, required_unless_present = "list")]
    op: Option<String>,

    /// Operation parameter (key=value), repeatable
    #[arg(long = "arg", value_name = "KEY=VALUE")]
    args: Vec<String>,

    /// Further operation, `name` or `name:key=value,key=value`; repeatable
    #[arg(long, value_name = "STEP")]
    then: Vec<String>,

    /// List operation names and exit
    #[arg(long)]
    list: bool,
}

#[derive(Args)]
struct HistogramArgs {
    /// Input image
    input: PathBuf,

    /// Render the histogram chart to this PNG
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Chart width
    #[arg(long, default_value_t = rasterlab_ops::histogram::DEFAULT_PLOT_WIDTH)]
    width: u32,

    /// Chart height
    #[arg(long, default_value_t = rasterlab_ops::histogram::DEFAULT_PLOT_HEIGHT)]
    height: u32,

    /// Print all 256 bins per channel as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct BatchArgs {
    /// Input pattern (glob)
    #[arg(short, long)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Operation to apply
    #[arg(long)]
    op: String,

    /// Operation arguments (key=value)
    #[arg(short, long = "arg")]
    args: Vec<String>,
}

/// Installs the stderr log subscriber; `-v` forces `debug`, otherwise
/// `RUST_LOG` applies with `warn` as fallback.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Apply(args) => commands::apply::run(args, cli.verbose),
        Commands::Histogram(args) => commands::histogram::run(args, cli.verbose),
        Commands::Batch(args) => commands::batch::run(args, cli.verbose),
    }
}
