//! Batch processing command

use crate::BatchArgs;
use anyhow::{Context, Result, bail};
use rasterlab_ops::op::{Operation, Output, apply};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, trace, warn};

pub fn run(args: BatchArgs, verbose: bool) -> Result<()> {
    trace!(pattern = %args.input, op = %args.op, "batch::run");

    // Resolve the operation once so a typo fails before any file is touched
    let params = super::parse_params(&args.args)?;
    let op = Operation::from_name(&args.op, &params)
        .with_context(|| format!("Invalid operation '{}'", args.op))?;
    if matches!(op, Operation::Histogram) {
        bail!("'histogram' produces no image; use histogram-plot in batch mode");
    }

    // Find matching files
    let files: Vec<PathBuf> = glob::glob(&args.input)
        .with_context(|| format!("Invalid pattern: {}", args.input))?
        .filter_map(|r| r.ok())
        .collect();

    if files.is_empty() {
        bail!("No files match pattern: {}", args.input);
    }

    info!(files = files.len(), pattern = %args.input, op = %op, "Starting batch processing");

    if verbose {
        println!("Found {} files matching '{}'", files.len(), args.input);
    }

    // Two inputs writing one output would race, so refuse before any work
    let jobs = plan_outputs(&files, &args.output_dir)?;

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    // Process files in parallel
    let results: Vec<(PathBuf, Result<PathBuf>)> = jobs
        .par_iter()
        .map(|(input, output)| (input.clone(), process_file(input, output, &op, verbose)))
        .collect();

    // Report results
    let mut success = 0;
    let mut failed = 0;
    for (input, r) in results {
        match r {
            Ok(_) => success += 1,
            Err(e) => {
                failed += 1;
                warn!(input = %input.display(), error = %e, "batch item failed");
                eprintln!("Error: {}: {:#}", input.display(), e);
            }
        }
    }

    info!(success, failed, "Batch processing complete");
    println!("Processed: {} success, {} failed", success, failed);

    if failed > 0 {
        bail!("{} files failed", failed);
    }

    Ok(())
}

fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    output_dir.join(format!("{}.png", stem))
}

/// Pairs every input with its output path, failing if two inputs share one.
fn plan_outputs(files: &[PathBuf], output_dir: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut seen: HashMap<PathBuf, &Path> = HashMap::with_capacity(files.len());
    let mut jobs = Vec::with_capacity(files.len());
    for input in files {
        let output = output_path(input, output_dir);
        if let Some(first) = seen.insert(output.clone(), input) {
            bail!(
                "{} and {} would both be written to {}",
                first.display(),
                input.display(),
                output.display()
            );
        }
        jobs.push((input.clone(), output));
    }
    Ok(jobs)
}

fn process_file(input: &Path, output: &Path, op: &Operation, verbose: bool) -> Result<PathBuf> {

    if verbose {
        println!("Processing {} -> {}", input.display(), output.display());
    }

    let image = super::load_image(input)?;
    match apply(&image, op)? {
        Output::Image(result) => super::save_image(output, &result)?,
        Output::Histogram(_) => bail!("{} produced no image", op.name()),
    }
    Ok(output.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_uses_png() {
        let out = output_path(Path::new("/data/in/photo.jpeg"), Path::new("/tmp/out"));
        assert_eq!(out, Path::new("/tmp/out/photo.png"));
    }

    #[test]
    fn test_plan_outputs_rejects_shared_stem() {
        let dir = Path::new("/tmp/out");
        let files = vec![PathBuf::from("in/a.png"), PathBuf::from("in/a.jpg")];
        let err = plan_outputs(&files, dir).unwrap_err().to_string();
        assert!(err.contains("in/a.png"), "{}", err);
        assert!(err.contains("in/a.jpg"), "{}", err);

        let files = vec![PathBuf::from("in/a.png"), PathBuf::from("in/b.jpg")];
        let jobs = plan_outputs(&files, dir).unwrap();
        assert_eq!(jobs[0].1, dir.join("a.png"));
        assert_eq!(jobs[1].1, dir.join("b.png"));
    }
}
