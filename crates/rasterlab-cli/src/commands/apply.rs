//! Apply command: one operation or a chain on a single image.

use crate::ApplyArgs;
use anyhow::{Context, Result, bail};
use rasterlab_ops::op::{Operation, Output, apply_chain};
use tracing::{debug, info, trace};

pub fn run(args: ApplyArgs, verbose: bool) -> Result<()> {
    if args.list {
        for name in Operation::NAMES {
            println!("{}", name);
        }
        return Ok(());
    }

    let Some(op_name) = args.op.as_deref() else {
        bail!("--op is required");
    };
    trace!(input = %args.input.display(), op = op_name, "apply::run");

    let params = super::parse_params(&args.args)?;
    let first = Operation::from_name(op_name, &params)
        .with_context(|| format!("Invalid operation '{}'", op_name))?;
    let mut ops = vec![first];
    for step in &args.then {
        ops.push(super::parse_step(step)?);
    }
    debug!(steps = ops.len(), "operation chain");

    let image = super::load_image(&args.input)?;
    if verbose {
        let names: Vec<String> = ops.iter().map(|op| op.to_string()).collect();
        println!(
            "{} ({}x{}): {}",
            args.input.display(),
            image.width(),
            image.height(),
            names.join(" -> ")
        );
    }

    match apply_chain(&image, &ops)? {
        Output::Image(result) => {
            let Some(output) = args.output.as_deref() else {
                bail!("--output is required for image results");
            };
            super::save_image(output, &result)?;
            info!(output = %output.display(), "written");
            if verbose {
                println!("Wrote {} ({}x{})", output.display(), result.width(), result.height());
            }
        }
        Output::Histogram(hist) => {
            super::histogram::print_summary(&hist);
        }
    }
    Ok(())
}
