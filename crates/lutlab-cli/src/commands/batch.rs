//! Batch conversion command

use crate::BatchArgs;
use anyhow::{Context, Result, anyhow, bail};
use lutlab_lut::{ConvertOptions, ConvertReport, FormatHandler, FormatRegistry};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, trace};

pub fn run(args: BatchArgs, verbose: u8) -> Result<()> {
    trace!(pattern = %args.input, to = %args.to, "batch::run");

    let files: Vec<PathBuf> = glob::glob(&args.input)
        .with_context(|| format!("Invalid pattern: {}", args.input))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    if files.is_empty() {
        bail!("No files match pattern: {}", args.input);
    }

    let format = FormatRegistry::global().resolve(&args.to)?;
    let options = ConvertOptions {
        target_format: Some(format),
        target_size: args.size,
        target_dimensionality: args.lut_type,
        interpolation: args.interpolation.into(),
        precision: args.bit_depth,
        ..Default::default()
    };

    info!(files = files.len(), pattern = %args.input, format = format.tag(), "Starting batch conversion");
    if verbose > 0 {
        println!("Found {} files matching '{}'", files.len(), args.input);
    }

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    let results: Vec<Result<ConvertReport>> = files
        .par_iter()
        .map(|input| convert_one(input, &args.output_dir, format.tag(), &options))
        .collect();

    let mut success = 0;
    let mut errors = Vec::new();
    for r in results {
        match r {
            Ok(report) => {
                success += 1;
                if verbose > 0 {
                    println!("a new LUT was written in {}", report.path.display());
                }
            }
            Err(e) => {
                eprintln!("Error: {e:#}");
                errors.push(e);
            }
        }
    }

    info!(success, failed = errors.len(), "Batch conversion complete");
    println!("Processed: {} success, {} failed", success, errors.len());

    let failed = errors.len();
    match errors.into_iter().next() {
        Some(first) => Err(first.context(format!("{failed} of {} conversions failed", files.len()))),
        None => Ok(()),
    }
}

fn convert_one(input: &Path, output_dir: &Path, ext: &str, options: &ConvertOptions) -> Result<ConvertReport> {
    let stem = input
        .file_stem()
        .ok_or_else(|| anyhow!("No file name: {}", input.display()))?;
    let mut output = output_dir.join(stem);
    output.set_extension(ext);
    lutlab_lut::convert(input, &output, options)
        .with_context(|| format!("Failed to convert {}", input.display()))
}
