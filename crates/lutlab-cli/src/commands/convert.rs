//! LUT conversion command

use crate::ConvertArgs;
use anyhow::{Context, Result};
use lutlab_lut::{ConvertOptions, Domain, FormatRegistry};
use tracing::{debug, trace};

pub fn run(args: ConvertArgs, verbose: u8) -> Result<()> {
    trace!(inputs = args.inputs.len(), output = ?args.output, "convert::run");

    let source_format = args
        .from
        .as_deref()
        .map(|tag| FormatRegistry::global().resolve(tag))
        .transpose()?;
    let input_range = super::range(args.input_range.as_deref())?
        .map(|[min, max]| Domain::new(min, max))
        .transpose()?;
    let base = ConvertOptions {
        source_format,
        interpolation: args.interpolation.into(),
        inverse: args.inverse,
        smooth_size: args.smooth_size,
        input_range,
        ..Default::default()
    };
    let options = super::export_options(&args.export, base)?;
    debug!(?options, "convert options");

    let names: Vec<String> = args.inputs.iter().map(|p| p.display().to_string()).collect();
    if verbose > 0 {
        let (target, _) = lutlab_lut::resolve_output(
            &args.inputs,
            args.output.as_deref(),
            options.target_format,
            options.source_format,
        )?;
        println!("Converting {} -> {}", names.join(" + "), target.display());
    }
    let report = lutlab_lut::convert_many(&args.inputs, args.output.as_deref(), &options)
        .with_context(|| format!("Failed to convert {}", names.join(" + ")))?;
    super::report(&report, verbose);
    Ok(())
}
