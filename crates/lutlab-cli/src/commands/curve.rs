//! Curve to LUT command

use crate::CurveArgs;
use anyhow::{Context, Result};
use lutlab_lut::{ConvertOptions, CurveRegistry, Direction, Domain};
use tracing::{debug, trace};

pub fn run(args: CurveArgs, verbose: u8) -> Result<()> {
    trace!(curve = %args.name, output = %args.output.display(), "curve::run");

    let direction: Direction = args.direction.into();
    let requested = super::range(args.domain.as_deref())?
        .map(|[min, max]| Domain::new(min, max))
        .transpose()?;
    let base = ConvertOptions { input_range: requested, ..Default::default() };
    let options = super::export_options(&args.export, base)?;

    let domain = if args.process_input_range {
        let curve = CurveRegistry::global().get(&args.name)?;
        curve.natural_domain(direction)
    } else {
        options.input_range.unwrap_or(Domain::UNIT)
    };
    debug!(min = domain.min, max = domain.max, %direction, "curve domain");

    let report = lutlab_lut::sample_curve_to_file(&args.name, direction, domain, &args.output, &options)
        .with_context(|| format!("Failed to sample curve {}", args.name))?;
    super::report(&report, verbose);
    Ok(())
}
