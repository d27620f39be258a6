//! CLI command implementations

pub mod batch;
pub mod convert;
pub mod curve;
pub mod list;
pub mod matrix;

use crate::ExportArgs;
use anyhow::{Result, bail};
use lutlab_lut::{ConvertOptions, ConvertReport, ExportPreset, FormatHandler, FormatRegistry, LutError};
use lutlab_primaries::PrimariesError;
use std::io;

/// Exit code for a failed command: 2 for filesystem failures, 1 otherwise.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<LutError>() {
            return if e.is_io() { 2 } else { 1 };
        }
        if cause.is::<PrimariesError>() {
            return 1;
        }
        if cause.is::<io::Error>() {
            return 2;
        }
    }
    1
}

/// Parses a `[MIN, MAX]` pair given as two CLI values.
pub fn range(values: Option<&[f32]>) -> Result<Option<[f32; 2]>> {
    match values {
        None => Ok(None),
        Some(&[min, max]) => Ok(Some([min, max])),
        Some(other) => bail!("expected MIN MAX, got {} values", other.len()),
    }
}

/// Export options from the shared flags, merged with the preset if any.
pub fn export_options(args: &ExportArgs, mut options: ConvertOptions) -> Result<ConvertOptions> {
    options.target_format = args
        .to
        .as_deref()
        .map(|tag| FormatRegistry::global().resolve(tag))
        .transpose()?;
    options.target_size = args.size;
    options.target_dimensionality = args.lut_type;
    options.precision = args.bit_depth;
    options.output_range = range(args.output_range.as_deref())?;
    options.title = args.title.clone();

    match &args.preset {
        Some(name) => Ok(ExportPreset::find(name)?.apply(&options, args.overwrite_preset)?),
        None => Ok(options),
    }
}

/// Prints the standard success line.
pub fn report(report: &ConvertReport, verbose: u8) {
    if verbose > 0 {
        println!(
            "{} {} LUT, size {}, precision {}",
            report.format.tag(),
            report.dimensionality,
            report.size,
            report.precision
        );
    }
    println!("a new LUT was written in {}", report.path.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_codes() {
        let parse = anyhow::Error::from(LutError::at_line(3, "bad"));
        assert_eq!(exit_code(&parse), 1);

        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        let wrapped = Err::<(), _>(LutError::Io(missing)).context("Failed to read look.cube");
        assert_eq!(exit_code(&wrapped.unwrap_err()), 2);

        let unknown = anyhow::Error::from(PrimariesError::UnknownColorspace("x".into()));
        assert_eq!(exit_code(&unknown), 1);

        let raw_io = anyhow::Error::from(io::Error::other("disk"));
        assert_eq!(exit_code(&raw_io), 2);
        assert_eq!(exit_code(&anyhow::anyhow!("usage")), 1);
    }

    #[test]
    fn test_range() {
        assert_eq!(range(None).unwrap(), None);
        assert_eq!(range(Some(&[0.0, 2.0])).unwrap(), Some([0.0, 2.0]));
        assert!(range(Some(&[1.0])).is_err());
    }
}
