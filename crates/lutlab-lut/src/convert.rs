//! End-to-end conversion requests.
//!
//! A request reads one or more source LUTs (or samples a named curve),
//! adapts the result to the target format and writes it:
//!
//! 1. read and parse every source, format from `--from` or the extension;
//!    several sources are chained in order into one LUT
//! 2. invert, if asked
//! 3. smooth through a coarse subsample, if asked (1D/2D only)
//! 4. pick the target dimensionality; a 1D LUT is promoted to 2D when the
//!    target format only stores three channels
//! 5. resample when size, shape or input domain change
//! 6. rescale output values, set the title
//! 7. serialize, then write the file
//!
//! Without an explicit output the file lands next to the first source as
//! `<first>+<second>..._export.<ext>`; an existing directory as output
//! receives `<first>.<ext>`.
//!
//! Nothing touches the filesystem until serialization succeeded, so a
//! failed request never leaves a partial or empty output file behind.

use crate::chain;
use crate::curve::{self, Direction};
use crate::formats::{FormatHandler, LutFormat, WriteOptions};
use crate::interp::Interpolation;
use crate::lut::{Dimensionality, Domain, Lut};
use crate::registry::FormatRegistry;
use crate::resample::{self, ResampleOptions};
use crate::{LutError, LutResult, Precision};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

/// Knobs shared by every conversion request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertOptions {
    /// Source format; `None` resolves from the source extension.
    pub source_format: Option<LutFormat>,
    /// Target format; `None` resolves from the target extension.
    pub target_format: Option<LutFormat>,
    /// Samples per dimension; `None` keeps the source size.
    pub target_size: Option<usize>,
    /// Output shape; `None` keeps the source shape (promoting 1D if needed).
    pub target_dimensionality: Option<Dimensionality>,
    /// 3D interpolation method.
    pub interpolation: Interpolation,
    /// Output precision; `None` lets the format decide.
    pub precision: Option<Precision>,
    /// Invert the source (1D/2D only) before anything else.
    pub inverse: bool,
    /// Smooth a 1D/2D LUT through this many points before resizing.
    pub smooth_size: Option<usize>,
    /// Resample onto this input domain.
    pub input_range: Option<Domain>,
    /// Rescale `[0, 1]` output values to `[min, max]`.
    pub output_range: Option<[f32; 2]>,
    /// Title stored in the `title` metadata key.
    pub title: Option<String>,
}

/// Outcome of a successful request.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertReport {
    /// Written file.
    pub path: PathBuf,
    /// Format written.
    pub format: LutFormat,
    /// Shape written.
    pub dimensionality: Dimensionality,
    /// Samples per dimension written.
    pub size: usize,
    /// Sample precision written.
    pub precision: Precision,
}

fn format_for(path: &Path, explicit: Option<LutFormat>) -> LutResult<LutFormat> {
    match explicit {
        Some(format) => Ok(format),
        None => FormatRegistry::global().resolve_path(path),
    }
}

/// Reads and parses a LUT file.
pub fn read_lut(path: &Path, format: Option<LutFormat>) -> LutResult<(Lut, LutFormat)> {
    let format = format_for(path, format)?;
    let bytes = fs::read(path)?;
    trace!(path = %path.display(), format = format.tag(), bytes = bytes.len(), "read");
    Ok((format.read(&bytes)?, format))
}

/// Picks the dimensionality `format` will store for a `source` LUT.
fn target_dimensionality(
    source: Dimensionality,
    requested: Option<Dimensionality>,
    format: LutFormat,
) -> LutResult<Dimensionality> {
    let dim = requested.unwrap_or(source);
    if format.supports(dim) {
        return Ok(dim);
    }
    if requested.is_none() && dim == Dimensionality::OneD && format.supports(Dimensionality::TwoD) {
        debug!(format = format.tag(), "promoting 1D LUT to 2D");
        return Ok(Dimensionality::TwoD);
    }
    Err(LutError::IncompatibleConversion(format!(
        "{} cannot store a {dim} LUT",
        format.tag()
    )))
}

/// Adapts `lut` to what `format` can store, applying `options`.
pub fn prepare(lut: Lut, format: LutFormat, options: &ConvertOptions) -> LutResult<Lut> {
    let lut = if options.inverse {
        debug!("inverting source LUT");
        resample::invert(&lut)?
    } else {
        lut
    };

    let size = options.target_size.unwrap_or(lut.size());
    let lut = match options.smooth_size {
        Some(points) => {
            debug!(points, size, "smoothing source LUT");
            resample::smooth(&lut, points, size)?
        }
        None => lut,
    };

    let dim = target_dimensionality(lut.dimensionality(), options.target_dimensionality, format)?;
    let domain_changes = options
        .input_range
        .is_some_and(|d| lut.domains().iter().any(|&own| own != d));
    let mut lut = if size != lut.size() || dim != lut.dimensionality() || domain_changes {
        let resample_options = ResampleOptions {
            interpolation: options.interpolation,
            domain: options.input_range,
        };
        resample::resample(&lut, size, Some(dim), &resample_options)?
    } else {
        lut
    };

    if let Some([lo, hi]) = options.output_range {
        if !(lo.is_finite() && hi.is_finite()) || lo >= hi {
            return Err(LutError::InvalidLut(format!("invalid output range [{lo}, {hi}]")));
        }
        if (lo, hi) != (0.0, 1.0) {
            debug!(lo, hi, "rescaling output values");
            lut = lut.map_values(|v| lo + v * (hi - lo))?;
        }
    }
    if let Some(title) = &options.title {
        lut = lut.with_title(title.clone());
    }
    Ok(lut)
}

/// Serializes `lut` for `format` and writes it to `path`.
pub fn write_lut(
    lut: &Lut,
    path: &Path,
    format: LutFormat,
    precision: Option<Precision>,
) -> LutResult<ConvertReport> {
    let options = WriteOptions { precision };
    let precision = format.output_precision(lut, &options)?;
    let bytes = format.write(lut, &options)?;
    fs::write(path, &bytes)?;
    info!(path = %path.display(), format = format.tag(), bytes = bytes.len(), "wrote LUT");
    Ok(ConvertReport {
        path: path.to_path_buf(),
        format,
        dimensionality: lut.dimensionality(),
        size: lut.size(),
        precision,
    })
}

/// Output path and format for a conversion of `sources`.
///
/// - no `output`: `<first source dir>/<first stem>+<other stems>_export.<ext>`
/// - an existing directory: `<dir>/<first stem>.<ext>`
/// - anything else is the output file itself
///
/// The format is `target_format` when given, else the output extension
/// for a file path, else the first source's format.
pub fn resolve_output(
    sources: &[PathBuf],
    output: Option<&Path>,
    target_format: Option<LutFormat>,
    source_format: Option<LutFormat>,
) -> LutResult<(PathBuf, LutFormat)> {
    let Some(first) = sources.first() else {
        return Err(LutError::InvalidLut("no input LUT given".into()));
    };
    let stem = |p: &Path| {
        p.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "lut".into())
    };
    match output {
        Some(path) if !path.is_dir() => Ok((path.to_path_buf(), format_for(path, target_format)?)),
        _ => {
            let format = match target_format {
                Some(format) => format,
                None => format_for(first, source_format)?,
            };
            let ext = format.extensions().first().copied().unwrap_or_else(|| format.tag());
            let path = match output {
                Some(dir) => dir.join(format!("{}.{ext}", stem(first.as_path()))),
                None => {
                    let names: Vec<String> = sources.iter().map(|p| stem(p.as_path())).collect();
                    first.with_file_name(format!("{}_export.{ext}", names.join("+")))
                }
            };
            Ok((path, format))
        }
    }
}

/// Converts the LUT at `source` and writes it to `target`.
///
/// ```no_run
/// use lutlab_lut::{convert, ConvertOptions};
/// use std::path::Path;
///
/// let options = ConvertOptions { target_size: Some(17), ..Default::default() };
/// let report = convert(Path::new("look.cube"), Path::new("look.3dl"), &options)?;
/// println!("a new LUT was written in {}", report.path.display());
/// # Ok::<(), lutlab_lut::LutError>(())
/// ```
pub fn convert(source: &Path, target: &Path, options: &ConvertOptions) -> LutResult<ConvertReport> {
    convert_many(&[source.to_path_buf()], Some(target), options)
}

/// Chains the LUTs at `sources` in order and writes the result.
///
/// `output` follows [`resolve_output`].
pub fn convert_many(
    sources: &[PathBuf],
    output: Option<&Path>,
    options: &ConvertOptions,
) -> LutResult<ConvertReport> {
    let (target, target_format) =
        resolve_output(sources, output, options.target_format, options.source_format)?;
    let mut luts = Vec::with_capacity(sources.len());
    for source in sources {
        let (lut, source_format) = read_lut(source, options.source_format)?;
        debug!(
            source = source_format.tag(),
            target = target_format.tag(),
            dim = %lut.dimensionality(),
            size = lut.size(),
            "convert"
        );
        luts.push(lut);
    }
    let lut = chain::chain(&luts, options.interpolation)?;
    let lut = prepare(lut, target_format, options)?;
    write_lut(&lut, &target, target_format, options.precision)
}

/// Samples a named curve and writes it to `target`.
///
/// `domain` is the curve input range. `options.target_size` is the sample
/// count (default 1024).
pub fn sample_curve_to_file(
    curve_name: &str,
    direction: Direction,
    domain: Domain,
    target: &Path,
    options: &ConvertOptions,
) -> LutResult<ConvertReport> {
    let format = format_for(target, options.target_format)?;
    let size = options.target_size.unwrap_or(DEFAULT_CURVE_SIZE);
    let lut = curve::sample_directed(curve_name, direction, size, domain)?;
    let curve_options = ConvertOptions {
        target_size: None,
        inverse: false,
        smooth_size: None,
        input_range: None,
        ..options.clone()
    };
    let lut = prepare(lut, format, &curve_options)?;
    write_lut(&lut, target, format, options.precision)
}

/// Sample count used when a curve request gives none.
pub const DEFAULT_CURVE_SIZE: usize = 1024;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_promotes_1d_for_cube() {
        let lut = Lut::one_d(vec![0.0, 0.5, 1.0], Domain::UNIT).unwrap();
        let out = prepare(lut, LutFormat::Cube, &ConvertOptions::default()).unwrap();
        assert_eq!(out.dimensionality(), Dimensionality::TwoD);
    }

    #[test]
    fn test_explicit_1d_for_cube_fails() {
        let lut = Lut::one_d(vec![0.0, 0.5, 1.0], Domain::UNIT).unwrap();
        let options = ConvertOptions {
            target_dimensionality: Some(Dimensionality::OneD),
            ..Default::default()
        };
        assert!(matches!(
            prepare(lut, LutFormat::Cube, &options),
            Err(LutError::IncompatibleConversion(_))
        ));
    }

    #[test]
    fn test_output_range_and_title() {
        let lut = Lut::one_d(vec![0.0, 0.5, 1.0], Domain::UNIT).unwrap();
        let options = ConvertOptions {
            output_range: Some([0.0, 2.0]),
            title: Some("scaled".into()),
            ..Default::default()
        };
        let out = prepare(lut, LutFormat::Json, &options).unwrap();
        assert_eq!(out.curves().unwrap()[0], vec![0.0, 1.0, 2.0]);
        assert_eq!(out.title(), Some("scaled"));
    }

    #[test]
    fn test_3d_to_1d_writes_nothing() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("id.cube");
        let target = dir.path().join("out.spi1d");
        let lut = Lut::identity(Dimensionality::ThreeD, 2).unwrap();
        write_lut(&lut, &source, LutFormat::Cube, None).unwrap();

        let options = ConvertOptions {
            target_dimensionality: Some(Dimensionality::OneD),
            ..Default::default()
        };
        let err = convert(&source, &target, &options).unwrap_err();
        assert!(matches!(err, LutError::IncompatibleConversion(_)));
        assert!(!target.exists());
    }

    #[test]
    fn test_missing_source_is_io() {
        let dir = tempdir().unwrap();
        let err = convert(&dir.path().join("nope.cube"), &dir.path().join("out.cube"), &ConvertOptions::default())
            .unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_smooth_then_resize() {
        let values = (0..256).map(|i| (i as f32 / 255.0).powf(2.2)).collect();
        let lut = Lut::one_d(values, Domain::UNIT).unwrap();
        let options = ConvertOptions {
            smooth_size: Some(12),
            target_size: Some(1024),
            ..Default::default()
        };
        let out = prepare(lut, LutFormat::Spi1d, &options).unwrap();
        assert_eq!(out.size(), 1024);
        let c = &out.curves().unwrap()[0];
        assert_eq!((c[0], c[1023]), (0.0, 1.0));

        let cube = Lut::identity(Dimensionality::ThreeD, 2).unwrap();
        assert!(matches!(
            prepare(cube, LutFormat::Cube, &options),
            Err(LutError::IncompatibleConversion(_))
        ));
    }

    #[test]
    fn test_default_and_directory_outputs() {
        let dir = tempdir().unwrap();
        let sources = vec![dir.path().join("log.spi1d"), dir.path().join("look.cube")];

        let (path, format) = resolve_output(&sources, None, Some(LutFormat::Cube), None).unwrap();
        assert_eq!(path, dir.path().join("log+look_export.cube"));
        assert_eq!(format, LutFormat::Cube);

        let (path, format) = resolve_output(&sources[1..], None, None, None).unwrap();
        assert_eq!(path, dir.path().join("look_export.cube"));
        assert_eq!(format, LutFormat::Cube);

        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        let (path, _) = resolve_output(&sources, Some(&out), Some(LutFormat::ThreeDl), None).unwrap();
        assert_eq!(path, out.join("log.3dl"));

        let file = dir.path().join("final.csp");
        assert_eq!(resolve_output(&sources, Some(&file), None, None).unwrap(), (file, LutFormat::Csp));
        assert!(resolve_output(&[], None, None, None).is_err());
    }

    #[test]
    fn test_convert_many_chains_sources() {
        let dir = tempdir().unwrap();
        let square = dir.path().join("square.spi1d");
        let half = dir.path().join("half.spi1d");
        let squared = (0..65).map(|i| (i as f32 / 64.0).powi(2)).collect();
        write_lut(&Lut::one_d(squared, Domain::UNIT).unwrap(), &square, LutFormat::Spi1d, None).unwrap();
        write_lut(&Lut::one_d(vec![0.0, 0.5], Domain::UNIT).unwrap(), &half, LutFormat::Spi1d, None).unwrap();

        let report = convert_many(&[square, half], None, &ConvertOptions::default()).unwrap();
        assert_eq!(report.path, dir.path().join("square+half_export.spi1d"));
        assert_eq!(report.size, 65);
        let (back, _) = read_lut(&report.path, None).unwrap();
        let y = back.eval_curve(0, 0.5).unwrap();
        assert!((y - 0.125).abs() < 1e-5, "{y}");
    }

    #[test]
    fn test_curve_to_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("srgb.spi1d");
        let options = ConvertOptions { target_size: Some(64), ..Default::default() };
        let report = sample_curve_to_file("sRGB", Direction::Encode, Domain::UNIT, &target, &options).unwrap();
        assert_eq!(report.format, LutFormat::Spi1d);
        assert_eq!(report.size, 64);
        let (back, _) = read_lut(&target, None).unwrap();
        assert_eq!(back.dimensionality(), Dimensionality::OneD);
        assert!((back.curves().unwrap()[0][63] - 1.0).abs() < 1e-6);
    }
}
