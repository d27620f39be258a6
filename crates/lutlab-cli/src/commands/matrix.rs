//! Colorspace matrix command

use crate::MatrixArgs;
use anyhow::{Context, Result, bail};
use std::path::Path;
use lutlab_math::Mat3;
use lutlab_primaries::{
    BuiltinColorimetry, ColorimetryProvider, ColorspaceDescriptor, ConversionOptions, Endpoint,
    MatrixFormat, build_matrix, format_matrix, primaries_matrix, rgb_to_rgb_matrix,
};
use tracing::{info, trace};

fn endpoint(name: &str) -> Result<Endpoint> {
    if name.eq_ignore_ascii_case("xyz") {
        return Ok(Endpoint::Xyz);
    }
    Ok(Endpoint::Rgb(BuiltinColorimetry.descriptor(name)?))
}

fn source(args: &MatrixArgs) -> Result<Endpoint> {
    match (&args.primaries, &args.white, &args.colorspace) {
        (Some(p), Some(w), name) => {
            let (&[rx, ry, gx, gy, bx, by], &[wx, wy]) = (p.as_slice(), w.as_slice()) else {
                bail!("--primaries needs 6 values and --white 2");
            };
            let name = name.clone().unwrap_or_else(|| "custom".into());
            Ok(Endpoint::Rgb(ColorspaceDescriptor::custom(
                name,
                [(rx, ry), (gx, gy), (bx, by)],
                (wx, wy),
            )))
        }
        (_, _, Some(name)) => endpoint(name),
        _ => bail!("give a colorspace name or --primaries with --white"),
    }
}

/// Source to XYZ and back, as (label, matrix) pairs.
fn xyz_pair(src: &Endpoint, primaries_only: bool) -> Result<Vec<(String, Mat3)>> {
    let Endpoint::Rgb(desc) = src else {
        return Ok(vec![("XYZ to XYZ".into(), Mat3::IDENTITY)]);
    };
    let (forward, inverse) = if primaries_only {
        let m = primaries_matrix(desc)?;
        let inv = m
            .inverse()
            .with_context(|| format!("{} primaries matrix is not invertible", desc.name))?;
        (m, inv)
    } else {
        let pair = build_matrix(desc)?;
        (pair.rgb_to_xyz, pair.xyz_to_rgb)
    };
    Ok(vec![
        (format!("{} to XYZ", desc.name), forward),
        (format!("XYZ to {}", desc.name), inverse),
    ])
}

fn label(endpoint: &Endpoint) -> String {
    match endpoint {
        Endpoint::Xyz => "XYZ".into(),
        Endpoint::Rgb(desc) => desc.name.to_string(),
    }
}

/// Renders the matrices, each under a `name:` line when `titled`.
fn render(matrices: &[(String, Mat3)], format: MatrixFormat, titled: bool) -> String {
    let mut out = String::new();
    for (name, m) in matrices {
        if titled {
            out.push_str(name);
            out.push_str(":\n");
        }
        out.push_str(&format_matrix(m, format));
    }
    out
}

/// Writes every matrix to `path`. A lone matrix is written bare so the
/// file stays loadable as a plain matrix.
fn export(path: &Path, matrices: &[(String, Mat3)], format: MatrixFormat) -> Result<()> {
    if format == MatrixFormat::Spimtx && matrices.len() > 1 {
        bail!("spimtx holds one matrix; pass --to to pick a single conversion");
    }
    std::fs::write(path, render(matrices, format, matrices.len() > 1))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    for (name, _) in matrices {
        info!(path = %path.display(), matrix = %name, "wrote matrix");
    }
    Ok(())
}

pub fn run(args: MatrixArgs, verbose: u8) -> Result<()> {
    trace!(colorspace = ?args.colorspace, to = ?args.to, "matrix::run");
    let src = source(&args)?;
    let format: MatrixFormat = args.format.into();

    let matrices = match &args.to {
        Some(to) => {
            let dst = endpoint(to)?;
            let options = ConversionOptions {
                primaries_only: args.primaries_only,
                adaptation: args.adaptation.into(),
            };
            let m = rgb_to_rgb_matrix(&src, &dst, options)?;
            vec![(format!("{} to {}", label(&src), label(&dst)), m)]
        }
        None => xyz_pair(&src, args.primaries_only)?,
    };

    match &args.output {
        Some(path) => {
            export(path, &matrices, format)?;
            println!("a new matrix was written in {}", path.display());
        }
        None => print!("{}", render(&matrices, format, matrices.len() > 1 || verbose > 0)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_writes_both_directions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("srgb.mtx");
        let matrices = xyz_pair(&endpoint("sRGB").unwrap(), false).unwrap();
        assert_eq!(matrices.len(), 2);
        export(&path, &matrices, MatrixFormat::Matrix).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], format!("{}:", matrices[0].0));
        assert_eq!(lines[4], format!("{}:", matrices[1].0));
        assert_eq!(lines[5..].join("\n") + "\n", format_matrix(&matrices[1].1, MatrixFormat::Matrix));
    }

    #[test]
    fn test_export_single_matrix_is_bare() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id.spimtx");
        let matrices = vec![("XYZ to XYZ".to_string(), Mat3::IDENTITY)];
        export(&path, &matrices, MatrixFormat::Spimtx).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, format_matrix(&Mat3::IDENTITY, MatrixFormat::Spimtx));
    }

    #[test]
    fn test_export_spimtx_refuses_pair() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pair.spimtx");
        let matrices = xyz_pair(&endpoint("sRGB").unwrap(), false).unwrap();
        assert!(export(&path, &matrices, MatrixFormat::Spimtx).is_err());
        assert!(!path.exists());
    }
}
