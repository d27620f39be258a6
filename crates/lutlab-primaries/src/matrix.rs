//! RGB <-> XYZ matrix generation.
//!
//! # Algorithm
//!
//! 1. Convert each primary's xy chromaticity to XYZ with Y = 1.
//! 2. Place them as columns of `P` and solve `P * S = W` for the per-channel
//!    scale `S`, where `W` is the white point's XYZ.
//! 3. `rgb_to_xyz = P * diag(S)`; `xyz_to_rgb` is its inverse.
//!
//! By construction `rgb_to_xyz * (1, 1, 1) = W`.

use crate::{ColorspaceDescriptor, PrimariesError, PrimariesResult};
use lutlab_math::{Adaptation, Mat3, Vec3};
use tracing::{debug, trace};

/// The forward and inverse matrices of one colorspace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixPair {
    /// Linear RGB to CIE XYZ.
    pub rgb_to_xyz: Mat3,
    /// CIE XYZ to linear RGB.
    pub xyz_to_rgb: Mat3,
}

fn singular(desc: &ColorspaceDescriptor, reason: impl Into<String>) -> PrimariesError {
    PrimariesError::SingularMatrix {
        name: desc.name.to_string(),
        reason: reason.into(),
    }
}

/// Matrix whose columns are the XYZ (Y = 1) of each primary, without any
/// white point scaling.
pub fn primaries_matrix(desc: &ColorspaceDescriptor) -> PrimariesResult<Mat3> {
    let mut cols = [Vec3::ZERO; 3];
    for (col, (label, xy)) in cols.iter_mut().zip(["red", "green", "blue"].iter().zip(desc.primaries)) {
        *col = xy
            .to_xyz()
            .ok_or_else(|| singular(desc, format!("{label} primary has y = 0")))?;
    }
    Ok(Mat3::from_col_vecs(cols[0], cols[1], cols[2]))
}

/// White point XYZ with Y = 1.
pub fn white_xyz(desc: &ColorspaceDescriptor) -> PrimariesResult<Vec3> {
    desc.white_point
        .to_xyz()
        .ok_or_else(|| singular(desc, "white point has y = 0"))
}

/// Builds the RGB to XYZ matrix of `desc` and its inverse.
///
/// Fails with [`PrimariesError::SingularMatrix`] when the primaries are
/// co-linear in xy (or sit on y = 0), leaving the system unsolvable.
pub fn build_matrix(desc: &ColorspaceDescriptor) -> PrimariesResult<MatrixPair> {
    trace!(name = %desc.name, "build_matrix");
    let p = primaries_matrix(desc)?;
    let w = white_xyz(desc)?;

    let p_inv = p
        .inverse()
        .ok_or_else(|| singular(desc, format!("primaries are co-linear (det = {:e})", p.determinant())))?;
    let s = p_inv * w;

    let rgb_to_xyz = Mat3::from_col_vecs(p.col(0) * s.x, p.col(1) * s.y, p.col(2) * s.z);
    let xyz_to_rgb = rgb_to_xyz
        .inverse()
        .ok_or_else(|| singular(desc, "white point lies on a primary edge"))?;

    debug!(name = %desc.name, det = rgb_to_xyz.determinant(), "built RGB/XYZ matrices");
    Ok(MatrixPair { rgb_to_xyz, xyz_to_rgb })
}

/// One end of an RGB to RGB conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    /// CIE XYZ itself.
    Xyz,
    /// An RGB colorspace.
    Rgb(ColorspaceDescriptor),
}

impl Endpoint {
    fn to_xyz(&self, primaries_only: bool) -> PrimariesResult<Mat3> {
        match self {
            Self::Xyz => Ok(Mat3::IDENTITY),
            Self::Rgb(desc) if primaries_only => primaries_matrix(desc),
            Self::Rgb(desc) => Ok(build_matrix(desc)?.rgb_to_xyz),
        }
    }

    fn white(&self) -> PrimariesResult<Option<Vec3>> {
        match self {
            Self::Xyz => Ok(None),
            Self::Rgb(desc) => white_xyz(desc).map(Some),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Xyz => "XYZ",
            Self::Rgb(desc) => desc.name.as_ref(),
        }
    }
}

/// Options for [`rgb_to_rgb_matrix`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversionOptions {
    /// Use the unscaled primaries matrices, ignoring white points.
    pub primaries_only: bool,
    /// Adaptation between the two white points. Skipped when either end is XYZ.
    pub adaptation: Adaptation,
}

/// Matrix taking linear RGB in `src` to linear RGB in `dst` through XYZ.
pub fn rgb_to_rgb_matrix(
    src: &Endpoint,
    dst: &Endpoint,
    options: ConversionOptions,
) -> PrimariesResult<Mat3> {
    trace!(src = src.name(), dst = dst.name(), ?options, "rgb_to_rgb_matrix");
    let src_to_xyz = src.to_xyz(options.primaries_only)?;
    let dst_to_xyz = dst.to_xyz(options.primaries_only)?;
    let xyz_to_dst = match dst {
        Endpoint::Xyz => Mat3::IDENTITY,
        Endpoint::Rgb(desc) => dst_to_xyz
            .inverse()
            .ok_or_else(|| singular(desc, "destination matrix is not invertible"))?,
    };

    let cat = match (src.white()?, dst.white()?) {
        (Some(sw), Some(dw)) if !options.primaries_only => options.adaptation.matrix(sw, dw),
        _ => Mat3::IDENTITY,
    };
    Ok(xyz_to_dst * cat * src_to_xyz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ACES_AP1, BuiltinColorimetry, ColorimetryProvider, D65, SRGB};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_srgb_white_row_sums() {
        let pair = build_matrix(&SRGB).unwrap();
        let white = pair.rgb_to_xyz * Vec3::ONE;
        let expected = D65.to_xyz().unwrap();
        assert!(white.max_abs_diff(expected) < 1e-4);
    }

    #[test]
    fn test_srgb_known_matrix() {
        let m = build_matrix(&SRGB).unwrap().rgb_to_xyz;
        assert_abs_diff_eq!(m[0][0], 0.4124, epsilon = 1e-3);
        assert_abs_diff_eq!(m[1][1], 0.7152, epsilon = 1e-3);
        assert_abs_diff_eq!(m[2][2], 0.9505, epsilon = 1e-3);
    }

    #[test]
    fn test_inverse_pair() {
        for name in BuiltinColorimetry.names() {
            let desc = BuiltinColorimetry.descriptor(name).unwrap();
            let pair = build_matrix(&desc).unwrap();
            let id = pair.xyz_to_rgb * pair.rgb_to_xyz;
            assert!(id.max_abs_diff(&Mat3::IDENTITY) < 1e-9, "{name}");
        }
    }

    #[test]
    fn test_colinear_primaries() {
        let desc = ColorspaceDescriptor::custom(
            "line",
            [(0.1, 0.1), (0.2, 0.2), (0.3, 0.3)],
            (0.3127, 0.329),
        );
        let err = build_matrix(&desc).unwrap_err();
        assert!(matches!(err, PrimariesError::SingularMatrix { .. }));
    }

    #[test]
    fn test_zero_y_primary() {
        let desc = ColorspaceDescriptor::custom(
            "flat",
            [(0.64, 0.33), (0.3, 0.6), (0.15, 0.0)],
            (0.3127, 0.329),
        );
        assert!(matches!(build_matrix(&desc), Err(PrimariesError::SingularMatrix { .. })));
    }

    #[test]
    fn test_rgb_to_rgb_identity() {
        let e = Endpoint::Rgb(SRGB.clone());
        let m = rgb_to_rgb_matrix(&e, &e, ConversionOptions::default()).unwrap();
        assert!(m.max_abs_diff(&Mat3::IDENTITY) < 1e-12);
    }

    #[test]
    fn test_rgb_to_xyz_endpoint() {
        let m = rgb_to_rgb_matrix(&Endpoint::Rgb(SRGB.clone()), &Endpoint::Xyz, ConversionOptions::default())
            .unwrap();
        assert_eq!(m, build_matrix(&SRGB).unwrap().rgb_to_xyz);
    }

    #[test]
    fn test_adapted_white_stays_neutral() {
        let opts = ConversionOptions { adaptation: Adaptation::Bradford, ..Default::default() };
        let m = rgb_to_rgb_matrix(&Endpoint::Rgb(SRGB.clone()), &Endpoint::Rgb(ACES_AP1.clone()), opts)
            .unwrap();
        let white = m * Vec3::ONE;
        assert!(white.max_abs_diff(Vec3::ONE) < 1e-6);
    }
}
