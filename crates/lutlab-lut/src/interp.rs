//! Interpolation kernels working in lattice index space.
//!
//! Coordinates are fractional sample indices: `0.0` is the first sample and
//! `size - 1` the last. Anything outside is clamped, never extrapolated.
//!
//! # 3D methods
//!
//! - **Trilinear** blends the 8 corners of the enclosing cell. Separable
//!   and cheap.
//! - **Tetrahedral** splits the cell into 6 tetrahedra along the main
//!   diagonal and blends 4 corners. Better at keeping neutral gradients
//!   neutral and has fewer artifacts near cube edges.

use lutlab_math::lerp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{LutError, LutResult};

/// 3D interpolation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// 8-corner blend.
    #[default]
    Trilinear,
    /// 4-corner blend inside one of 6 tetrahedra.
    Tetrahedral,
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Trilinear => "trilinear",
            Self::Tetrahedral => "tetrahedral",
        })
    }
}

impl FromStr for Interpolation {
    type Err = LutError;

    fn from_str(s: &str) -> LutResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trilinear" | "linear" => Ok(Self::Trilinear),
            "tetrahedral" | "tetra" => Ok(Self::Tetrahedral),
            _ => Err(LutError::InvalidLut(format!("unknown interpolation '{s}'"))),
        }
    }
}

/// Splits a clamped coordinate into the lower cell index and fraction.
#[inline]
fn cell(t: f32, size: usize) -> (usize, f32) {
    let last = (size - 1) as f32;
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, last) };
    let i = (t.floor() as usize).min(size - 2);
    (i, t - i as f32)
}

/// Linear interpolation of a curve at fractional index `t`.
pub fn sample_curve(curve: &[f32], t: f32) -> f32 {
    let (i, f) = cell(t, curve.len());
    lerp(curve[i], curve[i + 1], f)
}

/// Interpolates a red-fastest lattice at fractional indices `coords`.
pub fn sample_lattice(lattice: &[[f32; 3]], size: usize, coords: [f32; 3], method: Interpolation) -> [f32; 3] {
    let (ri, rf) = cell(coords[0], size);
    let (gi, gf) = cell(coords[1], size);
    let (bi, bf) = cell(coords[2], size);

    let at = |r: usize, g: usize, b: usize| lattice[(ri + r) + size * ((gi + g) + size * (bi + b))];
    let c000 = at(0, 0, 0);
    let c111 = at(1, 1, 1);

    match method {
        Interpolation::Trilinear => {
            let c100 = at(1, 0, 0);
            let c010 = at(0, 1, 0);
            let c110 = at(1, 1, 0);
            let c001 = at(0, 0, 1);
            let c101 = at(1, 0, 1);
            let c011 = at(0, 1, 1);
            std::array::from_fn(|i| {
                let c00 = lerp(c000[i], c100[i], rf);
                let c10 = lerp(c010[i], c110[i], rf);
                let c01 = lerp(c001[i], c101[i], rf);
                let c11 = lerp(c011[i], c111[i], rf);
                lerp(lerp(c00, c10, gf), lerp(c01, c11, gf), bf)
            })
        }
        Interpolation::Tetrahedral => {
            // Walk from c000 to c111 along the edges of the tetrahedron
            // picked by the ordering of the fractions.
            let (w, a, b) = if rf > gf {
                if gf > bf {
                    ([rf, gf, bf], at(1, 0, 0), at(1, 1, 0))
                } else if rf > bf {
                    ([rf, bf, gf], at(1, 0, 0), at(1, 0, 1))
                } else {
                    ([bf, rf, gf], at(0, 0, 1), at(1, 0, 1))
                }
            } else if gf > bf {
                if rf > bf {
                    ([gf, rf, bf], at(0, 1, 0), at(1, 1, 0))
                } else {
                    ([gf, bf, rf], at(0, 1, 0), at(0, 1, 1))
                }
            } else {
                ([bf, gf, rf], at(0, 0, 1), at(0, 1, 1))
            };
            std::array::from_fn(|i| {
                c000[i] + w[0] * (a[i] - c000[i]) + w[1] * (b[i] - a[i]) + w[2] * (c111[i] - b[i])
            })
        }
    }
}

/// Fritsch-Carlson tangents for a uniformly spaced curve of 2 or more samples.
///
/// Interior tangents are the harmonic mean of the neighbouring secants, or
/// zero at a local extremum, so the cubic never leaves the range of the
/// two samples it joins.
pub(crate) fn monotone_slopes(curve: &[f32]) -> Vec<f32> {
    let n = curve.len();
    let secants: Vec<f32> = curve.windows(2).map(|w| w[1] - w[0]).collect();
    if n == 2 {
        return vec![secants[0]; 2];
    }
    let mut slopes = Vec::with_capacity(n);
    slopes.push(end_slope(secants[0], secants[1]));
    for w in secants.windows(2) {
        let (d0, d1) = (w[0], w[1]);
        slopes.push(if d0 * d1 <= 0.0 { 0.0 } else { 2.0 / (1.0 / d0 + 1.0 / d1) });
    }
    slopes.push(end_slope(secants[n - 2], secants[n - 3]));
    slopes
}

/// Three-point end tangent, limited so the end segment stays monotone.
fn end_slope(d0: f32, d1: f32) -> f32 {
    let m = (3.0 * d0 - d1) / 2.0;
    if d0 == 0.0 || m.signum() != d0.signum() {
        0.0
    } else if d0.signum() != d1.signum() && m.abs() > 3.0 * d0.abs() {
        3.0 * d0
    } else {
        m
    }
}

/// Cubic Hermite interpolation of a curve at fractional index `t`, with
/// tangents from [`monotone_slopes`].
pub(crate) fn sample_monotone(curve: &[f32], slopes: &[f32], t: f32) -> f32 {
    let (i, f) = cell(t, curve.len());
    let (f2, f3) = (f * f, f * f * f);
    (2.0 * f3 - 3.0 * f2 + 1.0) * curve[i]
        + (f3 - 2.0 * f2 + f) * slopes[i]
        + (3.0 * f2 - 2.0 * f3) * curve[i + 1]
        + (f3 - f2) * slopes[i + 1]
}
