//! Resizing, reshaping and inverting LUTs.
//!
//! [`resample`] evaluates the source LUT at the nodes of the target LUT:
//!
//! - 1D/2D: each channel is a piecewise-linear function over its domain;
//!   target sample `i` of `m` reads the source at index `i * (n - 1) / (m - 1)`.
//! - 3D: every target lattice node is mapped into the source lattice the
//!   same way, per axis, and interpolated with the configured
//!   [`Interpolation`].
//!
//! When the target domain equals the source domain the mapping stays in
//! index space, so resampling to the same size reproduces the samples
//! exactly.
//!
//! Dimensionality changes are limited to 1D <-> 2D. A 1D curve becomes a
//! 2D LUT by replication; a 2D LUT collapses to 1D only when its three
//! channels are identical. Anything involving 3D on one side only fails
//! with [`LutError::IncompatibleConversion`].

use crate::interp::{self, Interpolation};
use crate::lut::{Dimensionality, Domain, Lut, Samples};
use crate::{LutError, LutResult};
use tracing::{debug, trace};

/// Resampling options.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResampleOptions {
    /// 3D interpolation method.
    pub interpolation: Interpolation,
    /// New input domain for every channel. `None` keeps the source domains.
    pub domain: Option<Domain>,
}

/// Resizes `lut` to `target_size` samples per dimension, optionally
/// changing its dimensionality.
///
/// Metadata and precision carry over unchanged.
///
/// ```rust
/// use lutlab_lut::{resample, Domain, Lut, ResampleOptions};
///
/// let lut = Lut::one_d(vec![0.0, 0.5, 1.0], Domain::UNIT).unwrap();
/// let out = resample(&lut, 5, None, &ResampleOptions::default()).unwrap();
/// assert_eq!(out.curves().unwrap()[0], vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// ```
pub fn resample(
    lut: &Lut,
    target_size: usize,
    target_dimensionality: Option<Dimensionality>,
    options: &ResampleOptions,
) -> LutResult<Lut> {
    let target_dim = target_dimensionality.unwrap_or(lut.dimensionality());
    trace!(
        from_size = lut.size(),
        from_dim = %lut.dimensionality(),
        to_size = target_size,
        to_dim = %target_dim,
        interpolation = %options.interpolation,
        "resample"
    );
    if target_size < 2 {
        return Err(LutError::InvalidLut(format!("target size must be at least 2, got {target_size}")));
    }

    let reshaped = reshape(lut, target_dim)?;
    let out = match target_dim {
        Dimensionality::OneD | Dimensionality::TwoD => resample_curves(&reshaped, target_size, options)?,
        Dimensionality::ThreeD => resample_lattice(&reshaped, target_size, options)?,
    };
    Ok(out
        .with_precision(lut.precision())
        .with_metadata(lut.metadata().clone()))
}

/// Converts between 1D and 2D; returns a clone when the shape already matches.
pub fn reshape(lut: &Lut, target: Dimensionality) -> LutResult<Lut> {
    use Dimensionality::*;

    let source = lut.dimensionality();
    let reshaped = match (source, target) {
        (a, b) if a == b => return Ok(lut.clone()),
        (OneD, TwoD) => {
            let curve = lut.curves().map(|c| c[0].clone()).unwrap_or_default();
            let domain = lut.domains()[0];
            debug!(size = lut.size(), "replicating 1D curve into 3 channels");
            Lut::two_d([curve.clone(), curve.clone(), curve], [domain; 3])?
        }
        (TwoD, OneD) => {
            let curves = lut.curves().unwrap_or_default();
            let domain = lut.uniform_domain();
            let identical = curves.windows(2).all(|w| w[0] == w[1]);
            match (identical, domain) {
                (true, Some(domain)) => Lut::one_d(curves[0].clone(), domain)?,
                _ => {
                    return Err(LutError::IncompatibleConversion(
                        "2D LUT has distinct channels and cannot be reduced to 1D".into(),
                    ));
                }
            }
        }
        (from, to) => {
            return Err(LutError::IncompatibleConversion(format!(
                "no conversion defined from a {from} LUT to a {to} LUT"
            )));
        }
    };
    Ok(reshaped
        .with_precision(lut.precision())
        .with_metadata(lut.metadata().clone()))
}

/// Fractional source index for target node `i` of `m`.
fn source_index(i: usize, m: usize, n: usize, src: Domain, dst: Domain) -> f32 {
    if src == dst {
        if i + 1 >= m {
            return (n - 1) as f32;
        }
        return ((i * (n - 1)) as f64 / (m - 1) as f64) as f32;
    }
    src.normalize(dst.coordinate(i, m)) * (n - 1) as f32
}

fn resample_curves(lut: &Lut, m: usize, options: &ResampleOptions) -> LutResult<Lut> {
    let n = lut.size();
    let curves = lut.curves().unwrap_or_default();
    let mut domains = Vec::with_capacity(curves.len());
    let mut out = Vec::with_capacity(curves.len());
    for (curve, &src) in curves.iter().zip(lut.domains()) {
        let dst = options.domain.unwrap_or(src);
        out.push(
            (0..m)
                .map(|i| interp::sample_curve(curve, source_index(i, m, n, src, dst)))
                .collect(),
        );
        domains.push(dst);
    }
    Lut::from_parts(lut.dimensionality(), m, domains, Samples::Curves(out))
}

fn resample_lattice(lut: &Lut, m: usize, options: &ResampleOptions) -> LutResult<Lut> {
    let n = lut.size();
    let lattice = lut.lattice().unwrap_or_default();
    let src: [Domain; 3] = std::array::from_fn(|c| lut.domains()[c]);
    let dst: [Domain; 3] = src.map(|d| options.domain.unwrap_or(d));

    let axes: [Vec<f32>; 3] =
        std::array::from_fn(|c| (0..m).map(|i| source_index(i, m, n, src[c], dst[c])).collect());

    let mut out = Vec::with_capacity(m * m * m);
    for b in 0..m {
        for g in 0..m {
            for r in 0..m {
                let coords = [axes[0][r], axes[1][g], axes[2][b]];
                out.push(interp::sample_lattice(lattice, n, coords, options.interpolation));
            }
        }
    }
    Lut::three_d(m, out, dst)
}

/// Inverts a 1D/2D LUT channel by channel.
///
/// Each channel must be monotonic (non-decreasing or non-increasing) and
/// not flat. The inverse has the same size; its domain per channel is the
/// source channel's output range, and its samples are source input values.
pub fn invert(lut: &Lut) -> LutResult<Lut> {
    trace!(size = lut.size(), dim = %lut.dimensionality(), "invert");
    let Some(curves) = lut.curves() else {
        return Err(LutError::IncompatibleConversion("3D LUTs cannot be inverted".into()));
    };
    let n = lut.size();
    let mut out = Vec::with_capacity(curves.len());
    let mut domains = Vec::with_capacity(curves.len());

    for (ch, (curve, src)) in curves.iter().zip(lut.domains()).enumerate() {
        let increasing = curve.windows(2).all(|w| w[1] >= w[0]);
        let decreasing = curve.windows(2).all(|w| w[1] <= w[0]);
        if !(increasing || decreasing) {
            return Err(LutError::NonMonotonicCurve(format!("channel {ch} cannot be inverted")));
        }
        let (lo, hi) = (curve[0].min(curve[n - 1]), curve[0].max(curve[n - 1]));
        let range = Domain::new(lo, hi)
            .map_err(|_| LutError::InvalidLut(format!("channel {ch} is flat and cannot be inverted")))?;

        let inverse = (0..n)
            .map(|i| {
                let y = range.coordinate(i, n);
                src.min + find_index(curve, y, increasing) / (n - 1) as f32 * (src.max - src.min)
            })
            .collect();
        out.push(inverse);
        domains.push(range);
    }
    Ok(Lut::from_parts(lut.dimensionality(), n, domains, Samples::Curves(out))?
        .with_precision(lut.precision())
        .with_metadata(lut.metadata().clone()))
}

/// Smooths a 1D/2D LUT through a coarse subsample.
///
/// Each channel is first resampled linearly to `points` samples, then
/// brought to `target_size` samples along a monotone cubic through them.
/// Fewer points give a smoother curve. End samples, domains, precision and
/// metadata carry over.
pub fn smooth(lut: &Lut, points: usize, target_size: usize) -> LutResult<Lut> {
    trace!(size = lut.size(), points, target_size, "smooth");
    if lut.dimensionality() == Dimensionality::ThreeD {
        return Err(LutError::IncompatibleConversion("3D LUTs cannot be smoothed".into()));
    }
    if points < 2 || target_size < 2 {
        return Err(LutError::InvalidLut(format!(
            "smoothing needs at least 2 points and 2 output samples, got {points} and {target_size}"
        )));
    }
    let coarse = resample_curves(lut, points, &ResampleOptions::default())?;
    let curves = coarse
        .curves()
        .unwrap_or_default()
        .iter()
        .map(|curve| {
            let slopes = interp::monotone_slopes(curve);
            (0..target_size)
                .map(|i| {
                    let t = source_index(i, target_size, points, Domain::UNIT, Domain::UNIT);
                    interp::sample_monotone(curve, &slopes, t)
                })
                .collect()
        })
        .collect();
    debug!(points, target_size, "smoothed curves");
    Ok(
        Lut::from_parts(lut.dimensionality(), target_size, lut.domains().to_vec(), Samples::Curves(curves))?
            .with_precision(lut.precision())
            .with_metadata(lut.metadata().clone()),
    )
}

/// Fractional index where a monotonic curve reaches `y`.
fn find_index(curve: &[f32], y: f32, increasing: bool) -> f32 {
    let key = |v: f32| if increasing { v } else { -v };
    let y = key(y);
    // First segment whose upper end reaches y.
    let seg = curve
        .windows(2)
        .position(|w| key(w[1]) >= y)
        .unwrap_or(curve.len() - 2);
    let (a, b) = (key(curve[seg]), key(curve[seg + 1]));
    let f = if b > a { ((y - a) / (b - a)).clamp(0.0, 1.0) } else { 0.0 };
    seg as f32 + f
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gamma_lut(n: usize, g: f32) -> Lut {
        let values = (0..n).map(|i| (i as f32 / (n - 1) as f32).powf(g)).collect();
        Lut::one_d(values, Domain::UNIT).unwrap()
    }

    #[test]
    fn test_linear_upsample() {
        let lut = Lut::one_d(vec![0.0, 0.5, 1.0], Domain::UNIT).unwrap();
        let out = resample(&lut, 5, None, &ResampleOptions::default()).unwrap();
        assert_eq!(out.size(), 5);
        assert_eq!(out.curves().unwrap()[0], vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_same_size_is_exact() {
        let lut = gamma_lut(17, 2.2);
        let out = resample(&lut, 17, None, &ResampleOptions::default()).unwrap();
        assert_eq!(out, lut);

        let cube = Lut::identity(Dimensionality::ThreeD, 9)
            .unwrap()
            .map_values(|v| v * v)
            .unwrap();
        for interpolation in [Interpolation::Trilinear, Interpolation::Tetrahedral] {
            let opts = ResampleOptions { interpolation, domain: None };
            let out = resample(&cube, 9, None, &opts).unwrap();
            for (a, b) in out.lattice().unwrap().iter().zip(cube.lattice().unwrap()) {
                for c in 0..3 {
                    assert!((a[c] - b[c]).abs() <= 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_downsample_keeps_endpoints() {
        let lut = gamma_lut(1024, 2.4);
        let out = resample(&lut, 16, None, &ResampleOptions::default()).unwrap();
        let c = &out.curves().unwrap()[0];
        assert_eq!(c[0], 0.0);
        assert_eq!(c[15], 1.0);
    }

    #[test]
    fn test_3d_identity_resize() {
        let lut = Lut::identity(Dimensionality::ThreeD, 5).unwrap();
        let out = resample(&lut, 9, None, &ResampleOptions::default()).unwrap();
        let expected = Lut::identity(Dimensionality::ThreeD, 9).unwrap();
        for (a, b) in out.lattice().unwrap().iter().zip(expected.lattice().unwrap()) {
            for c in 0..3 {
                assert!((a[c] - b[c]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_reshape_rules() {
        let one = gamma_lut(8, 2.0);
        let two = reshape(&one, Dimensionality::TwoD).unwrap();
        assert_eq!(two.channel_count(), 3);
        assert_eq!(reshape(&two, Dimensionality::OneD).unwrap(), one);

        let mixed = Lut::two_d(
            [vec![0.0, 1.0], vec![0.0, 0.5], vec![0.0, 1.0]],
            [Domain::UNIT; 3],
        )
        .unwrap();
        assert!(matches!(
            reshape(&mixed, Dimensionality::OneD),
            Err(LutError::IncompatibleConversion(_))
        ));

        let cube = Lut::identity(Dimensionality::ThreeD, 2).unwrap();
        assert!(matches!(
            resample(&cube, 2, Some(Dimensionality::OneD), &ResampleOptions::default()),
            Err(LutError::IncompatibleConversion(_))
        ));
        assert!(matches!(
            reshape(&one, Dimensionality::ThreeD),
            Err(LutError::IncompatibleConversion(_))
        ));
    }

    #[test]
    fn test_domain_change() {
        let lut = Lut::one_d(vec![0.0, 1.0], Domain::UNIT).unwrap();
        let opts = ResampleOptions { domain: Some(Domain::new(0.0, 0.5).unwrap()), ..Default::default() };
        let out = resample(&lut, 3, None, &opts).unwrap();
        assert_eq!(out.domains()[0], Domain::new(0.0, 0.5).unwrap());
        assert_eq!(out.curves().unwrap()[0], vec![0.0, 0.25, 0.5]);
    }

    #[test]
    fn test_smooth_follows_curve() {
        let lut = gamma_lut(1024, 2.2);
        let out = smooth(&lut, 10, 1024).unwrap();
        assert_eq!(out.size(), 1024);
        let c = &out.curves().unwrap()[0];
        assert_eq!(c[0], 0.0);
        assert_eq!(c[1023], 1.0);
        assert!(c.windows(2).all(|w| w[1] >= w[0] - 1e-6));
        for (a, b) in c.iter().zip(&lut.curves().unwrap()[0]) {
            assert!((a - b).abs() < 0.02, "{a} vs {b}");
        }
    }

    #[test]
    fn test_smooth_rejects_lattice_and_tiny_counts() {
        let cube = Lut::identity(Dimensionality::ThreeD, 2).unwrap();
        assert!(matches!(smooth(&cube, 5, 17), Err(LutError::IncompatibleConversion(_))));
        assert!(matches!(smooth(&gamma_lut(8, 2.0), 1, 17), Err(LutError::InvalidLut(_))));
    }

    #[test]
    fn test_invert_gamma() {
        let lut = gamma_lut(1024, 2.2);
        let inv = invert(&lut).unwrap();
        for i in 0..=20 {
            let x = i as f32 / 20.0;
            let y = lut.eval_curve(0, x).unwrap();
            let back = inv.eval_curve(0, y).unwrap();
            assert!((back - x).abs() < 2e-3, "{x} -> {y} -> {back}");
        }
    }

    #[test]
    fn test_invert_decreasing_and_flat() {
        let lut = Lut::one_d(vec![1.0, 0.5, 0.0], Domain::UNIT).unwrap();
        let inv = invert(&lut).unwrap();
        assert_eq!(inv.curves().unwrap()[0], vec![1.0, 0.5, 0.0]);

        let flat = Lut::one_d(vec![0.3, 0.3], Domain::UNIT).unwrap();
        assert!(invert(&flat).is_err());
        let bumpy = Lut::one_d(vec![0.0, 0.6, 0.4, 1.0], Domain::UNIT).unwrap();
        assert!(matches!(invert(&bumpy), Err(LutError::NonMonotonicCurve(_))));
    }
}
