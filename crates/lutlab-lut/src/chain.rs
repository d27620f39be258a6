//! Composing several LUTs into one.
//!
//! [`chain`] applies its inputs in order, the output of one feeding the
//! next, and bakes the result into a single LUT sampled on the first
//! link's input domain:
//!
//! - any 3D link makes the result a 3D lattice; its size is the first
//!   link's when that one is 3D, else the largest 3D link's
//! - curves only give a 2D LUT (1D when every link is 1D) as large as the
//!   largest link

use crate::interp::Interpolation;
use crate::lut::{Dimensionality, Domain, Lut, Samples};
use crate::{LutError, LutResult};
use tracing::{debug, trace};

/// Runs one RGB triplet through a single LUT.
fn apply(lut: &Lut, rgb: [f32; 3], method: Interpolation) -> [f32; 3] {
    match lut.dimensionality() {
        Dimensionality::OneD => rgb.map(|v| lut.eval_curve(0, v).unwrap_or(v)),
        Dimensionality::TwoD => std::array::from_fn(|c| lut.eval_curve(c, rgb[c]).unwrap_or(rgb[c])),
        Dimensionality::ThreeD => lut.eval_rgb(rgb, method).unwrap_or(rgb),
    }
}

fn apply_all(luts: &[Lut], rgb: [f32; 3], method: Interpolation) -> [f32; 3] {
    luts.iter().fold(rgb, |acc, lut| apply(lut, acc, method))
}

/// Per-channel input domains of a LUT, replicated for 1D.
fn channel_domains(lut: &Lut) -> [Domain; 3] {
    let d = lut.domains();
    std::array::from_fn(|c| d[c.min(d.len() - 1)])
}

/// Composes `luts` in order into one LUT.
///
/// A single LUT comes back unchanged. Metadata and precision come from
/// the first link.
///
/// ```rust
/// use lutlab_lut::{chain, Domain, Interpolation, Lut};
///
/// let square = Lut::one_d(vec![0.0, 0.25, 1.0], Domain::UNIT).unwrap();
/// let half = Lut::one_d(vec![0.0, 0.5], Domain::UNIT).unwrap();
/// let both = chain(&[square, half], Interpolation::Trilinear).unwrap();
/// assert_eq!(both.curves().unwrap()[0], vec![0.0, 0.125, 0.5]);
/// ```
pub fn chain(luts: &[Lut], interpolation: Interpolation) -> LutResult<Lut> {
    let Some(first) = luts.first() else {
        return Err(LutError::InvalidLut("no LUT to chain".into()));
    };
    if luts.len() == 1 {
        return Ok(first.clone());
    }
    trace!(links = luts.len(), "chain");

    let domains = channel_domains(first);
    let lattice_size = if first.dimensionality() == Dimensionality::ThreeD {
        Some(first.size())
    } else {
        luts.iter()
            .filter(|l| l.dimensionality() == Dimensionality::ThreeD)
            .map(Lut::size)
            .max()
    };

    let out = match lattice_size {
        Some(n) => {
            let mut lattice = Vec::with_capacity(n * n * n);
            for b in 0..n {
                for g in 0..n {
                    for r in 0..n {
                        let rgb = [
                            domains[0].coordinate(r, n),
                            domains[1].coordinate(g, n),
                            domains[2].coordinate(b, n),
                        ];
                        lattice.push(apply_all(luts, rgb, interpolation));
                    }
                }
            }
            Lut::three_d(n, lattice, domains)?
        }
        None => {
            let n = luts.iter().map(Lut::size).max().unwrap_or(first.size());
            let dim = if luts.iter().all(|l| l.dimensionality() == Dimensionality::OneD) {
                Dimensionality::OneD
            } else {
                Dimensionality::TwoD
            };
            let channels = dim.channel_count();
            // Channels stay independent through curve links, so channel c
            // only depends on input c.
            let curves = (0..channels)
                .map(|c| {
                    (0..n)
                        .map(|i| apply_all(luts, [domains[c].coordinate(i, n); 3], interpolation)[c])
                        .collect()
                })
                .collect();
            Lut::from_parts(dim, n, domains[..channels].to_vec(), Samples::Curves(curves))?
        }
    };
    debug!(links = luts.len(), dim = %out.dimensionality(), size = out.size(), "chained LUTs");
    Ok(out
        .with_precision(first.precision())
        .with_metadata(first.metadata().clone()))
}
