//! The in-memory LUT representation shared by every format.
//!
//! A [`Lut`] is one of:
//!
//! - **1D**: a single curve applied to all channels
//! - **2D**: three independent curves, one per channel
//! - **3D**: a `size^3` lattice of RGB triples indexed by `(r, g, b)`
//!
//! Lattice storage is red-fastest: `index = r + size * (g + size * b)`.
//! Readers of formats with another ordering reorder on load.
//!
//! Each channel has an input [`Domain`]. Sample `i` of `n` sits at
//! `min + i * (max - min) / (n - 1)`, so the first and last samples land
//! exactly on the domain bounds.

use crate::interp::{self, Interpolation};
use crate::{LutError, LutResult, Precision};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Metadata key holding the LUT title.
pub const TITLE_KEY: &str = "title";

/// Shape of a LUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimensionality {
    /// One curve for all channels.
    #[serde(rename = "1D", alias = "1d")]
    OneD,
    /// One curve per channel.
    #[serde(rename = "2D", alias = "2d")]
    TwoD,
    /// Full RGB lattice.
    #[serde(rename = "3D", alias = "3d")]
    ThreeD,
}

impl Dimensionality {
    /// Number of independent channels stored.
    pub fn channel_count(self) -> usize {
        match self {
            Self::OneD => 1,
            Self::TwoD | Self::ThreeD => 3,
        }
    }
}

impl fmt::Display for Dimensionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OneD => "1D",
            Self::TwoD => "2D",
            Self::ThreeD => "3D",
        })
    }
}

impl FromStr for Dimensionality {
    type Err = LutError;

    fn from_str(s: &str) -> LutResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1d" | "1" => Ok(Self::OneD),
            "2d" | "2" => Ok(Self::TwoD),
            "3d" | "3" => Ok(Self::ThreeD),
            _ => Err(LutError::InvalidLut(format!("unknown LUT type '{s}'"))),
        }
    }
}

/// Input range of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    /// Input value mapped to the first sample.
    pub min: f32,
    /// Input value mapped to the last sample.
    pub max: f32,
}

impl Domain {
    /// The `[0, 1]` domain.
    pub const UNIT: Self = Self { min: 0.0, max: 1.0 };

    /// Validated domain; requires finite bounds with `min < max`.
    pub fn new(min: f32, max: f32) -> LutResult<Self> {
        if !(min.is_finite() && max.is_finite()) || min >= max {
            return Err(LutError::InvalidLut(format!("invalid domain [{min}, {max}]")));
        }
        Ok(Self { min, max })
    }

    /// True for `[0, 1]`.
    pub fn is_unit(&self) -> bool {
        *self == Self::UNIT
    }

    /// Input coordinate of sample `i` out of `n`.
    pub fn coordinate(&self, i: usize, n: usize) -> f32 {
        if i + 1 >= n {
            return self.max;
        }
        let t = i as f64 / (n - 1) as f64;
        (self.min as f64 + t * (self.max as f64 - self.min as f64)) as f32
    }

    /// Maps an input value to `[0, 1]` (unclamped).
    pub fn normalize(&self, v: f32) -> f32 {
        (v - self.min) / (self.max - self.min)
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Sample storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    /// One vector per channel (1D: one, 2D: three), each of length `size`.
    Curves(Vec<Vec<f32>>),
    /// `size^3` RGB triples, red fastest.
    Lattice(Vec<[f32; 3]>),
}

/// A 1D, 2D or 3D lookup table.
///
/// Constructors validate the structural invariants, so every `Lut` in
/// circulation has `size >= 2`, finite samples, a fully populated lattice
/// and `min < max` domains.
#[derive(Debug, Clone, PartialEq)]
pub struct Lut {
    dimensionality: Dimensionality,
    size: usize,
    domains: Vec<Domain>,
    samples: Samples,
    precision: Precision,
    metadata: BTreeMap<String, String>,
}

impl Lut {
    /// Single curve shared by all channels.
    pub fn one_d(values: Vec<f32>, domain: Domain) -> LutResult<Self> {
        Self::from_parts(Dimensionality::OneD, values.len(), vec![domain], Samples::Curves(vec![values]))
    }

    /// Three per-channel curves of equal length.
    pub fn two_d(channels: [Vec<f32>; 3], domains: [Domain; 3]) -> LutResult<Self> {
        let size = channels[0].len();
        Self::from_parts(
            Dimensionality::TwoD,
            size,
            domains.to_vec(),
            Samples::Curves(channels.into()),
        )
    }

    /// Cube lattice of `size^3` triples, red fastest.
    pub fn three_d(size: usize, lattice: Vec<[f32; 3]>, domains: [Domain; 3]) -> LutResult<Self> {
        Self::from_parts(Dimensionality::ThreeD, size, domains.to_vec(), Samples::Lattice(lattice))
    }

    /// Identity LUT over the unit domain.
    pub fn identity(dimensionality: Dimensionality, size: usize) -> LutResult<Self> {
        let ramp = |n: usize| (0..n).map(|i| Domain::UNIT.coordinate(i, n)).collect::<Vec<_>>();
        match dimensionality {
            Dimensionality::OneD => Self::one_d(ramp(size), Domain::UNIT),
            Dimensionality::TwoD => Self::two_d([ramp(size), ramp(size), ramp(size)], [Domain::UNIT; 3]),
            Dimensionality::ThreeD => {
                let axis = ramp(size);
                let mut lattice = Vec::with_capacity(size.saturating_pow(3));
                for b in 0..size {
                    for g in 0..size {
                        for r in 0..size {
                            lattice.push([axis[r], axis[g], axis[b]]);
                        }
                    }
                }
                Self::three_d(size, lattice, [Domain::UNIT; 3])
            }
        }
    }

    /// Builds a LUT from parts, checking every invariant.
    pub fn from_parts(
        dimensionality: Dimensionality,
        size: usize,
        domains: Vec<Domain>,
        samples: Samples,
    ) -> LutResult<Self> {
        let lut = Self {
            dimensionality,
            size,
            domains,
            samples,
            precision: Precision::Float,
            metadata: BTreeMap::new(),
        };
        lut.validate()?;
        Ok(lut)
    }

    fn validate(&self) -> LutResult<()> {
        let invalid = |msg: String| Err(LutError::InvalidLut(msg));
        if self.size < 2 {
            return invalid(format!("size must be at least 2, got {}", self.size));
        }
        let channels = self.dimensionality.channel_count();
        if self.domains.len() != channels {
            return invalid(format!("{} LUT needs {channels} domains, got {}", self.dimensionality, self.domains.len()));
        }
        for d in &self.domains {
            Domain::new(d.min, d.max)?;
        }
        match (&self.samples, self.dimensionality) {
            (Samples::Curves(curves), Dimensionality::OneD | Dimensionality::TwoD) => {
                if curves.len() != channels {
                    return invalid(format!("expected {channels} channels, got {}", curves.len()));
                }
                for (ch, curve) in curves.iter().enumerate() {
                    if curve.len() != self.size {
                        return invalid(format!("channel {ch} has {} samples, expected {}", curve.len(), self.size));
                    }
                    if let Some(i) = curve.iter().position(|v| !v.is_finite()) {
                        return invalid(format!("channel {ch} sample {i} is not finite"));
                    }
                }
            }
            (Samples::Lattice(lattice), Dimensionality::ThreeD) => {
                let expected = self.size.checked_pow(3).unwrap_or(usize::MAX);
                if lattice.len() != expected {
                    return invalid(format!("lattice has {} entries, expected {expected}", lattice.len()));
                }
                if let Some(i) = lattice.iter().position(|rgb| !rgb.iter().all(|v| v.is_finite())) {
                    return invalid(format!("lattice entry {i} is not finite"));
                }
            }
            _ => return invalid(format!("sample layout does not match a {} LUT", self.dimensionality)),
        }
        Ok(())
    }

    /// Shape.
    pub fn dimensionality(&self) -> Dimensionality {
        self.dimensionality
    }

    /// Samples per dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    /// 1 for 1D, 3 otherwise.
    pub fn channel_count(&self) -> usize {
        self.dimensionality.channel_count()
    }

    /// Per-channel input domains.
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// The shared domain when all channels agree.
    pub fn uniform_domain(&self) -> Option<Domain> {
        let first = self.domains[0];
        self.domains.iter().all(|d| *d == first).then_some(first)
    }

    /// True when every channel uses `[0, 1]`.
    pub fn has_unit_domain(&self) -> bool {
        self.domains.iter().all(Domain::is_unit)
    }

    /// Raw sample storage.
    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    /// Per-channel curves of a 1D/2D LUT.
    pub fn curves(&self) -> Option<&[Vec<f32>]> {
        match &self.samples {
            Samples::Curves(c) => Some(c),
            Samples::Lattice(_) => None,
        }
    }

    /// Lattice of a 3D LUT.
    pub fn lattice(&self) -> Option<&[[f32; 3]]> {
        match &self.samples {
            Samples::Lattice(l) => Some(l),
            Samples::Curves(_) => None,
        }
    }

    /// Flat lattice index of node `(r, g, b)`.
    #[inline]
    pub fn lattice_index(&self, r: usize, g: usize, b: usize) -> usize {
        r + self.size * (g + self.size * b)
    }

    /// Precision the LUT was read at, or should be written at.
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Sets the precision.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Free-form key/value metadata.
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Mutable metadata.
    pub fn metadata_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.metadata
    }

    /// Replaces all metadata.
    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Title from metadata, if any.
    pub fn title(&self) -> Option<&str> {
        self.metadata.get(TITLE_KEY).map(String::as_str)
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.insert(TITLE_KEY.to_string(), title.into());
        self
    }

    /// Evaluates channel `ch` of a 1D/2D LUT at input `x`, linearly,
    /// clamping outside the domain.
    pub fn eval_curve(&self, ch: usize, x: f32) -> Option<f32> {
        let curve = self.curves()?.get(ch)?;
        let t = self.domains[ch].normalize(x) * (self.size - 1) as f32;
        Some(interp::sample_curve(curve, t))
    }

    /// Evaluates a 3D LUT at input `rgb`, clamping outside the domain.
    pub fn eval_rgb(&self, rgb: [f32; 3], method: Interpolation) -> Option<[f32; 3]> {
        let lattice = self.lattice()?;
        let n = (self.size - 1) as f32;
        let coords = [
            self.domains[0].normalize(rgb[0]) * n,
            self.domains[1].normalize(rgb[1]) * n,
            self.domains[2].normalize(rgb[2]) * n,
        ];
        Some(interp::sample_lattice(lattice, self.size, coords, method))
    }

    /// Applies `f` to every sample value, returning a new validated LUT.
    pub fn map_values(&self, f: impl Fn(f32) -> f32) -> LutResult<Self> {
        let samples = match &self.samples {
            Samples::Curves(curves) => {
                Samples::Curves(curves.iter().map(|c| c.iter().map(|&v| f(v)).collect()).collect())
            }
            Samples::Lattice(lattice) => {
                Samples::Lattice(lattice.iter().map(|rgb| rgb.map(&f)).collect())
            }
        };
        let out = Self { samples, ..self.clone() };
        out.validate()?;
        Ok(out)
    }

    /// Smallest and largest sample value over all channels.
    pub fn value_range(&self) -> (f32, f32) {
        let fold = |(lo, hi): (f32, f32), v: f32| (lo.min(v), hi.max(v));
        match &self.samples {
            Samples::Curves(c) => c.iter().flatten().copied().fold((f32::MAX, f32::MIN), fold),
            Samples::Lattice(l) => l.iter().flatten().copied().fold((f32::MAX, f32::MIN), fold),
        }
    }
}
