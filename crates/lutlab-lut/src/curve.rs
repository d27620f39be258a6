//! Named transfer curves and sampling them into 1D LUTs.
//!
//! The [`CurveRegistry`] holds closed-form curves by name. Registration
//! checks that both directions of a curve are monotonically non-decreasing
//! over the curve's natural domain; a curve failing the check is refused,
//! so lookups never need to re-check.
//!
//! Besides the fixed entries, `gamma:<g>` (or `gamma<g>`) names a pure
//! power law with any positive exponent.
//!
//! # Directions
//!
//! - [`Direction::Encode`]: linear -> signal (`Lin_to_<name>`)
//! - [`Direction::Decode`]: signal -> linear (`<name>_to_Lin`)

use crate::lut::{Domain, Lut};
use crate::{LutError, LutResult, Precision};
use lutlab_transfer as tf;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{debug, error, trace};

/// Sample count used by the registration-time monotonicity check.
const CHECK_SAMPLES: usize = 4097;

/// Which way a curve is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Linear to encoded signal.
    #[default]
    Encode,
    /// Encoded signal to linear.
    Decode,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Encode => "encode",
            Self::Decode => "decode",
        })
    }
}

impl FromStr for Direction {
    type Err = LutError;

    fn from_str(s: &str) -> LutResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "encode" | "forward" => Ok(Self::Encode),
            "decode" | "inverse" => Ok(Self::Decode),
            _ => Err(LutError::InvalidLut(format!("unknown direction '{s}'"))),
        }
    }
}

/// The math behind a curve.
#[derive(Debug, Clone, Copy)]
pub enum Transfer {
    /// A fixed encode/decode function pair.
    Fixed {
        /// Linear to signal.
        encode: fn(f32) -> f32,
        /// Signal to linear.
        decode: fn(f32) -> f32,
    },
    /// Pure power law, decode exponent `g`.
    Gamma(f32),
}

impl Transfer {
    /// Linear to signal.
    pub fn encode(&self, v: f32) -> f32 {
        match *self {
            Self::Fixed { encode, .. } => encode(v),
            Self::Gamma(g) => tf::gamma::encode(v, g),
        }
    }

    /// Signal to linear.
    pub fn decode(&self, v: f32) -> f32 {
        match *self {
            Self::Fixed { decode, .. } => decode(v),
            Self::Gamma(g) => tf::gamma::decode(v, g),
        }
    }

    /// Applies the curve in `direction`.
    pub fn apply(&self, v: f32, direction: Direction) -> f32 {
        match direction {
            Direction::Encode => self.encode(v),
            Direction::Decode => self.decode(v),
        }
    }
}

/// A registered curve.
#[derive(Debug, Clone)]
pub struct Curve {
    /// Display name, also the lookup key after normalization.
    pub name: String,
    /// One-line description for listings.
    pub description: String,
    /// Encode/decode functions.
    pub transfer: Transfer,
}

impl Curve {
    /// A curve backed by fixed functions.
    pub fn fixed(
        name: impl Into<String>,
        description: impl Into<String>,
        encode: fn(f32) -> f32,
        decode: fn(f32) -> f32,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            transfer: Transfer::Fixed { encode, decode },
        }
    }

    /// A pure power-law curve.
    pub fn gamma(g: f32) -> Self {
        Self {
            name: format!("gamma{g}"),
            description: format!("pure power law, exponent {g}"),
            transfer: Transfer::Gamma(g),
        }
    }

    /// Input range that covers the whole signal range `[0, 1]`.
    ///
    /// For encoding this is `[decode(0), decode(1)]`, for decoding `[0, 1]`.
    pub fn natural_domain(&self, direction: Direction) -> Domain {
        match direction {
            Direction::Encode => Domain {
                min: self.transfer.decode(0.0),
                max: self.transfer.decode(1.0),
            },
            Direction::Decode => Domain::UNIT,
        }
    }

    /// Title given to LUTs sampled from this curve.
    pub fn default_title(&self, direction: Direction) -> String {
        match direction {
            Direction::Encode => format!("Lin_to_{}", self.name),
            Direction::Decode => format!("{}_to_Lin", self.name),
        }
    }

    fn check_monotonic(&self) -> LutResult<()> {
        for direction in [Direction::Encode, Direction::Decode] {
            let domain = self.natural_domain(direction);
            if !(domain.min.is_finite() && domain.max.is_finite()) || domain.min >= domain.max {
                return Err(LutError::NonMonotonicCurve(format!(
                    "{}: natural {direction} domain [{}, {}] is empty",
                    self.name, domain.min, domain.max
                )));
            }
            let mut prev = self.transfer.apply(domain.min, direction);
            for i in 1..CHECK_SAMPLES {
                let v = self.transfer.apply(domain.coordinate(i, CHECK_SAMPLES), direction);
                let slack = 1e-6 * (1.0 + prev.abs());
                if !v.is_finite() || v < prev - slack {
                    return Err(LutError::NonMonotonicCurve(format!(
                        "{} ({direction}) decreases near sample {i}",
                        self.name
                    )));
                }
                prev = v;
            }
        }
        Ok(())
    }
}

/// Lowercase, with separators removed: `S-Log3` and `slog_3` both become `slog3`.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Registry of named curves.
#[derive(Debug, Clone, Default)]
pub struct CurveRegistry {
    curves: BTreeMap<String, Curve>,
    aliases: BTreeMap<String, String>,
}

static GLOBAL: OnceLock<CurveRegistry> = OnceLock::new();

impl CurveRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry with the built-in curves. Built once, read-only.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::builtin)
    }

    /// Registry pre-filled with every built-in curve.
    pub fn builtin() -> Self {
        let mut reg = Self::new();
        let builtins = [
            Curve::fixed("linear", "identity", |v| v, |v| v),
            Curve::fixed("sRGB", "IEC 61966-2-1 piecewise sRGB", tf::srgb::encode, tf::srgb::decode),
            Curve::fixed("Rec709", "ITU-R BT.709 camera OETF", tf::rec709::encode, tf::rec709::decode),
            Curve::gamma(2.2),
            Curve::gamma(2.4),
            Curve::gamma(2.6),
            Curve::fixed("LogC3", "ARRI LogC3, EI 800", tf::log_c::encode, tf::log_c::decode),
            Curve::fixed("SLog3", "Sony S-Log3", tf::s_log3::encode, tf::s_log3::decode),
            Curve::fixed("VLog", "Panasonic V-Log", tf::v_log::encode, tf::v_log::decode),
            Curve::fixed("ACEScc", "ACES log, pure log2", tf::aces::acescc::encode, tf::aces::acescc::decode),
            Curve::fixed("ACEScct", "ACES log with linear toe", tf::aces::acescct::encode, tf::aces::acescct::decode),
            Curve::fixed("Cineon", "Kodak Cineon printing density", tf::cineon::encode, tf::cineon::decode),
            Curve::fixed("PQ", "SMPTE ST 2084, 1.0 = 10000 nits", tf::pq::encode, tf::pq::decode),
            Curve::fixed("HLG", "BT.2100 hybrid log-gamma", tf::hlg::encode, tf::hlg::decode),
        ];
        for curve in builtins {
            let name = curve.name.clone();
            if let Err(e) = reg.register(curve) {
                error!(curve = %name, error = %e, "built-in curve rejected");
            }
        }
        for (alias, target) in [
            ("alexalogcv3", "logc3"),
            ("logc", "logc3"),
            ("st2084", "pq"),
            ("bt709", "rec709"),
            ("lin", "linear"),
        ] {
            reg.aliases.insert(alias.to_string(), target.to_string());
        }
        reg
    }

    /// Adds a curve after checking it is monotonic in both directions.
    pub fn register(&mut self, curve: Curve) -> LutResult<()> {
        curve.check_monotonic()?;
        debug!(curve = %curve.name, "registered curve");
        self.curves.insert(normalize(&curve.name), curve);
        Ok(())
    }

    /// Looks up a curve by name, alias, or `gamma:<g>`.
    pub fn get(&self, name: &str) -> LutResult<Curve> {
        let key = normalize(name);
        let key = self.aliases.get(&key).cloned().unwrap_or(key);
        if let Some(curve) = self.curves.get(&key) {
            return Ok(curve.clone());
        }
        if let Some(exp) = key.strip_prefix("gamma") {
            let g: f32 = exp
                .trim_start_matches(':')
                .parse()
                .map_err(|_| LutError::UnknownCurve(name.to_string()))?;
            if !(g.is_finite() && g > 0.0) {
                return Err(LutError::UnknownCurve(format!("{name} (gamma must be positive)")));
            }
            let curve = Curve::gamma(g);
            curve.check_monotonic()?;
            return Ok(curve);
        }
        Err(LutError::UnknownCurve(name.to_string()))
    }

    /// Registered curves in name order.
    pub fn curves(&self) -> impl Iterator<Item = &Curve> {
        self.curves.values()
    }
}

/// Samples `curve_name` (encode direction) at `size` points over `domain`.
///
/// See [`sample_directed`].
pub fn sample(curve_name: &str, size: usize, domain: Domain) -> LutResult<Lut> {
    sample_directed(curve_name, Direction::Encode, size, domain)
}

/// Samples a registered curve into a 1D LUT.
///
/// Sample `i` is the curve evaluated at `domain.coordinate(i, size)`, so the
/// first and last samples sit exactly on the domain bounds.
///
/// ```rust
/// use lutlab_lut::{sample_directed, Direction, Domain};
///
/// let lut = sample_directed("gamma:2.0", Direction::Decode, 3, Domain::UNIT).unwrap();
/// assert_eq!(lut.curves().unwrap()[0], vec![0.0, 0.25, 1.0]);
/// assert_eq!(lut.title(), Some("gamma2_to_Lin"));
/// ```
pub fn sample_directed(
    curve_name: &str,
    direction: Direction,
    size: usize,
    domain: Domain,
) -> LutResult<Lut> {
    trace!(curve = curve_name, %direction, size, min = domain.min, max = domain.max, "sample curve");
    let curve = CurveRegistry::global().get(curve_name)?;
    let domain = Domain::new(domain.min, domain.max)?;
    let values = (0..size)
        .map(|i| curve.transfer.apply(domain.coordinate(i, size), direction))
        .collect();
    let mut lut = Lut::one_d(values, domain)?
        .with_precision(Precision::Float)
        .with_title(curve.default_title(direction));
    lut.metadata_mut().insert("curve".into(), curve.name.clone());
    lut.metadata_mut().insert("direction".into(), direction.to_string());
    Ok(lut)
}
