//! Numeric precision of serialized samples.
//!
//! Every quantization step rounds half to even so that writing the same
//! LUT twice produces identical bytes.
//!
//! | Precision | Stored as | Rule |
//! |-----------|-----------|------|
//! | `Int(b)`  | code in `0..=2^b-1` | `round_half_even(clamp(v, 0, 1) * (2^b - 1))` |
//! | `Half`    | IEEE binary16 | nearest, ties to even |
//! | `Float`   | decimal text, 6 places | `round_half_even(v * 1e6) / 1e6` |

use crate::{LutError, LutResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal places used for float text output.
pub const FLOAT_DECIMALS: usize = 6;

const FLOAT_SCALE: f64 = 1e6;

/// Bit depth or numeric type used when a LUT is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "PrecisionRepr", into = "PrecisionRepr")]
pub enum Precision {
    /// Unsigned normalized integer with the given bit count (1..=16).
    Int(u8),
    /// 16-bit float.
    Half,
    /// 32-bit float written as decimal text.
    #[default]
    Float,
}

impl Precision {
    /// Validated integer precision.
    pub fn int(bits: u8) -> LutResult<Self> {
        if (1..=16).contains(&bits) {
            Ok(Self::Int(bits))
        } else {
            Err(LutError::InvalidLut(format!("integer bit depth must be 1..=16, got {bits}")))
        }
    }

    /// Largest integer code, `None` for float precisions.
    pub fn max_code(self) -> Option<u32> {
        match self {
            Self::Int(bits) => Some((1u32 << bits) - 1),
            _ => None,
        }
    }

    /// True for integer precisions.
    pub fn is_int(self) -> bool {
        matches!(self, Self::Int(_))
    }

    /// Integer code for `v`, and whether `v` had to be clamped to `[0, 1]`.
    ///
    /// Float precisions return `None`.
    pub fn to_code(self, v: f32) -> Option<(u32, bool)> {
        let max = self.max_code()?;
        let clamped = !(0.0..=1.0).contains(&v);
        let scaled = (v.clamp(0.0, 1.0) as f64 * max as f64).round_ties_even();
        Some((scaled as u32, clamped))
    }

    /// Normalized value of an integer code.
    pub fn from_code(self, code: u32) -> f32 {
        match self.max_code() {
            Some(max) => (code as f64 / max as f64) as f32,
            None => code as f32,
        }
    }

    /// Value after a store/load cycle at this precision, in `f64`.
    pub fn quantize_f64(self, v: f32) -> f64 {
        match self {
            Self::Int(_) => {
                let max = self.max_code().unwrap_or(1) as f64;
                let code = (v.clamp(0.0, 1.0) as f64 * max).round_ties_even();
                code / max
            }
            Self::Half => half::f16::from_f32(v).to_f64(),
            Self::Float => (v as f64 * FLOAT_SCALE).round_ties_even() / FLOAT_SCALE,
        }
    }

    /// Value after a store/load cycle at this precision.
    pub fn quantize(self, v: f32) -> f32 {
        self.quantize_f64(v) as f32
    }

    /// Largest round-trip error expected for a sample of magnitude `v`.
    pub fn tolerance(self, v: f32) -> f32 {
        match self {
            Self::Int(_) => {
                let max = self.max_code().unwrap_or(1) as f32;
                0.5 / max + 1e-6
            }
            Self::Half => v.abs() * 2f32.powi(-11) + 2f32.powi(-25),
            Self::Float => 0.5 / FLOAT_SCALE as f32 + v.abs() * 2.0 * f32::EPSILON,
        }
    }

    /// False when storing `v` would overflow the format, as binary16 does
    /// past 65504. Integer precisions clamp instead.
    pub fn represents(self, v: f32) -> bool {
        match self {
            Self::Half => half::f16::from_f32(v).is_finite(),
            _ => v.is_finite(),
        }
    }

    /// Formats `v` for a float text format.
    ///
    /// `Float` prints exactly [`FLOAT_DECIMALS`] places; `Half` prints the
    /// shortest decimal that reads back to the same binary16 value.
    /// Integer precisions print the normalized quantized value.
    pub fn format_value(self, v: f32) -> String {
        match self {
            Self::Half => format!("{}", half::f16::from_f32(v).to_f32()),
            _ => {
                let q = self.quantize_f64(v);
                // Avoid "-0.000000".
                let q = if q == 0.0 { 0.0 } else { q };
                format!("{:.*}", FLOAT_DECIMALS, q)
            }
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(bits) => write!(f, "{bits}"),
            Self::Half => f.write_str("half"),
            Self::Float => f.write_str("float"),
        }
    }
}

impl FromStr for Precision {
    type Err = LutError;

    /// Accepts `8`, `10`, `12`, `16` (any 1..=16), `16f`/`half`, `32f`/`float`.
    fn from_str(s: &str) -> LutResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "half" | "16f" | "f16" => Ok(Self::Half),
            "float" | "32f" | "f32" => Ok(Self::Float),
            other => {
                let bits: u8 = other.parse().map_err(|_| {
                    LutError::InvalidLut(format!("unknown precision '{s}'"))
                })?;
                Self::int(bits)
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PrecisionRepr {
    Bits(u8),
    Name(String),
}

impl TryFrom<PrecisionRepr> for Precision {
    type Error = LutError;

    fn try_from(repr: PrecisionRepr) -> LutResult<Self> {
        match repr {
            PrecisionRepr::Bits(bits) => Self::int(bits),
            PrecisionRepr::Name(name) => name.parse(),
        }
    }
}

impl From<Precision> for PrecisionRepr {
    fn from(p: Precision) -> Self {
        match p {
            Precision::Int(bits) => Self::Bits(bits),
            other => Self::Name(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_codes() {
        let p = Precision::Int(10);
        assert_eq!(p.max_code(), Some(1023));
        assert_eq!(p.to_code(1.0), Some((1023, false)));
        assert_eq!(p.to_code(1.5), Some((1023, true)));
        assert_eq!(p.to_code(-0.1), Some((0, true)));
        assert_eq!(p.from_code(1023), 1.0);
    }

    #[test]
    fn test_ties_to_even() {
        // With one bit, 0.5 sits exactly between codes 0 and 1.
        assert_eq!(Precision::Int(1).to_code(0.5), Some((0, false)));
        assert_eq!(Precision::Int(2).to_code(0.5), Some((2, false)));
    }

    #[test]
    fn test_float_format() {
        assert_eq!(Precision::Float.format_value(0.25), "0.250000");
        assert_eq!(Precision::Float.format_value(-0.0000001), "0.000000");
        let text = Precision::Half.format_value(0.1);
        assert_eq!(text.parse::<f32>().unwrap(), half::f16::from_f32(0.1).to_f32());
    }

    #[test]
    fn test_half_range() {
        assert!(Precision::Half.represents(65504.0));
        assert!(Precision::Half.represents(-1000.0));
        assert!(!Precision::Half.represents(70000.0));
        assert!(!Precision::Half.represents(-1e6));
        assert!(Precision::Float.represents(70000.0));
        assert!(Precision::Int(10).represents(70000.0));
    }

    #[test]
    fn test_parse() {
        assert_eq!("12".parse::<Precision>().unwrap(), Precision::Int(12));
        assert_eq!("half".parse::<Precision>().unwrap(), Precision::Half);
        assert_eq!("32f".parse::<Precision>().unwrap(), Precision::Float);
        assert!("17".parse::<Precision>().is_err());
        assert!("fast".parse::<Precision>().is_err());
    }

    #[test]
    fn test_serde() {
        let p: Precision = serde_json::from_str("10").unwrap();
        assert_eq!(p, Precision::Int(10));
        let p: Precision = serde_json::from_str("\"half\"").unwrap();
        assert_eq!(p, Precision::Half);
        assert_eq!(serde_json::to_string(&Precision::Float).unwrap(), "\"float\"");
    }

    #[test]
    fn test_tolerance_covers_quantization() {
        for p in [Precision::Int(8), Precision::Int(12), Precision::Half, Precision::Float] {
            for i in 0..=1000 {
                let v = i as f32 / 1000.0;
                assert!((p.quantize(v) - v).abs() <= p.tolerance(v), "{p} {v}");
            }
        }
    }
}
