//! LUT file formats.
//!
//! Each supported format is a variant of [`LutFormat`], and every variant
//! implements [`FormatHandler`]. The set is closed: adding a format means
//! adding a module here, a variant, and registering it in
//! [`FormatRegistry`](crate::FormatRegistry).
//!
//! | Tag | Extension | Dimensionality | Samples |
//! |-----|-----------|----------------|---------|
//! | `cube`  | `.cube`  | 2D, 3D     | float text |
//! | `spi1d` | `.spi1d` | 1D, 2D     | float text |
//! | `spi3d` | `.spi3d` | 3D         | float text |
//! | `csp`   | `.csp`   | 2D, 3D     | float text |
//! | `3dl`   | `.3dl`   | 3D         | integer text |
//! | `1dl`   | `.1dl`   | 1D, 2D     | integer or float text |
//! | `mga`   | `.mga`   | 3D         | integer text |
//! | `json`  | `.json`  | 1D, 2D, 3D | JSON numbers |

pub mod csp;
pub mod cube;
pub mod discreet;
pub mod json;
pub mod pandora;
pub mod spi;
pub mod threedl;

mod text;

use crate::lut::{Dimensionality, Lut};
use crate::{LutError, LutResult, Precision};
use std::fmt;

/// Options applied when serializing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WriteOptions {
    /// Target precision. `None` picks the LUT's own precision when the
    /// format can store it, else the format default.
    pub precision: Option<Precision>,
}

/// Read/write capability shared by every format.
pub trait FormatHandler {
    /// Short identifier, e.g. `"cube"`.
    fn tag(&self) -> &'static str;

    /// File extensions without the dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Human-readable name.
    fn description(&self) -> &'static str;

    /// Shapes this format can store.
    fn supported_dimensionalities(&self) -> &'static [Dimensionality];

    /// Precisions this format can store.
    fn supported_precisions(&self) -> &'static [Precision];

    /// Precision used when neither the caller nor the LUT picks a storable one.
    fn default_precision(&self) -> Precision;

    /// Parses file contents.
    fn read(&self, bytes: &[u8]) -> LutResult<Lut>;

    /// Serializes `lut`.
    fn write(&self, lut: &Lut, options: &WriteOptions) -> LutResult<Vec<u8>>;

    /// True if `dim` is storable.
    fn supports(&self, dim: Dimensionality) -> bool {
        self.supported_dimensionalities().contains(&dim)
    }

    /// Resolves the precision a write will use.
    ///
    /// An explicit request the format cannot store is an
    /// [`LutError::IncompatibleConversion`]. A LUT precision the format
    /// cannot store silently falls back to the default.
    fn output_precision(&self, lut: &Lut, options: &WriteOptions) -> LutResult<Precision> {
        let supported = self.supported_precisions();
        match options.precision {
            Some(p) if supported.contains(&p) => Ok(p),
            Some(p) => Err(LutError::IncompatibleConversion(format!(
                "{} cannot store samples at precision {p}",
                self.tag()
            ))),
            None if supported.contains(&lut.precision()) => Ok(lut.precision()),
            None => Ok(self.default_precision()),
        }
    }
}

/// Every supported LUT format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LutFormat {
    /// Adobe/Resolve `.cube`.
    Cube,
    /// Sony Imageworks 1D.
    Spi1d,
    /// Sony Imageworks 3D.
    Spi3d,
    /// Rising Sun Research CineSpace.
    Csp,
    /// Autodesk Lustre/Flame 3D.
    ThreeDl,
    /// Autodesk Discreet 1D.
    Discreet1dl,
    /// Pandora `.mga`.
    Pandora,
    /// Lossless JSON document.
    Json,
}

impl LutFormat {
    /// All variants, in registry order.
    pub const ALL: [Self; 8] = [
        Self::Cube,
        Self::Spi1d,
        Self::Spi3d,
        Self::Csp,
        Self::ThreeDl,
        Self::Discreet1dl,
        Self::Pandora,
        Self::Json,
    ];
}

impl fmt::Display for LutFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

const FLOAT_TEXT: &[Precision] = &[Precision::Float, Precision::Half];
const LUSTRE_DEPTHS: &[Precision] = &[Precision::Int(10), Precision::Int(12), Precision::Int(16)];
const PANDORA_DEPTHS: &[Precision] = &[
    Precision::Int(8),
    Precision::Int(10),
    Precision::Int(12),
    Precision::Int(14),
    Precision::Int(16),
];
const DISCREET_DEPTHS: &[Precision] = &[
    Precision::Int(8),
    Precision::Int(10),
    Precision::Int(12),
    Precision::Int(16),
    Precision::Half,
    Precision::Float,
];

const JSON_DEPTHS: &[Precision] = &[
    Precision::Float,
    Precision::Half,
    Precision::Int(8),
    Precision::Int(10),
    Precision::Int(12),
    Precision::Int(16),
];

impl FormatHandler for LutFormat {
    fn tag(&self) -> &'static str {
        match self {
            Self::Cube => "cube",
            Self::Spi1d => "spi1d",
            Self::Spi3d => "spi3d",
            Self::Csp => "csp",
            Self::ThreeDl => "3dl",
            Self::Discreet1dl => "1dl",
            Self::Pandora => "mga",
            Self::Json => "json",
        }
    }

    fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Cube => &["cube"],
            Self::Spi1d => &["spi1d"],
            Self::Spi3d => &["spi3d"],
            Self::Csp => &["csp"],
            Self::ThreeDl => &["3dl"],
            Self::Discreet1dl => &["1dl"],
            Self::Pandora => &["mga", "m3d"],
            Self::Json => &["json"],
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Cube => "Adobe / Resolve cube",
            Self::Spi1d => "Sony Pictures Imageworks 1D",
            Self::Spi3d => "Sony Pictures Imageworks 3D",
            Self::Csp => "CineSpace",
            Self::ThreeDl => "Autodesk Lustre / Flame 3D",
            Self::Discreet1dl => "Autodesk Discreet 1D",
            Self::Pandora => "Pandora",
            Self::Json => "lutlab JSON",
        }
    }

    fn supported_dimensionalities(&self) -> &'static [Dimensionality] {
        use Dimensionality::*;
        match self {
            Self::Cube | Self::Csp => &[TwoD, ThreeD],
            Self::Spi1d | Self::Discreet1dl => &[OneD, TwoD],
            Self::Spi3d | Self::ThreeDl | Self::Pandora => &[ThreeD],
            Self::Json => &[OneD, TwoD, ThreeD],
        }
    }

    fn supported_precisions(&self) -> &'static [Precision] {
        match self {
            Self::Cube | Self::Spi1d | Self::Spi3d | Self::Csp => FLOAT_TEXT,
            Self::ThreeDl => LUSTRE_DEPTHS,
            Self::Pandora => PANDORA_DEPTHS,
            Self::Discreet1dl => DISCREET_DEPTHS,
            Self::Json => JSON_DEPTHS,
        }
    }

    fn default_precision(&self) -> Precision {
        match self {
            Self::ThreeDl | Self::Pandora | Self::Discreet1dl => Precision::Int(12),
            _ => Precision::Float,
        }
    }

    fn read(&self, bytes: &[u8]) -> LutResult<Lut> {
        match self {
            Self::Cube => cube::parse(bytes),
            Self::Spi1d => spi::parse_1d(bytes),
            Self::Spi3d => spi::parse_3d(bytes),
            Self::Csp => csp::parse(bytes),
            Self::ThreeDl => threedl::parse(bytes),
            Self::Discreet1dl => discreet::parse(bytes),
            Self::Pandora => pandora::parse(bytes),
            Self::Json => json::parse(bytes),
        }
    }

    fn write(&self, lut: &Lut, options: &WriteOptions) -> LutResult<Vec<u8>> {
        if !self.supports(lut.dimensionality()) {
            return Err(LutError::IncompatibleConversion(format!(
                "{} cannot store a {} LUT",
                self.tag(),
                lut.dimensionality()
            )));
        }
        let precision = self.output_precision(lut, options)?;
        let (lo, hi) = lut.value_range();
        if let Some(v) = [lo, hi].into_iter().find(|&v| !precision.represents(v)) {
            return Err(LutError::IncompatibleConversion(format!(
                "{} at {precision} precision cannot hold sample value {v}",
                self.tag()
            )));
        }
        let mut out = Vec::new();
        match self {
            Self::Cube => cube::write_to(&mut out, lut, precision)?,
            Self::Spi1d => spi::write_1d_to(&mut out, lut, precision)?,
            Self::Spi3d => spi::write_3d_to(&mut out, lut, precision)?,
            Self::Csp => csp::write_to(&mut out, lut, precision)?,
            Self::ThreeDl => threedl::write_to(&mut out, lut, precision)?,
            Self::Discreet1dl => discreet::write_to(&mut out, lut, precision)?,
            Self::Pandora => pandora::write_to(&mut out, lut, precision)?,
            Self::Json => json::write_to(&mut out, lut, precision)?,
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Domain;

    #[test]
    fn test_half_overflow_is_refused() {
        let lut = Lut::two_d(
            [vec![0.0, 1.0], vec![0.0, 80_000.0], vec![0.0, 1.0]],
            [Domain::UNIT; 3],
        )
        .unwrap();
        let half = WriteOptions { precision: Some(Precision::Half) };
        for format in [LutFormat::Cube, LutFormat::Spi1d, LutFormat::Csp, LutFormat::Discreet1dl, LutFormat::Json] {
            assert!(
                matches!(format.write(&lut, &half), Err(LutError::IncompatibleConversion(_))),
                "{format}"
            );
            let bytes = format.write(&lut, &WriteOptions { precision: Some(Precision::Float) }).unwrap();
            assert_eq!(format.read(&bytes).unwrap().curves().unwrap()[1][1], 80_000.0, "{format}");
        }
    }
}
