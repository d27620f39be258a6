//! Chromaticity-based colorspace descriptions.

use lutlab_math::Vec3;
use std::borrow::Cow;

/// CIE 1931 xy chromaticity coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chromaticity {
    /// x coordinate
    pub x: f64,
    /// y coordinate
    pub y: f64,
}

impl Chromaticity {
    /// Creates a chromaticity pair.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// XYZ tristimulus for this chromaticity at luminance Y = 1.
    ///
    /// Returns `None` when `y` is zero, where xyY to XYZ is undefined.
    pub fn to_xyz(self) -> Option<Vec3> {
        if self.y.abs() < 1e-12 {
            return None;
        }
        Some(Vec3::new(self.x / self.y, 1.0, (1.0 - self.x - self.y) / self.y))
    }
}

/// CIE D65 white point.
pub const D65: Chromaticity = Chromaticity::new(0.3127, 0.3290);
/// CIE D50 white point.
pub const D50: Chromaticity = Chromaticity::new(0.3457, 0.3585);
/// ACES white point (approximately D60).
pub const D60: Chromaticity = Chromaticity::new(0.32168, 0.33767);
/// DCI theatrical white point.
pub const DCI_WHITE: Chromaticity = Chromaticity::new(0.314, 0.351);

/// A colorspace defined by its primaries and white point.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorspaceDescriptor {
    /// Identifier.
    pub name: Cow<'static, str>,
    /// Red, green and blue primaries, in that order.
    pub primaries: [Chromaticity; 3],
    /// Reference white.
    pub white_point: Chromaticity,
}

impl ColorspaceDescriptor {
    /// Builds a descriptor from raw coordinates, e.g. from command-line input.
    pub fn custom(
        name: impl Into<String>,
        primaries: [(f64, f64); 3],
        white_point: (f64, f64),
    ) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            primaries: primaries.map(|(x, y)| Chromaticity::new(x, y)),
            white_point: Chromaticity::new(white_point.0, white_point.1),
        }
    }

    pub(crate) const fn builtin(
        name: &'static str,
        r: (f64, f64),
        g: (f64, f64),
        b: (f64, f64),
        white_point: Chromaticity,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            primaries: [
                Chromaticity::new(r.0, r.1),
                Chromaticity::new(g.0, g.1),
                Chromaticity::new(b.0, b.1),
            ],
            white_point,
        }
    }
}
