//! # lutlab-math
//!
//! Linear algebra used by the colorspace matrix builder.
//!
//! - [`Vec3`] - XYZ/RGB triplets
//! - [`Mat3`] - row-major 3x3 matrices with determinant and inverse
//! - [`Adaptation`] - chromatic adaptation transforms (Bradford, CAT02, Von Kries)
//! - [`lerp`] - scalar interpolation shared by the LUT resampler
//!
//! Everything here is `f64`. Matrices derived from chromaticity coordinates
//! are sensitive to rounding, and the values are exported as text with
//! many significant digits.
//!
//! # Convention
//!
//! Matrices use **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! # Usage
//!
//! ```rust
//! use lutlab_math::{Mat3, Vec3};
//!
//! let m = Mat3::diagonal(2.0, 2.0, 2.0);
//! let v = m * Vec3::new(1.0, 0.5, 0.25);
//! assert_eq!(v, Vec3::new(2.0, 1.0, 0.5));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod adapt;
mod mat3;
mod vec3;

pub use adapt::*;
pub use mat3::*;
pub use vec3::*;

/// Linear interpolation between `a` and `b`.
///
/// `t = 0` returns `a` exactly and `t = 1` returns `b` exactly.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    if t >= 1.0 { b } else { a + (b - a) * t }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_hits_endpoints() {
        assert_eq!(lerp(0.1, 0.7, 0.0), 0.1);
        assert_eq!(lerp(0.1, 0.7, 1.0), 0.7);
        assert!((lerp(0.0, 1.0, 0.25) - 0.25).abs() < 1e-7);
    }
}
