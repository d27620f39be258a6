//! 3x3 matrix type for colorspace transforms.
//!
//! # Convention
//!
//! Stored **row-major**, applied to **column vectors**:
//!
//! ```text
//! | m00 m01 m02 |   | x |   | m00*x + m01*y + m02*z |
//! | m10 m11 m12 | * | y | = | m10*x + m11*y + m12*z |
//! | m20 m21 m22 |   | z |   | m20*x + m21*y + m22*z |
//! ```
//!
//! An RGB to XYZ matrix therefore has the XYZ of each primary in its
//! columns, and multiplying it by `(1, 1, 1)` yields the white point.

use crate::Vec3;
use std::ops::{Index, Mul};

/// Determinant magnitude below which a matrix is treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-9;

/// A 3x3 `f64` matrix, row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    /// Rows of the matrix.
    pub m: [[f64; 3]; 3],
}

impl Mat3 {
    /// All zeros.
    pub const ZERO: Self = Self { m: [[0.0; 3]; 3] };

    /// Identity matrix.
    pub const IDENTITY: Self = Self::diagonal(1.0, 1.0, 1.0);

    /// Creates a matrix from rows.
    #[inline]
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { m: rows }
    }

    /// Creates a matrix from columns.
    #[inline]
    pub const fn from_cols(cols: [[f64; 3]; 3]) -> Self {
        Self {
            m: [
                [cols[0][0], cols[1][0], cols[2][0]],
                [cols[0][1], cols[1][1], cols[2][1]],
                [cols[0][2], cols[1][2], cols[2][2]],
            ],
        }
    }

    /// Creates a matrix whose columns are the given vectors.
    #[inline]
    pub fn from_col_vecs(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self::from_cols([c0.to_array(), c1.to_array(), c2.to_array()])
    }

    /// Creates a diagonal matrix.
    #[inline]
    pub const fn diagonal(d0: f64, d1: f64, d2: f64) -> Self {
        Self {
            m: [[d0, 0.0, 0.0], [0.0, d1, 0.0], [0.0, 0.0, d2]],
        }
    }

    /// Returns row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> Vec3 {
        Vec3::from_array(self.m[i])
    }

    /// Returns column `i`.
    #[inline]
    pub fn col(&self, i: usize) -> Vec3 {
        Vec3::new(self.m[0][i], self.m[1][i], self.m[2][i])
    }

    /// Returns the transpose.
    pub fn transpose(&self) -> Self {
        Self::from_cols(self.m)
    }

    /// Computes the determinant.
    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Computes the inverse.
    ///
    /// Returns `None` when `|det| < SINGULAR_EPSILON` or the result is not finite.
    ///
    /// ```rust
    /// use lutlab_math::Mat3;
    ///
    /// let m = Mat3::diagonal(2.0, 4.0, 8.0);
    /// let inv = m.inverse().unwrap();
    /// assert_eq!(inv, Mat3::diagonal(0.5, 0.25, 0.125));
    /// ```
    pub fn inverse(&self) -> Option<Self> {
        if self.determinant().abs() < SINGULAR_EPSILON {
            return None;
        }
        let inv = Self::from_glam(self.to_glam().inverse());
        inv.is_finite().then_some(inv)
    }

    /// Multiplies two matrices.
    pub fn mul_mat(&self, other: &Self) -> Self {
        let mut out = Self::ZERO;
        for i in 0..3 {
            for j in 0..3 {
                out.m[i][j] = self.m[i][0] * other.m[0][j]
                    + self.m[i][1] * other.m[1][j]
                    + self.m[i][2] * other.m[2][j];
            }
        }
        out
    }

    /// Returns true if all elements are finite.
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }

    /// Largest absolute element difference to `other`.
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// Converts to glam's column-major `DMat3`.
    #[inline]
    pub fn to_glam(&self) -> glam::DMat3 {
        glam::DMat3::from_cols_array_2d(&self.transpose().m)
    }

    /// Creates from glam's column-major `DMat3`.
    #[inline]
    pub fn from_glam(m: glam::DMat3) -> Self {
        Self::from_cols(m.to_cols_array_2d())
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        Vec3::new(self.row(0).dot(v), self.row(1).dot(v), self.row(2).dot(v))
    }
}

impl Mul for Mat3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.mul_mat(&rhs)
    }
}

impl Index<usize> for Mat3 {
    type Output = [f64; 3];

    #[inline]
    fn index(&self, i: usize) -> &[f64; 3] {
        &self.m[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_identity() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Mat3::IDENTITY * v, v);
    }

    #[test]
    fn test_cols_vs_rows() {
        let m = Mat3::from_cols([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        assert_eq!(m.row(0), Vec3::new(1.0, 4.0, 7.0));
        assert_eq!(m.col(1), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(m.transpose().transpose(), m);
    }

    #[test]
    fn test_inverse_roundtrip() {
        let m = Mat3::from_rows([
            [0.4124564, 0.3575761, 0.1804375],
            [0.2126729, 0.7151522, 0.0721750],
            [0.0193339, 0.1191920, 0.9503041],
        ]);
        let inv = m.inverse().unwrap();
        let id = m * inv;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(id[i][j], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_singular() {
        let m = Mat3::from_rows([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 0.0]]);
        assert!(m.determinant().abs() < SINGULAR_EPSILON);
        assert!(m.inverse().is_none());
    }

    #[test]
    fn test_glam_roundtrip() {
        let m = Mat3::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 10.0]]);
        assert_eq!(Mat3::from_glam(m.to_glam()), m);
    }
}
