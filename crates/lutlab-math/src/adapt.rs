//! Chromatic adaptation transforms (CAT).
//!
//! Converting between colorspaces with different white points (D65 sRGB to
//! D60 ACES, for instance) needs an adaptation step in XYZ. The von Kries
//! style transforms here map both whites into a cone-like response space,
//! scale per channel, and map back:
//!
//! ```text
//! M_cat^-1 * diag(dst_cone / src_cone) * M_cat
//! ```

use crate::{Mat3, Vec3};

/// Bradford cone response matrix.
pub const BRADFORD: Mat3 = Mat3::from_rows([
    [0.8951, 0.2664, -0.1614],
    [-0.7502, 1.7135, 0.0367],
    [0.0389, -0.0685, 1.0296],
]);

/// CAT02 cone response matrix (CIECAM02).
pub const CAT02: Mat3 = Mat3::from_rows([
    [0.7328, 0.4296, -0.1624],
    [-0.7036, 1.6975, 0.0061],
    [0.0030, 0.0136, 0.9834],
]);

/// Von Kries (Hunt-Pointer-Estevez) cone response matrix.
pub const VON_KRIES: Mat3 = Mat3::from_rows([
    [0.40024, 0.70760, -0.08081],
    [-0.22630, 1.16532, 0.04570],
    [0.00000, 0.00000, 0.91822],
]);

/// Adaptation method used between two white points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Adaptation {
    /// No adaptation; XYZ passes through unchanged.
    #[default]
    None,
    /// Bradford (Lam 1985).
    Bradford,
    /// CAT02.
    Cat02,
    /// Von Kries.
    VonKries,
}

impl Adaptation {
    /// Cone response matrix, `None` for [`Adaptation::None`].
    pub fn cone_matrix(self) -> Option<Mat3> {
        match self {
            Self::None => None,
            Self::Bradford => Some(BRADFORD),
            Self::Cat02 => Some(CAT02),
            Self::VonKries => Some(VON_KRIES),
        }
    }

    /// XYZ to XYZ matrix adapting `src_white` to `dst_white`.
    ///
    /// Both whites are XYZ tristimulus values. Returns identity for
    /// [`Adaptation::None`] or when the whites coincide.
    ///
    /// ```rust
    /// use lutlab_math::{Adaptation, Vec3};
    ///
    /// let d65 = Vec3::new(0.95047, 1.0, 1.08883);
    /// let d50 = Vec3::new(0.96422, 1.0, 0.82521);
    /// let m = Adaptation::Bradford.matrix(d65, d50);
    /// assert!((m * d65).max_abs_diff(d50) < 1e-9);
    /// ```
    pub fn matrix(self, src_white: Vec3, dst_white: Vec3) -> Mat3 {
        let Some(cone) = self.cone_matrix() else {
            return Mat3::IDENTITY;
        };
        if src_white == dst_white {
            return Mat3::IDENTITY;
        }
        // The three cone matrices above are well conditioned.
        let Some(cone_inv) = cone.inverse() else {
            return Mat3::IDENTITY;
        };
        let gain = (cone * dst_white) / (cone * src_white);
        cone_inv * Mat3::diagonal(gain.x, gain.y, gain.z) * cone
    }
}
