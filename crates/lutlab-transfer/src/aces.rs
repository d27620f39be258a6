//! ACES log encodings: ACEScc (pure log) and ACEScct (log with a linear toe).
//!
//! Both share the `(log2(x) + 9.72) / 17.52` segment and differ below it.
//! Reference: AMPAS S-2014-003 and S-2016-001.

const HALF_MAX: f32 = 65504.0;

/// ACEScc.
pub mod acescc {
    use super::HALF_MAX;

    const TWO_POW_M16: f32 = 1.0 / 65536.0;
    const TWO_POW_M15: f32 = 1.0 / 32768.0;

    /// ACES linear to ACEScc. Non-positive input clamps to `log2(2^-16)`.
    #[inline]
    pub fn encode(linear: f32) -> f32 {
        if linear <= 0.0 {
            (TWO_POW_M16.log2() + 9.72) / 17.52
        } else if linear < TWO_POW_M15 {
            ((TWO_POW_M16 + linear * 0.5).log2() + 9.72) / 17.52
        } else {
            (linear.log2() + 9.72) / 17.52
        }
    }

    /// ACEScc to ACES linear, saturating at half-float max.
    #[inline]
    pub fn decode(cc: f32) -> f32 {
        if cc < (9.72 - 15.0) / 17.52 {
            ((cc * 17.52 - 9.72).exp2() - TWO_POW_M16) * 2.0
        } else if cc < (HALF_MAX.log2() + 9.72) / 17.52 {
            (cc * 17.52 - 9.72).exp2()
        } else {
            HALF_MAX
        }
    }
}

/// ACEScct.
pub mod acescct {
    const X_BRK: f32 = 0.0078125;
    const Y_BRK: f32 = 0.155251141552511;
    const A: f32 = 10.5402377416545;
    const B: f32 = 0.0729055341958355;

    /// ACES linear to ACEScct.
    #[inline]
    pub fn encode(linear: f32) -> f32 {
        if linear <= X_BRK {
            A * linear + B
        } else {
            (linear.log2() + 9.72) / 17.52
        }
    }

    /// ACEScct to ACES linear.
    #[inline]
    pub fn decode(cct: f32) -> f32 {
        if cct <= Y_BRK {
            (cct - B) / A
        } else {
            (cct * 17.52 - 9.72).exp2()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_acescc_mid_gray() {
        assert_abs_diff_eq!(acescc::encode(0.18), 0.4135, epsilon = 1e-3);
        assert_abs_diff_eq!(acescc::decode(acescc::encode(0.18)), 0.18, epsilon = 1e-5);
    }

    #[test]
    fn test_acescct_toe() {
        assert_abs_diff_eq!(acescct::encode(0.0), 0.0729055, epsilon = 1e-6);
        assert_abs_diff_eq!(acescct::decode(acescct::encode(0.004)), 0.004, epsilon = 1e-6);
        assert_abs_diff_eq!(acescct::decode(acescct::encode(0.18)), 0.18, epsilon = 1e-5);
    }
}
