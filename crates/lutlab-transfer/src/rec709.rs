//! ITU-R BT.709 camera OETF and its exact inverse.

const BETA: f32 = 0.018_053_968;
const ALPHA: f32 = 1.099_296_8;

/// Linear to Rec.709 signal.
#[inline]
pub fn encode(linear: f32) -> f32 {
    if linear < BETA {
        4.5 * linear
    } else {
        ALPHA * linear.powf(0.45) - (ALPHA - 1.0)
    }
}

/// Rec.709 signal to linear.
#[inline]
pub fn decode(signal: f32) -> f32 {
    if signal < 4.5 * BETA {
        signal / 4.5
    } else {
        ((signal + (ALPHA - 1.0)) / ALPHA).powf(1.0 / 0.45)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rec709() {
        assert_abs_diff_eq!(encode(1.0), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(encode(0.01), 0.045, epsilon = 1e-7);
        for i in 0..=50 {
            let v = i as f32 / 50.0;
            assert_abs_diff_eq!(decode(encode(v)), v, epsilon = 1e-5);
        }
    }
}
