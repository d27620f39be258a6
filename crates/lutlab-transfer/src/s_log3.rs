//! Sony S-Log3.

const LIN_CUT: f32 = 0.01125;
const TOE: f32 = 171.2102946929;

/// Scene linear to S-Log3.
#[inline]
pub fn encode(linear: f32) -> f32 {
    if linear >= LIN_CUT {
        (420.0 + ((linear + 0.01) / 0.19).log10() * 261.5) / 1023.0
    } else {
        (linear * (TOE - 95.0) / LIN_CUT + 95.0) / 1023.0
    }
}

/// S-Log3 to scene linear.
#[inline]
pub fn decode(log: f32) -> f32 {
    if log >= TOE / 1023.0 {
        10.0_f32.powf((log * 1023.0 - 420.0) / 261.5) * 0.19 - 0.01
    } else {
        (log * 1023.0 - 95.0) * LIN_CUT / (TOE - 95.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_slog3() {
        // 18% grey sits at code 420.
        assert_abs_diff_eq!(encode(0.18), 420.0 / 1023.0, epsilon = 1e-6);
        assert_abs_diff_eq!(encode(0.0), 95.0 / 1023.0, epsilon = 1e-6);
        assert_abs_diff_eq!(decode(encode(0.9)), 0.9, epsilon = 1e-5);
    }
}
