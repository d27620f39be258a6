//! Kodak Cineon log (printing density, 10-bit code values).
//!
//! Reference white sits at code 685 and reference black at code 95, with
//! 300 codes per decade of exposure (0.002 density per code, 0.6 gamma).

const WHITE: f32 = 685.0;
const CODES_PER_DECADE: f32 = 300.0;

fn black_offset() -> f32 {
    10.0_f32.powf((95.0 - WHITE) / CODES_PER_DECADE)
}

/// Scene linear to normalized Cineon code value.
#[inline]
pub fn encode(linear: f32) -> f32 {
    let black = black_offset();
    let arg = (linear * (1.0 - black) + black).max(f32::MIN_POSITIVE);
    (WHITE + CODES_PER_DECADE * arg.log10()) / 1023.0
}

/// Normalized Cineon code value to scene linear.
#[inline]
pub fn decode(code: f32) -> f32 {
    let black = black_offset();
    (10.0_f32.powf((code * 1023.0 - WHITE) / CODES_PER_DECADE) - black) / (1.0 - black)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_reference_points() {
        assert_abs_diff_eq!(encode(0.0), 95.0 / 1023.0, epsilon = 1e-5);
        assert_abs_diff_eq!(encode(1.0), 685.0 / 1023.0, epsilon = 1e-5);
        assert_abs_diff_eq!(decode(encode(0.18)), 0.18, epsilon = 1e-5);
    }
}
