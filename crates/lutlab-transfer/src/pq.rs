//! SMPTE ST 2084 (PQ), normalized so that 1.0 linear is 10000 cd/m2.

const M1: f32 = 2610.0 / 16384.0;
const M2: f32 = 2523.0 / 4096.0 * 128.0;
const C1: f32 = 3424.0 / 4096.0;
const C2: f32 = 2413.0 / 4096.0 * 32.0;
const C3: f32 = 2392.0 / 4096.0 * 32.0;

/// Peak luminance represented by a linear value of 1.0, in cd/m2.
pub const PEAK_NITS: f32 = 10000.0;

/// Normalized linear luminance to PQ signal. Input is clamped to `[0, 1]`.
#[inline]
pub fn encode(linear: f32) -> f32 {
    if linear <= 0.0 {
        return 0.0;
    }
    let yp = linear.min(1.0).powf(M1);
    ((C1 + C2 * yp) / (1.0 + C3 * yp)).powf(M2)
}

/// PQ signal to normalized linear luminance. Input is clamped to `[0, 1]`.
#[inline]
pub fn decode(signal: f32) -> f32 {
    if signal <= 0.0 {
        return 0.0;
    }
    let vp = signal.min(1.0).powf(1.0 / M2);
    let num = (vp - C1).max(0.0);
    (num / (C2 - C3 * vp)).powf(1.0 / M1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_reference_white() {
        // 100 nits encodes to about 0.508.
        assert_abs_diff_eq!(encode(100.0 / PEAK_NITS), 0.508, epsilon = 1e-3);
        assert_abs_diff_eq!(encode(1.0), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(decode(encode(0.01)), 0.01, epsilon = 1e-5);
    }
}
