//! sRGB piecewise transfer (IEC 61966-2-1).

const LIN_CUT: f32 = 0.0031308;
const SIG_CUT: f32 = 0.04045;

/// Linear to sRGB signal.
#[inline]
pub fn encode(linear: f32) -> f32 {
    if linear <= LIN_CUT {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// sRGB signal to linear.
#[inline]
pub fn decode(signal: f32) -> f32 {
    if signal <= SIG_CUT {
        signal / 12.92
    } else {
        ((signal + 0.055) / 1.055).powf(2.4)
    }
}
