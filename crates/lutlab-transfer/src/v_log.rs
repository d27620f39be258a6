//! Panasonic V-Log.

const CUT: f32 = 0.01;
const B: f32 = 0.00873;
const C: f32 = 0.241514;
const D: f32 = 0.598206;

/// Scene linear to V-Log.
#[inline]
pub fn encode(linear: f32) -> f32 {
    if linear < CUT {
        5.6 * linear + 0.125
    } else {
        C * (linear + B).log10() + D
    }
}

/// V-Log to scene linear.
#[inline]
pub fn decode(log: f32) -> f32 {
    if log < 0.181 {
        (log - 0.125) / 5.6
    } else {
        10.0_f32.powf((log - D) / C) - B
    }
}
