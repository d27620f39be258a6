//! Hybrid Log-Gamma OETF (ARIB STD-B67 / BT.2100) and its inverse.

const A: f32 = 0.17883277;
const B: f32 = 0.28466892;
const C: f32 = 0.55991073;

/// Scene linear `[0, 1]` to HLG signal.
#[inline]
pub fn encode(linear: f32) -> f32 {
    if linear <= 0.0 {
        0.0
    } else if linear <= 1.0 / 12.0 {
        (3.0 * linear).sqrt()
    } else {
        A * (12.0 * linear - B).ln() + C
    }
}

/// HLG signal to scene linear.
#[inline]
pub fn decode(signal: f32) -> f32 {
    if signal <= 0.0 {
        0.0
    } else if signal <= 0.5 {
        signal * signal / 3.0
    } else {
        (((signal - C) / A).exp() + B) / 12.0
    }
}
