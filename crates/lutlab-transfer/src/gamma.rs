//! Pure power-law gamma.
//!
//! `decode(v) = v^g`, `encode(v) = v^(1/g)`. Non-positive inputs map to 0
//! so the curve stays monotonic on the whole real line.

/// Linear to signal with exponent `1/g`.
#[inline]
pub fn encode(linear: f32, g: f32) -> f32 {
    if linear <= 0.0 { 0.0 } else { linear.powf(1.0 / g) }
}

/// Signal to linear with exponent `g`.
#[inline]
pub fn decode(signal: f32, g: f32) -> f32 {
    if signal <= 0.0 { 0.0 } else { signal.powf(g) }
}
