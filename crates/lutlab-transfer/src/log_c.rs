//! ARRI LogC3 at EI 800.
//!
//! ```text
//! t = c * log10(a * x + b) + d    x >  CUT
//! t = e * x + f                    x <= CUT
//! ```

const CUT: f32 = 0.010591;
const A: f32 = 5.555556;
const B: f32 = 0.052272;
const C: f32 = 0.247190;
const D: f32 = 0.385537;
const E: f32 = 5.367655;
const F: f32 = 0.092809;

/// Scene linear to LogC3.
#[inline]
pub fn encode(linear: f32) -> f32 {
    if linear > CUT {
        C * (A * linear + B).log10() + D
    } else {
        E * linear + F
    }
}

/// LogC3 to scene linear.
#[inline]
pub fn decode(log: f32) -> f32 {
    if log > E * CUT + F {
        (10.0_f32.powf((log - D) / C) - B) / A
    } else {
        (log - F) / E
    }
}
