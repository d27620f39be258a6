//! # lutlab-transfer
//!
//! Transfer functions relating linear light to an encoded signal.
//!
//! Every module exposes an `encode` (linear -> signal) and `decode`
//! (signal -> linear) pair. All functions accept any real input and are
//! monotonically non-decreasing, which the curve registry in `lutlab-lut`
//! relies on when it samples them into 1D LUTs.
//!
//! | Module | Curve | Linear range |
//! |--------|-------|--------------|
//! | [`gamma`] | pure power law | [0, 1] |
//! | [`srgb`] | IEC 61966-2-1 | [0, 1] |
//! | [`rec709`] | ITU-R BT.709 OETF | [0, 1] |
//! | [`log_c`] | ARRI LogC3 (EI 800) | scene-referred |
//! | [`s_log3`] | Sony S-Log3 | scene-referred |
//! | [`v_log`] | Panasonic V-Log | scene-referred |
//! | [`aces`] | ACEScc, ACEScct | scene-referred |
//! | [`cineon`] | Kodak Cineon printing density | scene-referred |
//! | [`pq`] | SMPTE ST 2084, normalized to 10000 nits | [0, 1] |
//! | [`hlg`] | ARIB STD-B67 / BT.2100 HLG | [0, 1] |
//!
//! ```rust
//! use lutlab_transfer::srgb;
//!
//! let signal = srgb::encode(0.18);
//! assert!((srgb::decode(signal) - 0.18).abs() < 1e-6);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod aces;
pub mod cineon;
pub mod gamma;
pub mod hlg;
pub mod log_c;
pub mod pq;
pub mod rec709;
pub mod s_log3;
pub mod srgb;
pub mod v_log;
