//! # lutlab-primaries
//!
//! Colorspace primaries, white points, and RGB to XYZ matrix generation.
//!
//! A colorspace is described by the CIE xy chromaticities of its red,
//! green and blue primaries plus a white point ([`ColorspaceDescriptor`]).
//! [`build_matrix`] turns a descriptor into the RGB to XYZ matrix and its
//! inverse; [`rgb_to_rgb_matrix`] chains two of them, with optional
//! chromatic adaptation when the white points differ.
//!
//! Named colorspaces come from a [`ColorimetryProvider`]. The crate ships
//! [`BuiltinColorimetry`], a static table of the common camera, display
//! and ACES gamuts.
//!
//! # Usage
//!
//! ```rust
//! use lutlab_math::Vec3;
//! use lutlab_primaries::{build_matrix, BuiltinColorimetry, ColorimetryProvider};
//!
//! let srgb = BuiltinColorimetry.descriptor("sRGB").unwrap();
//! let pair = build_matrix(&srgb).unwrap();
//! let white = pair.rgb_to_xyz * Vec3::ONE;
//! assert!((white.y - 1.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod builtin;
mod descriptor;
mod error;
mod export;
mod matrix;

pub use builtin::*;
pub use descriptor::*;
pub use error::{PrimariesError, PrimariesResult};
pub use export::{MatrixFormat, format_matrix};
pub use matrix::*;
