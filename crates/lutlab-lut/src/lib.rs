//! # lutlab-lut
//!
//! LUT conversion engine: one in-memory model for 1D, 2D and 3D lookup
//! tables, readers and writers for the common interchange formats, and the
//! transforms in between.
//!
//! # Model
//!
//! - [`Lut`] - validated samples, per-channel input [`Domain`]s,
//!   a [`Precision`] and free-form metadata
//! - [`Dimensionality`] - `1D` (one curve), `2D` (three curves) or `3D`
//!   (an RGB lattice)
//!
//! # Formats
//!
//! [`LutFormat`] is the closed set of supported formats; each variant
//! implements [`FormatHandler`]. [`FormatRegistry`] resolves tags and
//! extensions. See the [`formats`] module for the byte layouts.
//!
//! # Transforms
//!
//! - [`resample`] - resize and reshape, trilinear or tetrahedral for 3D
//! - [`invert`] - monotonic inverse of a 1D/2D LUT
//! - [`smooth`] - monotone cubic smoothing of a 1D/2D LUT
//! - [`chain`] - several LUTs baked into one
//! - [`sample`] / [`sample_directed`] - a named transfer curve as a 1D LUT
//! - [`convert`] / [`convert_many`] - file(s) to file, the whole pipeline
//!
//! # Usage
//!
//! ```rust
//! use lutlab_lut::{resample, Dimensionality, FormatHandler, Lut, LutFormat, ResampleOptions, WriteOptions};
//!
//! let lut = Lut::identity(Dimensionality::ThreeD, 17).unwrap();
//! let small = resample(&lut, 9, None, &ResampleOptions::default()).unwrap();
//! let bytes = LutFormat::Cube.write(&small, &WriteOptions::default()).unwrap();
//! let back = LutFormat::Cube.read(&bytes).unwrap();
//! assert_eq!(back.size(), 9);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod chain;
mod convert;
mod curve;
mod error;
pub mod formats;
mod interp;
mod lut;
mod precision;
mod preset;
mod registry;
mod resample;

pub use chain::chain;
pub use convert::{
    ConvertOptions, ConvertReport, DEFAULT_CURVE_SIZE, convert, convert_many, prepare, read_lut,
    resolve_output, sample_curve_to_file, write_lut,
};
pub use curve::{Curve, CurveRegistry, Direction, Transfer, sample, sample_directed};
pub use error::{Location, LutError, LutResult};
pub use formats::{FormatHandler, LutFormat, WriteOptions};
pub use interp::{Interpolation, sample_curve, sample_lattice};
pub use lut::{Dimensionality, Domain, Lut, Samples, TITLE_KEY};
pub use precision::{FLOAT_DECIMALS, Precision};
pub use preset::{ExportPreset, PRESETS_ENV};
pub use registry::FormatRegistry;
pub use resample::{ResampleOptions, invert, reshape, resample, smooth};
