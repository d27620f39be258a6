//! Matrix builder error types.

use thiserror::Error;

/// Result type for colorimetry operations.
pub type PrimariesResult<T> = Result<T, PrimariesError>;

/// Errors raised while resolving colorspaces or building matrices.
#[derive(Debug, Error)]
pub enum PrimariesError {
    /// Primaries are degenerate (co-linear or on the y = 0 line).
    #[error("singular matrix for colorspace '{name}': {reason}")]
    SingularMatrix {
        /// Colorspace name
        name: String,
        /// What made the system unsolvable
        reason: String,
    },

    /// The provider has no colorspace of that name.
    #[error("unknown colorspace: {0}")]
    UnknownColorspace(String),
}
