//! LUT error types.

use std::fmt;
use thiserror::Error;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Where in an input file a parse error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// 1-based line number in a text format.
    Line(usize),
    /// Byte offset from the start of the input.
    Offset(usize),
    /// The input ended before the format was complete.
    EndOfInput,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(n) => write!(f, "line {n}"),
            Self::Offset(n) => write!(f, "byte {n}"),
            Self::EndOfInput => f.write_str("end of input"),
        }
    }
}

/// Errors that can occur during LUT operations.
#[derive(Debug, Error)]
pub enum LutError {
    /// No registered format matches a tag or extension.
    #[error("unsupported LUT format: {0}")]
    UnsupportedFormat(String),

    /// Malformed input file.
    #[error("parse error at {location}: {message}")]
    Parse {
        /// Offending position
        location: Location,
        /// What was wrong
        message: String,
    },

    /// No defined conversion between the source and the target shape,
    /// or the target format cannot represent the entity.
    #[error("incompatible conversion: {0}")]
    IncompatibleConversion(String),

    /// Curve name not present in the curve registry.
    #[error("unknown curve: {0}")]
    UnknownCurve(String),

    /// A curve or LUT channel is not monotonic where it must be.
    #[error("non-monotonic curve: {0}")]
    NonMonotonicCurve(String),

    /// A LUT violates a structural invariant (size, finiteness, domain).
    #[error("invalid LUT: {0}")]
    InvalidLut(String),

    /// Malformed JSON configuration (export presets).
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LutError {
    /// Parse error at a 1-based line.
    pub fn at_line(line: usize, message: impl Into<String>) -> Self {
        Self::Parse { location: Location::Line(line), message: message.into() }
    }

    /// Parse error for truncated input.
    pub fn at_end(message: impl Into<String>) -> Self {
        Self::Parse { location: Location::EndOfInput, message: message.into() }
    }

    /// True for filesystem failures, as opposed to data-dependent errors.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = LutError::at_line(12, "expected 3 values");
        assert_eq!(e.to_string(), "parse error at line 12: expected 3 values");
        let e = LutError::Parse { location: Location::Offset(7), message: "invalid UTF-8".into() };
        assert_eq!(e.to_string(), "parse error at byte 7: invalid UTF-8");
        assert!(!e.is_io());
    }
}
