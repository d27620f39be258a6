//! Text export of 3x3 matrices.
//!
//! ```text
//! matrix:   0.4123907993 0.3575843394 0.1804807884     (3 rows of 3)
//! simple:   0.4123907993 0.3575843394 ... 0.9505321522 (9 values, one line)
//! spimtx:   0.4123907993 0.3575843394 0.1804807884 0   (3 rows of 4, OCIO)
//! ```

use lutlab_math::Mat3;
use std::fmt::Write;

/// Output layout for a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixFormat {
    /// Three rows of three values.
    #[default]
    Matrix,
    /// All nine values on one line, row-major.
    Simple,
    /// OpenColorIO `.spimtx`: three rows of four, the fourth column being a
    /// zero offset.
    Spimtx,
}

/// Renders `m` in the given layout, 10 decimals per value, `\n` terminated.
pub fn format_matrix(m: &Mat3, format: MatrixFormat) -> String {
    let mut out = String::new();
    match format {
        MatrixFormat::Matrix => {
            for row in &m.m {
                let _ = writeln!(out, "{:.10} {:.10} {:.10}", row[0], row[1], row[2]);
            }
        }
        MatrixFormat::Simple => {
            let values: Vec<String> = m.m.iter().flatten().map(|v| format!("{v:.10}")).collect();
            let _ = writeln!(out, "{}", values.join(" "));
        }
        MatrixFormat::Spimtx => {
            for row in &m.m {
                let _ = writeln!(out, "{:.10} {:.10} {:.10} 0", row[0], row[1], row[2]);
            }
        }
    }
    out
}
