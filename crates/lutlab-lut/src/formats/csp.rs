//! Rising Sun Research CineSpace `.csp`.
//!
//! # Format
//!
//! ```text
//! CSPLUTV100
//! 3D
//!
//! BEGIN METADATA
//! title: Film look
//! END METADATA
//!
//! 2
//! 0.000000 1.000000
//! 0.000000 1.000000
//! 2
//! 0.000000 1.000000
//! 0.000000 1.000000
//! 2
//! 0.000000 1.000000
//! 0.000000 1.000000
//!
//! 2 2 2
//! 0.000000 0.000000 0.000000
//! ...
//! ```
//!
//! Three per-channel preluts (point count, input row, output row) come
//! before the data. A linear prelut maps to the channel's input domain;
//! nonlinear preluts are rejected. `1D` files follow the preluts with a
//! length line and `r g b` rows; `3D` files with `n n n` and `n^3` rows,
//! red varying fastest.

use super::text::{self, Line};
use crate::lut::{Dimensionality, Domain, Lut};
use crate::{LutError, LutResult, Precision};
use std::collections::BTreeMap;
use std::io::Write;
use tracing::trace;

const MAGIC: &str = "CSPLUTV100";

/// Relative slack for treating a multi-point prelut as linear.
const LINEAR_TOLERANCE: f32 = 1e-4;

struct Cursor<'a> {
    lines: std::vec::IntoIter<Line<'a>>,
}

impl<'a> Cursor<'a> {
    fn next(&mut self, what: &str) -> LutResult<Line<'a>> {
        self.lines
            .next()
            .ok_or_else(|| LutError::at_end(format!("missing {what}")))
    }
}

fn parse_list(line: Line<'_>, expected: usize) -> LutResult<Vec<f32>> {
    let values = line
        .text
        .split_whitespace()
        .map(|tok| text::parse_f32(tok, line.number))
        .collect::<LutResult<Vec<_>>>()?;
    if values.len() != expected {
        return Err(LutError::at_line(
            line.number,
            format!("expected {expected} prelut values, found {}", values.len()),
        ));
    }
    Ok(values)
}

/// Input domain described by a prelut, if the prelut is linear.
fn prelut_domain(inputs: &[f32], outputs: &[f32], line: usize) -> LutResult<Domain> {
    let (Some(&in_first), Some(&in_last)) = (inputs.first(), inputs.last()) else {
        return Err(LutError::at_line(line, "empty prelut"));
    };
    let (out_first, out_last) = (outputs[0], outputs[outputs.len() - 1]);
    if in_last <= in_first || out_last <= out_first {
        return Err(LutError::at_line(line, "prelut must be increasing"));
    }
    let slope = (out_last - out_first) / (in_last - in_first);
    let nonlinear = inputs.iter().zip(outputs).any(|(&x, &y)| {
        let expected = out_first + (x - in_first) * slope;
        (y - expected).abs() > LINEAR_TOLERANCE * (1.0 + expected.abs())
    });
    if nonlinear {
        return Err(LutError::at_line(line, "nonlinear preluts are not supported"));
    }
    // Input values that the prelut sends to 0 and 1.
    let (min, max) = if (out_first, out_last) == (0.0, 1.0) {
        (in_first, in_last)
    } else {
        (in_first - out_first / slope, in_first + (1.0 - out_first) / slope)
    };
    Domain::new(min, max).map_err(|e| LutError::at_line(line, e.to_string()))
}

/// Parses a `.csp` file.
pub fn parse(bytes: &[u8]) -> LutResult<Lut> {
    let text = text::decode(bytes)?;
    let mut cursor = Cursor { lines: text::lines(text).collect::<Vec<_>>().into_iter() };

    let magic = cursor.next("header")?;
    if magic.text != MAGIC {
        return Err(LutError::at_line(magic.number, format!("expected {MAGIC}")));
    }
    let kind = cursor.next("LUT type")?;
    let dimensionality = match kind.text {
        "1D" => Dimensionality::TwoD,
        "3D" => Dimensionality::ThreeD,
        other => return Err(LutError::at_line(kind.number, format!("unknown LUT type '{other}'"))),
    };

    let mut metadata = BTreeMap::new();
    let mut line = cursor.next("prelut")?;
    if line.text == "BEGIN METADATA" {
        loop {
            let entry = cursor.next("END METADATA")?;
            if entry.text == "END METADATA" {
                break;
            }
            text::push_metadata(&mut metadata, entry.text);
        }
        line = cursor.next("prelut")?;
    }

    let mut domains = [Domain::UNIT; 3];
    for (c, domain) in domains.iter_mut().enumerate() {
        if c > 0 {
            line = cursor.next("prelut")?;
        }
        let count = text::parse_usize(line.text, line.number, "prelut size")?;
        if count < 2 {
            return Err(LutError::at_line(line.number, "prelut needs at least 2 points"));
        }
        let inputs = parse_list(cursor.next("prelut inputs")?, count)?;
        let outputs_line = cursor.next("prelut outputs")?;
        let outputs = parse_list(outputs_line, count)?;
        *domain = prelut_domain(&inputs, &outputs, outputs_line.number)?;
    }

    let size_line = cursor.next("LUT size")?;
    let (size, expected) = match dimensionality {
        Dimensionality::ThreeD => {
            let [r, g, b] = text::parse_codes::<3>(size_line.text, size_line.number)?;
            if r != g || g != b {
                return Err(LutError::at_line(size_line.number, format!("non-cubic lattice {r}x{g}x{b}")));
            }
            (r as usize, (r as usize).saturating_pow(3))
        }
        _ => {
            let n = text::parse_usize(size_line.text, size_line.number, "LUT size")?;
            (n, n)
        }
    };

    let rows = cursor
        .lines
        .by_ref()
        .map(|l| text::parse_floats::<3>(l.text, l.number))
        .collect::<LutResult<Vec<_>>>()?;
    if rows.len() != expected {
        return Err(LutError::at_end(format!("expected {expected} entries, found {}", rows.len())));
    }

    let lut = match dimensionality {
        Dimensionality::ThreeD => Lut::three_d(size, rows, domains)?,
        _ => {
            let channel = |c: usize| rows.iter().map(|rgb| rgb[c]).collect::<Vec<_>>();
            Lut::two_d([channel(0), channel(1), channel(2)], domains)?
        }
    };
    trace!(dim = %lut.dimensionality(), size, "parsed csp");
    Ok(lut.with_metadata(metadata))
}

fn write_row<W: Write>(w: &mut W, rgb: [f32; 3], precision: Precision) -> LutResult<()> {
    writeln!(
        w,
        "{} {} {}",
        precision.format_value(rgb[0]),
        precision.format_value(rgb[1]),
        precision.format_value(rgb[2])
    )?;
    Ok(())
}

/// Writes a 2D or 3D LUT as `.csp`.
pub fn write_to<W: Write>(w: &mut W, lut: &Lut, precision: Precision) -> LutResult<()> {
    let kind = match lut.dimensionality() {
        Dimensionality::TwoD => "1D",
        Dimensionality::ThreeD => "3D",
        Dimensionality::OneD => {
            return Err(LutError::IncompatibleConversion(
                "csp stores three channels; promote 1D LUTs to 2D first".into(),
            ));
        }
    };
    writeln!(w, "{MAGIC}")?;
    writeln!(w, "{kind}")?;
    writeln!(w)?;
    if !lut.metadata().is_empty() {
        writeln!(w, "BEGIN METADATA")?;
        text::write_metadata(w, lut, "", &[])?;
        writeln!(w, "END METADATA")?;
        writeln!(w)?;
    }
    for domain in lut.domains() {
        writeln!(w, "2")?;
        writeln!(
            w,
            "{} {}",
            text::format_bound(domain.min),
            text::format_bound(domain.max)
        )?;
        writeln!(w, "0.0 1.0")?;
    }
    writeln!(w)?;

    let n = lut.size();
    if let Some(curves) = lut.curves() {
        writeln!(w, "{n}")?;
        for i in 0..n {
            write_row(w, [curves[0][i], curves[1][i], curves[2][i]], precision)?;
        }
    } else if let Some(lattice) = lut.lattice() {
        writeln!(w, "{n} {n} {n}")?;
        for &rgb in lattice {
            write_row(w, rgb, precision)?;
        }
    }
    Ok(())
}
