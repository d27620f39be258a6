//! Autodesk Discreet `.1dl`.
//!
//! # Format
//!
//! ```text
//! LUT: 3 1024 12
//! 0
//! 4
//! ...
//! ```
//!
//! The header gives the table count (1, 3 or 4), the length (a power of
//! two up to 65536, which also fixes the input depth) and an optional
//! output depth: `8`, `10`, `12`, `16`, `16f` or `32f`. Without a depth,
//! output codes use the input depth.
//!
//! Tables follow one after another, one value per line. Rows holding one
//! value per table are also accepted. A fourth (alpha) table is dropped.

use super::text;
use crate::lut::{Dimensionality, Domain, Lut};
use crate::{LutError, LutResult, Precision};
use std::io::Write;
use tracing::{trace, warn};

const MAX_LENGTH: usize = 65536;

fn parse_depth(token: &str, line: usize) -> LutResult<Precision> {
    match token {
        "16f" => Ok(Precision::Half),
        "32f" => Ok(Precision::Float),
        "8" | "10" | "12" | "16" => {
            let bits = token.parse::<u8>().map_err(|e| LutError::at_line(line, e.to_string()))?;
            Precision::int(bits)
        }
        other => Err(LutError::at_line(line, format!("unsupported output depth '{other}'"))),
    }
}

fn depth_token(precision: Precision) -> String {
    match precision {
        Precision::Half => "16f".into(),
        Precision::Float => "32f".into(),
        Precision::Int(bits) => bits.to_string(),
    }
}

/// Parses a `.1dl` file.
pub fn parse(bytes: &[u8]) -> LutResult<Lut> {
    let text = text::decode(bytes)?;
    let mut lines = text::lines(text).filter(|l| !l.text.starts_with('#'));

    let header = lines.next().ok_or_else(|| LutError::at_end("missing LUT: header"))?;
    let fields = header
        .text
        .strip_prefix("LUT:")
        .ok_or_else(|| LutError::at_line(header.number, "expected 'LUT:' header"))?;
    let fields: Vec<&str> = fields.split_whitespace().collect();
    if fields.len() < 2 || fields.len() > 3 {
        return Err(LutError::at_line(header.number, "expected 'LUT: tables length [depth]'"));
    }
    let tables = text::parse_usize(fields[0], header.number, "table count")?;
    if !matches!(tables, 1 | 3 | 4) {
        return Err(LutError::at_line(header.number, format!("unsupported table count {tables}")));
    }
    let length = text::parse_usize(fields[1], header.number, "length")?;
    if length < 2 || length > MAX_LENGTH || !length.is_power_of_two() {
        return Err(LutError::at_line(header.number, format!("length {length} is not a power of two in 2..=65536")));
    }
    let precision = match fields.get(2) {
        Some(token) => parse_depth(token, header.number)?,
        None => Precision::int(length.trailing_zeros() as u8)?,
    };

    let mut values: Vec<f32> = Vec::with_capacity(tables * length);
    let mut interleaved = None;
    for line in lines {
        let tokens: Vec<&str> = line.text.split_whitespace().collect();
        let row_is_interleaved = tokens.len() > 1;
        if *interleaved.get_or_insert(row_is_interleaved) != row_is_interleaved
            || (row_is_interleaved && tokens.len() != tables)
        {
            return Err(LutError::at_line(line.number, format!("expected {} values", if row_is_interleaved { tables } else { 1 })));
        }
        for tok in tokens {
            let v = match precision {
                Precision::Int(_) => {
                    let code = tok
                        .parse::<u32>()
                        .map_err(|_| LutError::at_line(line.number, format!("invalid integer '{tok}'")))?;
                    if Some(code) > precision.max_code() {
                        return Err(LutError::at_line(line.number, format!("code {code} exceeds {precision}-bit range")));
                    }
                    precision.from_code(code)
                }
                _ => text::parse_f32(tok, line.number)?,
            };
            values.push(v);
        }
    }
    if values.len() != tables * length {
        return Err(LutError::at_end(format!("expected {} entries, found {}", tables * length, values.len())));
    }

    let channel = |t: usize| -> Vec<f32> {
        if interleaved == Some(true) {
            values.iter().skip(t).step_by(tables).copied().collect()
        } else {
            values[t * length..(t + 1) * length].to_vec()
        }
    };
    if tables == 4 {
        warn!("dropping alpha table from 1dl");
    }
    let lut = if tables == 1 {
        Lut::one_d(channel(0), Domain::UNIT)?
    } else {
        Lut::two_d([channel(0), channel(1), channel(2)], [Domain::UNIT; 3])?
    };
    trace!(tables, length, %precision, "parsed 1dl");
    Ok(lut.with_precision(precision))
}

/// Writes a 1D or 2D LUT as `.1dl`.
pub fn write_to<W: Write>(w: &mut W, lut: &Lut, precision: Precision) -> LutResult<()> {
    let curves = lut
        .curves()
        .ok_or_else(|| LutError::IncompatibleConversion("1dl stores curves only".into()))?;
    let length = lut.size();
    if length > MAX_LENGTH || !length.is_power_of_two() {
        return Err(LutError::IncompatibleConversion(format!(
            "1dl needs a power-of-two length up to {MAX_LENGTH}, got {length}"
        )));
    }
    text::require_unit_domain(lut, "1dl")?;
    text::drop_metadata(lut, "1dl");

    writeln!(w, "LUT: {} {length} {}", curves.len(), depth_token(precision))?;
    for curve in curves {
        if precision.is_int() {
            for code in text::to_codes(curve.iter(), precision, "1dl") {
                writeln!(w, "{code}")?;
            }
        } else {
            for &v in curve {
                writeln!(w, "{}", precision.format_value(v))?;
            }
        }
    }
    Ok(())
}
