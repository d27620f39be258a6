//! Adobe / Resolve `.cube`.
//!
//! # Format
//!
//! ```text
//! TITLE "Film look"
//! # author: grading
//! LUT_3D_SIZE 2
//! DOMAIN_MIN 0.0 0.0 0.0
//! DOMAIN_MAX 1.0 1.0 1.0
//! 0.000000 0.000000 0.000000
//! 1.000000 0.000000 0.000000
//! 0.000000 1.000000 0.000000
//! ...
//! ```
//!
//! - `LUT_1D_SIZE n` gives `n` rows of `r g b` (a 2D LUT here);
//!   `LUT_3D_SIZE n` gives `n^3` rows, red varying fastest.
//! - `DOMAIN_MIN`/`DOMAIN_MAX` are optional and per channel. Resolve's
//!   `LUT_1D_INPUT_RANGE`/`LUT_3D_INPUT_RANGE min max` are read as a
//!   uniform domain.
//! - `TITLE` maps to the `title` metadata key; other keys round-trip as
//!   `# key: value` comments.
//! - A file with both a 1D and a 3D size (Resolve shaper + cube) is rejected.

use super::text::{self, Line};
use crate::lut::{Dimensionality, Domain, Lut, TITLE_KEY};
use crate::{LutError, LutResult, Precision};
use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, trace};

fn is_keyword(token: &str) -> bool {
    token.starts_with(|c: char| c.is_ascii_uppercase())
        && token.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn parse_size(rest: &str, line: Line<'_>) -> LutResult<usize> {
    let size = text::parse_usize(rest.trim(), line.number, "LUT size")?;
    if size < 2 {
        return Err(LutError::at_line(line.number, format!("LUT size must be at least 2, got {size}")));
    }
    Ok(size)
}

fn parse_title(rest: &str) -> String {
    let rest = rest.trim();
    rest.strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .unwrap_or(rest)
        .to_string()
}

/// Parses a `.cube` file.
pub fn parse(bytes: &[u8]) -> LutResult<Lut> {
    let text = text::decode(bytes)?;
    let mut metadata = BTreeMap::new();
    let mut size_1d: Option<usize> = None;
    let mut size_3d: Option<usize> = None;
    let mut domain_min = [0.0_f32; 3];
    let mut domain_max = [1.0_f32; 3];
    let mut domain_line = 0;
    let mut data: Vec<[f32; 3]> = Vec::new();

    for line in text::lines(text) {
        if let Some(comment) = line.text.strip_prefix('#') {
            text::push_metadata(&mut metadata, comment);
            continue;
        }
        let (keyword, rest) = line
            .text
            .split_once(char::is_whitespace)
            .unwrap_or((line.text, ""));
        match keyword {
            "TITLE" => {
                metadata.insert(TITLE_KEY.to_string(), parse_title(rest));
            }
            "LUT_1D_SIZE" => size_1d = Some(parse_size(rest, line)?),
            "LUT_3D_SIZE" => size_3d = Some(parse_size(rest, line)?),
            "DOMAIN_MIN" => {
                domain_min = text::parse_floats::<3>(rest, line.number)?;
                domain_line = line.number;
            }
            "DOMAIN_MAX" => {
                domain_max = text::parse_floats::<3>(rest, line.number)?;
                domain_line = line.number;
            }
            "LUT_1D_INPUT_RANGE" | "LUT_3D_INPUT_RANGE" => {
                let [lo, hi] = text::parse_floats::<2>(rest, line.number)?;
                domain_min = [lo; 3];
                domain_max = [hi; 3];
                domain_line = line.number;
            }
            k if is_keyword(k) => debug!(keyword = k, line = line.number, "ignoring cube keyword"),
            _ => data.push(text::parse_floats::<3>(line.text, line.number)?),
        }
    }

    let mut domains = [Domain::UNIT; 3];
    for (c, d) in domains.iter_mut().enumerate() {
        *d = Domain::new(domain_min[c], domain_max[c])
            .map_err(|e| LutError::at_line(domain_line, e.to_string()))?;
    }

    let lut = match (size_1d, size_3d) {
        (Some(_), Some(_)) => {
            return Err(LutError::at_end(
                "files with both LUT_1D_SIZE and LUT_3D_SIZE are not supported",
            ));
        }
        (None, None) => return Err(LutError::at_end("missing LUT_1D_SIZE or LUT_3D_SIZE")),
        (Some(n), None) => {
            expect_entries(data.len(), n)?;
            let channel = |c: usize| data.iter().map(|rgb| rgb[c]).collect::<Vec<_>>();
            Lut::two_d([channel(0), channel(1), channel(2)], domains)?
        }
        (None, Some(n)) => {
            expect_entries(data.len(), n.saturating_pow(3))?;
            Lut::three_d(n, data, domains)?
        }
    };
    trace!(dim = %lut.dimensionality(), size = lut.size(), "parsed cube");
    Ok(lut.with_metadata(metadata).with_precision(Precision::Float))
}

fn expect_entries(found: usize, expected: usize) -> LutResult<()> {
    if found == expected {
        Ok(())
    } else {
        Err(LutError::at_end(format!("expected {expected} entries, found {found}")))
    }
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

/// Writes a 2D or 3D LUT as `.cube`.
pub fn write_to<W: Write>(w: &mut W, lut: &Lut, precision: Precision) -> LutResult<()> {
    if let Some(title) = lut.title() {
        writeln!(w, "TITLE \"{}\"", title.replace(['"', '\n'], " "))?;
    }
    text::write_metadata(w, lut, "# ", &[TITLE_KEY])?;

    match lut.dimensionality() {
        Dimensionality::TwoD => writeln!(w, "LUT_1D_SIZE {}", lut.size())?,
        Dimensionality::ThreeD => writeln!(w, "LUT_3D_SIZE {}", lut.size())?,
        Dimensionality::OneD => {
            return Err(LutError::IncompatibleConversion(
                "cube stores three channels; promote 1D LUTs to 2D first".into(),
            ));
        }
    }

    if !lut.has_unit_domain() {
        let d = lut.domains();
        let fmt = text::format_bound;
        writeln!(w, "DOMAIN_MIN {} {} {}", fmt(d[0].min), fmt(d[1].min), fmt(d[2].min))?;
        writeln!(w, "DOMAIN_MAX {} {} {}", fmt(d[0].max), fmt(d[1].max), fmt(d[2].max))?;
    }

    if let Some(curves) = lut.curves() {
        for i in 0..lut.size() {
            write_row(w, [curves[0][i], curves[1][i], curves[2][i]], precision)?;
        }
    } else if let Some(lattice) = lut.lattice() {
        for &rgb in lattice {
            write_row(w, rgb, precision)?;
        }
    }
    Ok(())
}
