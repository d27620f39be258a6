//! Sony Pictures Imageworks `.spi1d` and `.spi3d`.
//!
//! # Format
//!
//! `.spi1d`:
//!
//! ```text
//! Version 1
//! From 0.0 1.0
//! Length 4
//! Components 1
//! {
//!   0.000000
//!   0.333333
//!   0.666667
//!   1.000000
//! }
//! ```
//!
//! `Components 3` rows carry `r g b`. `From` is a single range shared by
//! every channel.
//!
//! `.spi3d`:
//!
//! ```text
//! SPILUT 1.0
//! 3 3
//! 2 2 2
//! 0 0 0 0.000000 0.000000 0.000000
//! 0 0 1 0.000000 0.000000 1.000000
//! ...
//! ```
//!
//! Every row is `r g b` lattice indices followed by the output triple.
//! Rows may appear in any order; they are written with blue varying
//! fastest. Neither format has a metadata field.

use super::text;
use crate::lut::{Dimensionality, Domain, Lut};
use crate::{LutError, LutResult, Precision};
use std::io::Write;
use tracing::trace;

/// Parses a `.spi1d` file.
pub fn parse_1d(bytes: &[u8]) -> LutResult<Lut> {
    let text = text::decode(bytes)?;
    let mut domain = Domain::UNIT;
    let mut length: Option<usize> = None;
    let mut components: Option<usize> = None;
    let mut values: Vec<Vec<f32>> = Vec::new();
    let mut in_body = false;
    let mut closed = false;

    for line in text::lines(text) {
        if closed {
            return Err(LutError::at_line(line.number, "data after closing brace"));
        }
        if in_body {
            if line.text == "}" {
                closed = true;
                continue;
            }
            let n = components.unwrap_or(1);
            let row = match n {
                1 => text::parse_floats::<1>(line.text, line.number)?.to_vec(),
                _ => text::parse_floats::<3>(line.text, line.number)?.to_vec(),
            };
            values.push(row);
            continue;
        }
        let (keyword, rest) = line
            .text
            .split_once(char::is_whitespace)
            .unwrap_or((line.text, ""));
        match keyword {
            "Version" => {
                let version = text::parse_usize(rest.trim(), line.number, "version")?;
                if version != 1 {
                    return Err(LutError::at_line(line.number, format!("unsupported version {version}")));
                }
            }
            "From" => {
                let [min, max] = text::parse_floats::<2>(rest, line.number)?;
                domain = Domain::new(min, max).map_err(|e| LutError::at_line(line.number, e.to_string()))?;
            }
            "Length" => length = Some(text::parse_usize(rest.trim(), line.number, "length")?),
            "Components" => {
                let n = text::parse_usize(rest.trim(), line.number, "component count")?;
                if n != 1 && n != 3 {
                    return Err(LutError::at_line(line.number, format!("unsupported component count {n}")));
                }
                components = Some(n);
            }
            "{" => in_body = true,
            _ => return Err(LutError::at_line(line.number, format!("unexpected '{}'", line.text))),
        }
    }

    if !closed {
        return Err(LutError::at_end("missing closing brace"));
    }
    let length = length.ok_or_else(|| LutError::at_end("missing Length"))?;
    if values.len() != length {
        return Err(LutError::at_end(format!("expected {length} entries, found {}", values.len())));
    }

    let lut = match components.unwrap_or(1) {
        1 => Lut::one_d(values.into_iter().map(|row| row[0]).collect(), domain)?,
        _ => {
            let channel = |c: usize| values.iter().map(|row| row[c]).collect::<Vec<_>>();
            Lut::two_d([channel(0), channel(1), channel(2)], [domain; 3])?
        }
    };
    trace!(dim = %lut.dimensionality(), size = lut.size(), "parsed spi1d");
    Ok(lut)
}

/// Writes a 1D or 2D LUT as `.spi1d`.
pub fn write_1d_to<W: Write>(w: &mut W, lut: &Lut, precision: Precision) -> LutResult<()> {
    let domain = lut.uniform_domain().ok_or_else(|| {
        LutError::IncompatibleConversion("spi1d needs the same input domain on every channel".into())
    })?;
    let curves = lut
        .curves()
        .ok_or_else(|| LutError::IncompatibleConversion("spi1d stores curves only".into()))?;
    text::drop_metadata(lut, "spi1d");

    writeln!(w, "Version 1")?;
    writeln!(
        w,
        "From {} {}",
        text::format_bound(domain.min),
        text::format_bound(domain.max)
    )?;
    writeln!(w, "Length {}", lut.size())?;
    writeln!(w, "Components {}", curves.len())?;
    writeln!(w, "{{")?;
    for i in 0..lut.size() {
        let row: Vec<String> = curves.iter().map(|c| precision.format_value(c[i])).collect();
        writeln!(w, "  {}", row.join(" "))?;
    }
    writeln!(w, "}}")?;
    Ok(())
}

/// Parses a `.spi3d` file.
pub fn parse_3d(bytes: &[u8]) -> LutResult<Lut> {
    let text = text::decode(bytes)?;
    let mut lines = text::lines(text);

    let magic = lines.next().ok_or_else(|| LutError::at_end("empty file"))?;
    if !magic.text.starts_with("SPILUT") {
        return Err(LutError::at_line(magic.number, "missing SPILUT header"));
    }
    let channels = lines.next().ok_or_else(|| LutError::at_end("missing channel line"))?;
    if text::parse_codes::<2>(channels.text, channels.number)? != [3, 3] {
        return Err(LutError::at_line(channels.number, "only 3 to 3 channel LUTs are supported"));
    }
    let dims = lines.next().ok_or_else(|| LutError::at_end("missing lattice size"))?;
    let [nr, ng, nb] = text::parse_codes::<3>(dims.text, dims.number)?;
    if nr != ng || ng != nb {
        return Err(LutError::at_line(dims.number, format!("non-cubic lattice {nr}x{ng}x{nb}")));
    }
    let size = nr as usize;
    if size < 2 {
        return Err(LutError::at_line(dims.number, format!("lattice size must be at least 2, got {size}")));
    }

    let mut rows = Vec::new();
    for line in lines {
        let mut tokens = line.text.split_whitespace();
        let mut index = [0usize; 3];
        for slot in index.iter_mut() {
            let tok = tokens
                .next()
                .ok_or_else(|| LutError::at_line(line.number, "expected 6 values"))?;
            *slot = text::parse_usize(tok, line.number, "lattice index")?;
            if *slot >= size {
                return Err(LutError::at_line(line.number, format!("index {slot} outside lattice of size {size}")));
            }
        }
        let rest: Vec<&str> = tokens.collect();
        let rgb = text::parse_floats::<3>(&rest.join(" "), line.number)?;
        rows.push((line.number, index, rgb));
    }
    // The header size is only trusted once the rows account for it.
    let total = size.saturating_pow(3);
    if rows.len() != total {
        return Err(LutError::at_end(format!("expected {total} entries, found {}", rows.len())));
    }

    let mut lattice = vec![[0.0_f32; 3]; total];
    let mut filled = vec![false; total];
    for (line, [r, g, b], rgb) in rows {
        let at = r + size * (g + size * b);
        if filled[at] {
            return Err(LutError::at_line(line, "duplicate lattice entry"));
        }
        filled[at] = true;
        lattice[at] = rgb;
    }
    trace!(size, "parsed spi3d");
    Lut::three_d(size, lattice, [Domain::UNIT; 3])
}

/// Writes a 3D LUT as `.spi3d`.
pub fn write_3d_to<W: Write>(w: &mut W, lut: &Lut, precision: Precision) -> LutResult<()> {
    if lut.dimensionality() != Dimensionality::ThreeD {
        return Err(LutError::IncompatibleConversion("spi3d stores 3D LUTs only".into()));
    }
    text::require_unit_domain(lut, "spi3d")?;
    text::drop_metadata(lut, "spi3d");
    let lattice = lut
        .lattice()
        .ok_or_else(|| LutError::InvalidLut("3D LUT without lattice".into()))?;
    let n = lut.size();

    writeln!(w, "SPILUT 1.0")?;
    writeln!(w, "3 3")?;
    writeln!(w, "{n} {n} {n}")?;
    for r in 0..n {
        for g in 0..n {
            for b in 0..n {
                let rgb = lattice[lut.lattice_index(r, g, b)];
                writeln!(
                    w,
                    "{r} {g} {b} {} {} {}",
                    precision.format_value(rgb[0]),
                    precision.format_value(rgb[1]),
                    precision.format_value(rgb[2])
                )?;
            }
        }
    }
    Ok(())
}
