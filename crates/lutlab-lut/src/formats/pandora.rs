//! Pandora `.mga` / `.m3d`.
//!
//! # Format
//!
//! ```text
//! channel: 3d
//! in: 8
//! out: 4096
//! format: lut
//! values: red green blue
//! 0 0 0 0
//! 1 0 0 4095
//! ...
//! ```
//!
//! `in` is the entry count (a perfect cube), `out` the code range
//! (`2^bits`). Each row is an entry index followed by integer `r g b`
//! codes; index `i` addresses red `i / n^2`, green `(i / n) % n`,
//! blue `i % n`.

use super::text;
use crate::lut::{Dimensionality, Domain, Lut};
use crate::{LutError, LutResult, Precision};
use std::io::Write;
use tracing::trace;

/// Parses a Pandora file.
pub fn parse(bytes: &[u8]) -> LutResult<Lut> {
    let text = text::decode(bytes)?;
    let mut entries: Option<usize> = None;
    let mut precision: Option<Precision> = None;
    let mut seen_3d = false;
    let mut rows: Vec<(usize, usize, [u32; 3])> = Vec::new();

    for line in text::lines(text) {
        if line.text.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.text.split_once(':') {
            let value = value.trim();
            match key.trim() {
                "channel" => {
                    if value != "3d" {
                        return Err(LutError::at_line(line.number, format!("unsupported channel '{value}'")));
                    }
                    seen_3d = true;
                }
                "in" => entries = Some(text::parse_usize(value, line.number, "entry count")?),
                "out" => {
                    let range = text::parse_usize(value, line.number, "output range")?;
                    if range < 2 || !range.is_power_of_two() || range > 1 << 16 {
                        return Err(LutError::at_line(line.number, format!("output range {range} is not 2^bits")));
                    }
                    precision = Some(Precision::int(range.trailing_zeros() as u8)?);
                }
                "format" | "values" => {}
                other => trace!(key = other, line = line.number, "ignoring mga field"),
            }
            continue;
        }
        let [index, r, g, b] = text::parse_codes::<4>(line.text, line.number)?;
        rows.push((line.number, index as usize, [r, g, b]));
    }

    if !seen_3d {
        return Err(LutError::at_end("missing 'channel: 3d'"));
    }
    let entries = entries.ok_or_else(|| LutError::at_end("missing 'in:' field"))?;
    let precision = precision.ok_or_else(|| LutError::at_end("missing 'out:' field"))?;
    let size = (entries as f64).cbrt().round() as usize;
    if size < 2 || size.checked_pow(3) != Some(entries) {
        return Err(LutError::at_end(format!("entry count {entries} is not a cube of at least 2")));
    }
    if rows.len() != entries {
        return Err(LutError::at_end(format!("expected {entries} entries, found {}", rows.len())));
    }

    let max = precision.max_code().unwrap_or(u32::MAX);
    let mut lattice = vec![[0.0_f32; 3]; entries];
    let mut filled = vec![false; entries];
    for (line, index, codes) in rows {
        if index >= entries {
            return Err(LutError::at_line(line, format!("index {index} out of range")));
        }
        if codes.iter().any(|&c| c > max) {
            return Err(LutError::at_line(line, format!("code exceeds {precision}-bit range")));
        }
        let (r, g, b) = (index / (size * size), (index / size) % size, index % size);
        let at = r + size * (g + size * b);
        if filled[at] {
            return Err(LutError::at_line(line, format!("duplicate index {index}")));
        }
        filled[at] = true;
        lattice[at] = codes.map(|c| precision.from_code(c));
    }
    trace!(size, %precision, "parsed mga");
    Ok(Lut::three_d(size, lattice, [Domain::UNIT; 3])?.with_precision(precision))
}

/// Writes a 3D LUT as a Pandora file.
pub fn write_to<W: Write>(w: &mut W, lut: &Lut, precision: Precision) -> LutResult<()> {
    if lut.dimensionality() != Dimensionality::ThreeD {
        return Err(LutError::IncompatibleConversion("mga stores 3D LUTs only".into()));
    }
    let Some(max) = precision.max_code() else {
        return Err(LutError::IncompatibleConversion("mga stores integer codes only".into()));
    };
    text::require_unit_domain(lut, "mga")?;
    text::drop_metadata(lut, "mga");
    let lattice = lut
        .lattice()
        .ok_or_else(|| LutError::InvalidLut("3D LUT without lattice".into()))?;
    let n = lut.size();

    writeln!(w, "channel: 3d")?;
    writeln!(w, "in: {}", n * n * n)?;
    writeln!(w, "out: {}", max + 1)?;
    writeln!(w, "format: lut")?;
    writeln!(w, "values: red green blue")?;

    let ordered = (0..n).flat_map(|r| {
        (0..n).flat_map(move |g| (0..n).map(move |b| &lattice[r + n * (g + n * b)]))
    });
    let codes = text::to_codes(ordered.flat_map(|rgb| rgb.iter()), precision, "mga");
    for (i, rgb) in codes.chunks_exact(3).enumerate() {
        writeln!(w, "{i} {} {} {}", rgb[0], rgb[1], rgb[2])?;
    }
    Ok(())
}
