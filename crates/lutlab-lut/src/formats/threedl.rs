//! Autodesk Lustre / Flame `.3dl`.
//!
//! # Format
//!
//! ```text
//! # title: Film look
//! 3DMESH
//! Mesh 4 12
//! 0 64 128 192 256 320 384 448 512 575 639 703 767 831 895 959 1023
//! 0 0 0
//! 0 0 273
//! ...
//! ```
//!
//! - The optional `Mesh <log2(n - 1)> <bits>` header gives the output depth.
//!   It only exists for sizes `2^k + 1`; other sizes carry the depth in a
//!   `# bitdepth: <bits>` comment. With neither, the depth is inferred from
//!   the largest code (10, 12 or 16).
//! - The shaper line lists `n` 10-bit input codes and fixes the lattice size.
//! - Data rows are integer `r g b` codes with red as the outer loop and
//!   blue varying fastest.
//! - `#` comments carry metadata.

use super::text;
use crate::lut::{Dimensionality, Domain, Lut};
use crate::{LutError, LutResult, Precision};
use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, trace};

/// Input depth of the shaper line.
const SHAPER_MAX: f64 = 1023.0;

struct Row {
    line: usize,
    codes: Vec<u32>,
}

fn infer_depth(max_code: u32) -> u8 {
    match max_code {
        0..=1023 => 10,
        1024..=4095 => 12,
        _ => 16,
    }
}

fn parse_depth(value: &str, line: usize) -> LutResult<u8> {
    value
        .parse::<u8>()
        .ok()
        .filter(|b| (8..=16).contains(b))
        .ok_or_else(|| LutError::at_line(line, format!("unsupported output depth {value}")))
}

fn cube_root(n: usize) -> Option<usize> {
    let root = (n as f64).cbrt().round() as usize;
    (root.checked_pow(3) == Some(n)).then_some(root)
}

/// Parses a `.3dl` file.
pub fn parse(bytes: &[u8]) -> LutResult<Lut> {
    let text = text::decode(bytes)?;
    let mut metadata = BTreeMap::new();
    let mut mesh: Option<(u32, u8)> = None;
    let mut comment_bits: Option<u8> = None;
    let mut rows: Vec<Row> = Vec::new();

    for line in text::lines(text) {
        if let Some(comment) = line.text.strip_prefix('#') {
            match text::split_metadata(comment) {
                ("bitdepth", value) => comment_bits = Some(parse_depth(value, line.number)?),
                _ => text::push_metadata(&mut metadata, comment),
            }
            continue;
        }
        let mut tokens = line.text.split_whitespace();
        match tokens.next() {
            Some("3DMESH") => continue,
            Some("Mesh") => {
                let rest: Vec<&str> = tokens.collect();
                let [input, output] = text::parse_codes::<2>(&rest.join(" "), line.number)?;
                let bits = parse_depth(&output.to_string(), line.number)?;
                if input > 16 {
                    return Err(LutError::at_line(line.number, format!("mesh level {input} out of range")));
                }
                mesh = Some((input, bits));
            }
            _ => {
                let codes = line
                    .text
                    .split_whitespace()
                    .map(|tok| {
                        tok.parse::<u32>()
                            .map_err(|_| LutError::at_line(line.number, format!("invalid integer '{tok}'")))
                    })
                    .collect::<LutResult<Vec<_>>>()?;
                rows.push(Row { line: line.number, codes });
            }
        }
    }

    // The shaper is the first numeric row, unless every row is a data row.
    let has_shaper = match (mesh, rows.first()) {
        (_, None) => return Err(LutError::at_end("no data")),
        (_, Some(first)) if first.codes.len() != 3 => true,
        (Some((level, _)), _) => (1usize << level) + 1 == 3,
        (None, _) => cube_root(rows.len()).is_none() && cube_root(rows.len() - 1) == Some(3),
    };
    let (size, data) = if has_shaper {
        let shaper = &rows[0];
        let size = shaper.codes.len();
        let uniform = shaper.codes.iter().enumerate().all(|(i, &c)| {
            let expected = i as f64 * SHAPER_MAX / (size - 1).max(1) as f64;
            (c as f64 - expected).abs() <= 1.0
        });
        if !uniform {
            debug!(line = shaper.line, "non-uniform shaper treated as uniform");
        }
        (size, &rows[1..])
    } else {
        let size = cube_root(rows.len())
            .ok_or_else(|| LutError::at_end(format!("{} rows do not form a cube", rows.len())))?;
        (size, &rows[..])
    };
    if let Some((level, _)) = mesh {
        let expected = (1usize << level) + 1;
        if expected != size {
            return Err(LutError::at_line(rows[0].line, format!("Mesh header implies size {expected}, shaper has {size}")));
        }
    }
    if size < 2 {
        return Err(LutError::at_line(rows[0].line, "lattice size must be at least 2"));
    }
    let total = size.saturating_pow(3);
    if data.len() != total {
        return Err(LutError::at_end(format!("expected {total} entries, found {}", data.len())));
    }
    if let Some(row) = data.iter().find(|r| r.codes.len() != 3) {
        return Err(LutError::at_line(row.line, "expected 3 integers"));
    }

    let max_code = data.iter().flat_map(|r| r.codes.iter().copied()).max().unwrap_or(0);
    let bits = mesh
        .map(|(_, bits)| bits)
        .or(comment_bits)
        .unwrap_or_else(|| infer_depth(max_code));
    let precision = Precision::int(bits)?;
    let max = precision.max_code().unwrap_or(u32::MAX);
    if let Some(row) = data.iter().find(|r| r.codes.iter().any(|&c| c > max)) {
        return Err(LutError::at_line(row.line, format!("code exceeds {bits}-bit range")));
    }

    let mut lattice = vec![[0.0_f32; 3]; total];
    for (i, row) in data.iter().enumerate() {
        let (r, g, b) = (i / (size * size), (i / size) % size, i % size);
        lattice[r + size * (g + size * b)] = [
            precision.from_code(row.codes[0]),
            precision.from_code(row.codes[1]),
            precision.from_code(row.codes[2]),
        ];
    }
    trace!(size, bits, "parsed 3dl");
    Ok(Lut::three_d(size, lattice, [Domain::UNIT; 3])?
        .with_precision(precision)
        .with_metadata(metadata))
}

/// Writes a 3D LUT as `.3dl` with integer codes at `precision`.
pub fn write_to<W: Write>(w: &mut W, lut: &Lut, precision: Precision) -> LutResult<()> {
    if lut.dimensionality() != Dimensionality::ThreeD {
        return Err(LutError::IncompatibleConversion("3dl stores 3D LUTs only".into()));
    }
    let Precision::Int(bits) = precision else {
        return Err(LutError::IncompatibleConversion("3dl stores integer codes only".into()));
    };
    text::require_unit_domain(lut, "3dl")?;
    let lattice = lut
        .lattice()
        .ok_or_else(|| LutError::InvalidLut("3D LUT without lattice".into()))?;
    let n = lut.size();

    text::write_metadata(w, lut, "# ", &["bitdepth"])?;
    if (n - 1).is_power_of_two() {
        writeln!(w, "3DMESH")?;
        writeln!(w, "Mesh {} {bits}", (n - 1).trailing_zeros())?;
    } else {
        writeln!(w, "# bitdepth: {bits}")?;
    }
    let shaper: Vec<String> = (0..n)
        .map(|i| ((i as f64 * SHAPER_MAX / (n - 1) as f64).round_ties_even() as u32).to_string())
        .collect();
    writeln!(w, "{}", shaper.join(" "))?;

    let ordered = (0..n).flat_map(|r| {
        (0..n).flat_map(move |g| (0..n).map(move |b| &lattice[r + n * (g + n * b)]))
    });
    let codes = text::to_codes(ordered.flat_map(|rgb| rgb.iter()), precision, "3dl");
    for rgb in codes.chunks_exact(3) {
        writeln!(w, "{} {} {}", rgb[0], rgb[1], rgb[2])?;
    }
    Ok(())
}
