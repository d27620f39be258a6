//! Helpers shared by the text formats.

use crate::lut::Lut;
use crate::{Location, LutError, LutResult, Precision};
use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, warn};

/// A trimmed, non-empty input line with its 1-based number.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    pub number: usize,
    pub text: &'a str,
}

/// Validates UTF-8 and strips a byte-order mark.
pub(crate) fn decode(bytes: &[u8]) -> LutResult<&str> {
    let text = std::str::from_utf8(bytes).map_err(|e| LutError::Parse {
        location: Location::Offset(e.valid_up_to()),
        message: "input is not valid UTF-8 text".into(),
    })?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// Non-empty lines, trimmed.
pub(crate) fn lines(text: &str) -> impl Iterator<Item = Line<'_>> {
    text.lines()
        .enumerate()
        .map(|(i, l)| Line { number: i + 1, text: l.trim() })
        .filter(|l| !l.text.is_empty())
}

pub(crate) fn parse_f32(token: &str, line: usize) -> LutResult<f32> {
    match token.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(LutError::at_line(line, format!("non-finite value '{token}'"))),
        Err(_) => Err(LutError::at_line(line, format!("invalid number '{token}'"))),
    }
}

/// Shortest decimal form that reads back to the same `f32`.
///
/// Used for domain bounds, which are never quantized to the sample precision.
pub(crate) fn format_bound(v: f32) -> String {
    format!("{v}")
}

pub(crate) fn parse_usize(token: &str, line: usize, what: &str) -> LutResult<usize> {
    token
        .parse::<usize>()
        .map_err(|_| LutError::at_line(line, format!("invalid {what} '{token}'")))
}

/// Parses exactly `N` whitespace-separated floats.
pub(crate) fn parse_floats<const N: usize>(text: &str, line: usize) -> LutResult<[f32; N]> {
    let mut out = [0.0; N];
    let mut tokens = text.split_whitespace();
    for slot in out.iter_mut() {
        let tok = tokens
            .next()
            .ok_or_else(|| LutError::at_line(line, format!("expected {N} values")))?;
        *slot = parse_f32(tok, line)?;
    }
    if tokens.next().is_some() {
        return Err(LutError::at_line(line, format!("expected {N} values, found more")));
    }
    Ok(out)
}

/// Parses exactly `N` whitespace-separated unsigned integers.
pub(crate) fn parse_codes<const N: usize>(text: &str, line: usize) -> LutResult<[u32; N]> {
    let mut out = [0; N];
    let mut tokens = text.split_whitespace();
    for slot in out.iter_mut() {
        let tok = tokens
            .next()
            .ok_or_else(|| LutError::at_line(line, format!("expected {N} integers")))?;
        *slot = tok
            .parse()
            .map_err(|_| LutError::at_line(line, format!("invalid integer '{tok}'")))?;
    }
    if tokens.next().is_some() {
        return Err(LutError::at_line(line, format!("expected {N} integers, found more")));
    }
    Ok(out)
}

/// Fails unless every channel of `lut` uses `[0, 1]`.
pub(crate) fn require_unit_domain(lut: &Lut, tag: &str) -> LutResult<()> {
    if lut.has_unit_domain() {
        Ok(())
    } else {
        Err(LutError::IncompatibleConversion(format!(
            "{tag} has no input domain field; only [0, 1] domains can be written"
        )))
    }
}

/// Logs that a format has nowhere to put metadata.
pub(crate) fn drop_metadata(lut: &Lut, tag: &str) {
    if !lut.metadata().is_empty() {
        debug!(format = tag, keys = lut.metadata().len(), "format has no metadata field, dropping");
    }
}

fn is_key(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Splits `key: value` metadata text. Anything else is a free comment.
pub(crate) fn split_metadata(text: &str) -> (&str, &str) {
    match text.split_once(':') {
        Some((k, v)) if is_key(k.trim()) => (k.trim(), v.trim()),
        _ => ("comment", text.trim()),
    }
}

/// Adds one metadata line, joining repeated keys with newlines.
pub(crate) fn push_metadata(metadata: &mut BTreeMap<String, String>, text: &str) {
    let (key, value) = split_metadata(text);
    metadata
        .entry(key.to_string())
        .and_modify(|v| {
            v.push('\n');
            v.push_str(value);
        })
        .or_insert_with(|| value.to_string());
}

/// Writes metadata as `<prefix>key: value` lines, one per value line.
pub(crate) fn write_metadata<W: Write>(
    w: &mut W,
    lut: &Lut,
    prefix: &str,
    skip: &[&str],
) -> LutResult<()> {
    for (key, value) in lut.metadata() {
        if skip.contains(&key.as_str()) {
            continue;
        }
        for line in value.lines() {
            writeln!(w, "{prefix}{key}: {line}")?;
        }
    }
    Ok(())
}

/// Integer code for each value, warning once if anything was clamped.
pub(crate) fn to_codes<'a>(
    values: impl Iterator<Item = &'a f32>,
    precision: Precision,
    tag: &str,
) -> Vec<u32> {
    let mut clamped = 0usize;
    let codes = values
        .map(|&v| {
            let (code, was_clamped) = precision.to_code(v).unwrap_or((0, false));
            clamped += was_clamped as usize;
            code
        })
        .collect();
    if clamped > 0 {
        warn!(format = tag, count = clamped, "values outside [0, 1] clamped to integer range");
    }
    codes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_floats() {
        assert_eq!(parse_floats::<3>("0.1 0.2 0.3", 1).unwrap(), [0.1, 0.2, 0.3]);
        assert!(parse_floats::<3>("0.1 0.2", 4).is_err());
        assert!(parse_floats::<3>("0.1 0.2 0.3 0.4", 4).is_err());
        assert!(parse_floats::<1>("nan", 2).is_err());
    }

    #[test]
    fn test_decode_rejects_binary() {
        let err = decode(&[b'a', 0xff, b'b']).unwrap_err();
        assert!(matches!(err, LutError::Parse { location: Location::Offset(1), .. }));
        assert_eq!(decode("\u{feff}LUT".as_bytes()).unwrap(), "LUT");
    }

    #[test]
    fn test_bounds_read_back_exactly() {
        for v in [0.0_f32, 1.0, -0.014_125_4, 38.421_35, 1.1, 1e-7, 65_504.5] {
            let text = format_bound(v);
            assert_eq!(parse_f32(&text, 1).unwrap(), v, "{text}");
        }
        assert_eq!(format_bound(2.0), "2");
    }

    #[test]
    fn test_metadata_lines() {
        assert_eq!(split_metadata("author: jane"), ("author", "jane"));
        assert_eq!(split_metadata("made in nuke"), ("comment", "made in nuke"));
        assert_eq!(split_metadata("note to self: fix"), ("comment", "note to self: fix"));
    }
}
