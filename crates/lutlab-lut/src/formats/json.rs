//! Lossless JSON documents.
//!
//! # Format
//!
//! ```text
//! {
//!   "version": 1,
//!   "dimensionality": "2D",
//!   "size": 2,
//!   "domains": [{"min": 0.0, "max": 1.0}, ...],
//!   "precision": "float",
//!   "metadata": {"title": "ramp"},
//!   "curves": [[0.0, 1.0], [0.0, 1.0], [0.0, 1.0]]
//! }
//! ```
//!
//! 3D documents carry `"lattice": [[r, g, b], ...]` (red fastest) instead
//! of `curves`. Float samples use the shortest representation that reads
//! back to the same `f32`, so a float document survives a round trip
//! bit for bit.

use crate::lut::{Dimensionality, Domain, Lut, Samples};
use crate::{Location, LutError, LutResult, Precision};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

const VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct LutDocument {
    version: u32,
    dimensionality: Dimensionality,
    size: usize,
    domains: Vec<Domain>,
    #[serde(default)]
    precision: Precision,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    curves: Option<Vec<Vec<f32>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lattice: Option<Vec<[f32; 3]>>,
}

fn parse_error(e: serde_json::Error) -> LutError {
    let location = if e.is_eof() || e.line() == 0 {
        Location::EndOfInput
    } else {
        Location::Line(e.line())
    };
    LutError::Parse { location, message: e.to_string() }
}

/// Parses a JSON LUT document.
pub fn parse(bytes: &[u8]) -> LutResult<Lut> {
    let doc: LutDocument = serde_json::from_slice(bytes).map_err(parse_error)?;
    if doc.version != VERSION {
        return Err(LutError::at_end(format!("unsupported document version {}", doc.version)));
    }
    let samples = match (doc.dimensionality, doc.curves, doc.lattice) {
        (Dimensionality::ThreeD, None, Some(lattice)) => Samples::Lattice(lattice),
        (Dimensionality::OneD | Dimensionality::TwoD, Some(curves), None) => Samples::Curves(curves),
        (dim, _, _) => {
            return Err(LutError::at_end(format!(
                "a {dim} document needs exactly one of 'curves' or 'lattice'"
            )));
        }
    };
    let lut = Lut::from_parts(doc.dimensionality, doc.size, doc.domains, samples).map_err(|e| match e {
        LutError::InvalidLut(message) => LutError::at_end(message),
        other => other,
    })?;
    Ok(lut.with_precision(doc.precision).with_metadata(doc.metadata))
}

fn store(v: f32, precision: Precision) -> f32 {
    match precision {
        Precision::Float => v,
        p => p.quantize(v),
    }
}

/// Writes `lut` as a JSON document.
pub fn write_to<W: Write>(w: &mut W, lut: &Lut, precision: Precision) -> LutResult<()> {
    let (curves, lattice) = match lut.samples() {
        Samples::Curves(curves) => (
            Some(
                curves
                    .iter()
                    .map(|c| c.iter().map(|&v| store(v, precision)).collect())
                    .collect(),
            ),
            None,
        ),
        Samples::Lattice(lattice) => (
            None,
            Some(lattice.iter().map(|rgb| rgb.map(|v| store(v, precision))).collect()),
        ),
    };
    let doc = LutDocument {
        version: VERSION,
        dimensionality: lut.dimensionality(),
        size: lut.size(),
        domains: lut.domains().to_vec(),
        precision,
        metadata: lut.metadata().clone(),
        curves,
        lattice,
    };
    serde_json::to_writer_pretty(&mut *w, &doc)?;
    writeln!(w)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_roundtrip_is_exact() {
        let lut = Lut::one_d(vec![0.0, 0.123_456_79, 0.987_654_3, 1.5], Domain::new(-1.0, 3.0).unwrap())
            .unwrap()
            .with_title("exact");
        let mut out = Vec::new();
        write_to(&mut out, &lut, Precision::Float).unwrap();
        assert_eq!(parse(&out).unwrap(), lut);
    }

    #[test]
    fn test_lattice_document() {
        let lut = Lut::identity(Dimensionality::ThreeD, 3).unwrap();
        let mut out = Vec::new();
        write_to(&mut out, &lut, Precision::Float).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"lattice\""));
        assert!(!text.contains("\"curves\""));
        assert_eq!(parse(text.as_bytes()).unwrap(), lut);
    }

    #[test]
    fn test_integer_precision_quantizes() {
        let lut = Lut::one_d(vec![0.0, 0.3, 1.0], Domain::UNIT).unwrap();
        let mut out = Vec::new();
        write_to(&mut out, &lut, Precision::Int(8)).unwrap();
        let back = parse(&out).unwrap();
        assert_eq!(back.precision(), Precision::Int(8));
        assert_eq!(back.curves().unwrap()[0][1], Precision::Int(8).quantize(0.3));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse(b"{\n\"version\": 1,\n\"size\": x}"),
            Err(LutError::Parse { location: Location::Line(3), .. })
        ));
        assert!(matches!(
            parse(b"{\"version\": 1"),
            Err(LutError::Parse { location: Location::EndOfInput, .. })
        ));
        let wrong_count = r#"{"version":1,"dimensionality":"1D","size":3,"domains":[{"min":0,"max":1}],"curves":[[0,1]]}"#;
        assert!(matches!(parse(wrong_count.as_bytes()), Err(LutError::Parse { .. })));
        let missing = r#"{"version":1,"dimensionality":"3D","size":2,"domains":[]}"#;
        assert!(parse(missing.as_bytes()).is_err());
    }
}
