//! Listings of formats, curves and colorspaces

use anyhow::Result;
use lutlab_lut::{CurveRegistry, FormatHandler, FormatRegistry};
use lutlab_primaries::{BuiltinColorimetry, ColorimetryProvider};

fn join<T: ToString>(items: &[T]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

pub fn formats() -> Result<()> {
    println!("{:<6} {:<12} {:<10} {:<36} DESCRIPTION", "TAG", "EXTENSIONS", "TYPES", "PRECISIONS");
    for format in FormatRegistry::global().formats() {
        println!(
            "{:<6} {:<12} {:<10} {:<36} {}",
            format.tag(),
            format.extensions().join(", "),
            join(format.supported_dimensionalities()),
            join(format.supported_precisions()),
            format.description()
        );
    }
    Ok(())
}

pub fn curves() -> Result<()> {
    for curve in CurveRegistry::global().curves() {
        println!("{:<10} {}", curve.name, curve.description);
    }
    println!("{:<10} power law with any exponent g > 0", "gamma:<g>");
    Ok(())
}

pub fn colorspaces() -> Result<()> {
    let provider = BuiltinColorimetry;
    for name in provider.names() {
        let desc = provider.descriptor(name)?;
        println!(
            "{:<16} white ({:.4}, {:.4})",
            name, desc.white_point.x, desc.white_point.y
        );
    }
    println!("{:<16} CIE XYZ, usable with matrix --to", "XYZ");
    Ok(())
}
