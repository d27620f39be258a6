//! Built-in colorimetry provider.

use crate::{
    ColorspaceDescriptor, D50, D60, D65, DCI_WHITE, PrimariesError, PrimariesResult,
};

/// Source of named colorspace descriptors.
///
/// The matrix builder only needs primaries and a white point. Where they
/// come from is up to the implementation.
pub trait ColorimetryProvider {
    /// Looks up a colorspace by name.
    fn descriptor(&self, name: &str) -> PrimariesResult<ColorspaceDescriptor>;

    /// Canonical names this provider knows, for listings.
    fn names(&self) -> Vec<&str>;
}

/// sRGB / Rec.709.
pub static SRGB: ColorspaceDescriptor =
    ColorspaceDescriptor::builtin("sRGB", (0.64, 0.33), (0.30, 0.60), (0.15, 0.06), D65);
/// ITU-R BT.2020.
pub static REC2020: ColorspaceDescriptor =
    ColorspaceDescriptor::builtin("Rec2020", (0.708, 0.292), (0.170, 0.797), (0.131, 0.046), D65);
/// DCI-P3 with the DCI white.
pub static DCI_P3: ColorspaceDescriptor =
    ColorspaceDescriptor::builtin("DCI-P3", (0.680, 0.320), (0.265, 0.690), (0.150, 0.060), DCI_WHITE);
/// Display P3 (DCI-P3 primaries, D65 white).
pub static DISPLAY_P3: ColorspaceDescriptor =
    ColorspaceDescriptor::builtin("DisplayP3", (0.680, 0.320), (0.265, 0.690), (0.150, 0.060), D65);
/// ACES 2065-1 primaries.
pub static ACES_AP0: ColorspaceDescriptor =
    ColorspaceDescriptor::builtin("ACES", (0.7347, 0.2653), (0.0, 1.0), (0.0001, -0.077), D60);
/// ACEScg primaries.
pub static ACES_AP1: ColorspaceDescriptor =
    ColorspaceDescriptor::builtin("ACEScg", (0.713, 0.293), (0.165, 0.830), (0.128, 0.044), D60);
/// Adobe RGB (1998).
pub static ADOBE_RGB: ColorspaceDescriptor =
    ColorspaceDescriptor::builtin("AdobeRGB", (0.64, 0.33), (0.21, 0.71), (0.15, 0.06), D65);
/// ProPhoto RGB / ROMM.
pub static PROPHOTO_RGB: ColorspaceDescriptor =
    ColorspaceDescriptor::builtin("ProPhotoRGB", (0.7347, 0.2653), (0.1596, 0.8404), (0.0366, 0.0001), D50);
/// ARRI Wide Gamut 3 (ALEXA).
pub static ALEXA_WIDE_GAMUT: ColorspaceDescriptor =
    ColorspaceDescriptor::builtin("AlexaWideGamut", (0.684, 0.313), (0.221, 0.848), (0.0861, -0.102), D65);
/// Sony S-Gamut3 (same primaries as S-Gamut).
pub static S_GAMUT3: ColorspaceDescriptor =
    ColorspaceDescriptor::builtin("SGamut3", (0.730, 0.280), (0.140, 0.855), (0.100, -0.050), D65);
/// Sony S-Gamut3.Cine.
pub static S_GAMUT3_CINE: ColorspaceDescriptor =
    ColorspaceDescriptor::builtin("SGamut3Cine", (0.766, 0.275), (0.225, 0.800), (0.089, -0.087), D65);
/// Panasonic V-Gamut.
pub static V_GAMUT: ColorspaceDescriptor =
    ColorspaceDescriptor::builtin("VGamut", (0.730, 0.280), (0.165, 0.840), (0.100, -0.030), D65);

// Canonical entry first, then aliases. Lookups compare normalized keys.
static TABLE: &[(&ColorspaceDescriptor, &[&str])] = &[
    (&SRGB, &["rec709", "bt709"]),
    (&REC2020, &["bt2020"]),
    (&DCI_P3, &["p3dci", "p3"]),
    (&DISPLAY_P3, &["p3d65"]),
    (&ACES_AP0, &["aces20651", "ap0"]),
    (&ACES_AP1, &["ap1", "acescct", "acescc"]),
    (&ADOBE_RGB, &["adobergb1998"]),
    (&PROPHOTO_RGB, &["prophoto", "romm"]),
    (&ALEXA_WIDE_GAMUT, &["arriwidegamut3", "awg3", "awg"]),
    (&S_GAMUT3, &["sgamut"]),
    (&S_GAMUT3_CINE, &[]),
    (&V_GAMUT, &[]),
];

/// Lowercases and strips everything but ASCII letters and digits, so
/// `"DCI-P3"`, `"dci_p3"` and `"DciP3"` all match.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Static table of well-known colorspaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinColorimetry;

impl ColorimetryProvider for BuiltinColorimetry {
    fn descriptor(&self, name: &str) -> PrimariesResult<ColorspaceDescriptor> {
        let key = normalize(name);
        TABLE
            .iter()
            .find(|(desc, aliases)| normalize(&desc.name) == key || aliases.contains(&key.as_str()))
            .map(|(desc, _)| (*desc).clone())
            .ok_or_else(|| PrimariesError::UnknownColorspace(name.to_string()))
    }

    fn names(&self) -> Vec<&str> {
        TABLE.iter().map(|(desc, _)| desc.name.as_ref()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        let p = BuiltinColorimetry;
        assert_eq!(p.descriptor("Rec.709").unwrap().name, "sRGB");
        assert_eq!(p.descriptor("dci_p3").unwrap().name, "DCI-P3");
        assert_eq!(p.descriptor("ACES2065-1").unwrap().name, "ACES");
        assert_eq!(p.descriptor("S-Gamut3.Cine").unwrap().name, "SGamut3Cine");
    }

    #[test]
    fn test_unknown() {
        let err = BuiltinColorimetry.descriptor("NotAColorspace").unwrap_err();
        assert!(matches!(err, PrimariesError::UnknownColorspace(_)));
    }

    #[test]
    fn test_names_resolve() {
        let p = BuiltinColorimetry;
        for name in p.names() {
            assert_eq!(p.descriptor(name).unwrap().name, name);
        }
    }
}
