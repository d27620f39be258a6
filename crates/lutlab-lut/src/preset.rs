//! Export presets.
//!
//! A preset is a JSON document bundling export settings:
//!
//! ```json
//! {
//!   "type": "3D",
//!   "extension": "cube",
//!   "input_range": [0.0, 1.0],
//!   "output_range": [0.0, 1.0],
//!   "output_bitdepth": 12,
//!   "cube_size": 33,
//!   "title": "Film look"
//! }
//! ```
//!
//! Every field is optional. Presets are loaded by path, or by name from the
//! directory named in `LUTLAB_PRESETS`.

use crate::convert::ConvertOptions;
use crate::lut::{Dimensionality, Domain};
use crate::registry::FormatRegistry;
use crate::{LutError, LutResult, Precision};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming the preset directory.
pub const PRESETS_ENV: &str = "LUTLAB_PRESETS";

/// Export settings loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportPreset {
    /// Output shape.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub lut_type: Option<Dimensionality>,
    /// Output format tag or extension.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Input domain `[min, max]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_range: Option<[f32; 2]>,
    /// Output value range `[min, max]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_range: Option<[f32; 2]>,
    /// Bit depth, `"half"` or `"float"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_bitdepth: Option<Precision>,
    /// Samples per dimension.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cube_size: Option<usize>,
    /// Title metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ExportPreset {
    /// Loads a preset file.
    pub fn load(path: &Path) -> LutResult<Self> {
        let bytes = fs::read(path)?;
        let preset: Self = serde_json::from_slice(&bytes)?;
        debug!(path = %path.display(), "loaded preset");
        Ok(preset)
    }

    /// Loads `name_or_path` as a file if it exists, else as
    /// `<dir>/<name>.json` inside `dir`.
    pub fn find_in(dir: Option<&Path>, name_or_path: &str) -> LutResult<Self> {
        let direct = Path::new(name_or_path);
        if direct.is_file() {
            return Self::load(direct);
        }
        let candidate: Option<PathBuf> = dir.map(|d| d.join(format!("{name_or_path}.json")));
        match candidate {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Err(LutError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("preset '{name_or_path}' not found"),
            ))),
        }
    }

    /// Like [`find_in`](Self::find_in), with the directory from `LUTLAB_PRESETS`.
    pub fn find(name_or_path: &str) -> LutResult<Self> {
        let dir = std::env::var_os(PRESETS_ENV).map(PathBuf::from);
        Self::find_in(dir.as_deref(), name_or_path)
    }

    /// Samples per dimension this preset asks for.
    ///
    /// An integer bit depth on a 1D/2D preset without `cube_size` implies
    /// `2^bits` samples.
    pub fn target_size(&self) -> Option<usize> {
        match (self.cube_size, self.lut_type, self.output_bitdepth) {
            (Some(size), _, _) => Some(size),
            (None, Some(Dimensionality::OneD | Dimensionality::TwoD), Some(Precision::Int(bits))) => {
                Some(1usize << bits)
            }
            _ => None,
        }
    }

    /// Merges the preset with explicit options.
    ///
    /// Preset fields win unless `overwrite` is set, in which case explicit
    /// options win. Fields missing on one side come from the other.
    pub fn apply(&self, explicit: &ConvertOptions, overwrite: bool) -> LutResult<ConvertOptions> {
        let target_format = self
            .extension
            .as_deref()
            .map(|ext| FormatRegistry::global().resolve(ext))
            .transpose()?;
        let input_range = self
            .input_range
            .map(|[min, max]| Domain::new(min, max))
            .transpose()?;

        let mut ignored = Vec::new();
        let mut pick = |name: &'static str, preset_set: bool, explicit_set: bool| -> bool {
            if preset_set && explicit_set && !overwrite {
                ignored.push(name);
            }
            // true: take the explicit value
            explicit_set && (overwrite || !preset_set)
        };

        let mut merged = explicit.clone();
        if !pick("type", self.lut_type.is_some(), explicit.target_dimensionality.is_some()) {
            merged.target_dimensionality = self.lut_type.or(explicit.target_dimensionality);
        }
        if !pick("format", target_format.is_some(), explicit.target_format.is_some()) {
            merged.target_format = target_format.or(explicit.target_format);
        }
        if !pick("input range", input_range.is_some(), explicit.input_range.is_some()) {
            merged.input_range = input_range.or(explicit.input_range);
        }
        if !pick("output range", self.output_range.is_some(), explicit.output_range.is_some()) {
            merged.output_range = self.output_range.or(explicit.output_range);
        }
        if !pick("bit depth", self.output_bitdepth.is_some(), explicit.precision.is_some()) {
            merged.precision = self.output_bitdepth.or(explicit.precision);
        }
        let size = self.target_size();
        if !pick("size", size.is_some(), explicit.target_size.is_some()) {
            merged.target_size = size.or(explicit.target_size);
        }
        if !pick("title", self.title.is_some(), explicit.title.is_some()) {
            merged.title = self.title.clone().or_else(|| explicit.title.clone());
        }

        if !ignored.is_empty() {
            warn!(
                options = ignored.join(", "),
                "preset values take precedence; use --overwrite-preset to override them"
            );
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LutFormat;
    use tempfile::tempdir;

    const PRESET: &str = r#"{"type": "3D", "extension": "3dl", "output_bitdepth": 12, "cube_size": 17, "title": "grade"}"#;

    #[test]
    fn test_load_and_find() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lustre.json");
        fs::write(&path, PRESET).unwrap();
        let preset = ExportPreset::load(&path).unwrap();
        assert_eq!(preset.lut_type, Some(Dimensionality::ThreeD));
        assert_eq!(preset.output_bitdepth, Some(Precision::Int(12)));
        assert_eq!(ExportPreset::find_in(Some(dir.path()), "lustre").unwrap(), preset);
        assert!(ExportPreset::find_in(Some(dir.path()), "missing").unwrap_err().is_io());
    }

    #[test]
    fn test_bad_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"cube_sise": 17}"#).unwrap();
        assert!(matches!(ExportPreset::load(&path), Err(LutError::Json(_))));
    }

    #[test]
    fn test_1d_size_from_bit_depth() {
        let preset: ExportPreset = serde_json::from_str(r#"{"type": "1D", "output_bitdepth": 10}"#).unwrap();
        assert_eq!(preset.target_size(), Some(1024));
        let preset: ExportPreset = serde_json::from_str(r#"{"type": "1D", "output_bitdepth": "half"}"#).unwrap();
        assert_eq!(preset.target_size(), None);
    }

    #[test]
    fn test_apply_precedence() {
        let preset: ExportPreset = serde_json::from_str(PRESET).unwrap();
        let explicit = ConvertOptions {
            target_size: Some(33),
            inverse: true,
            ..Default::default()
        };

        let merged = preset.apply(&explicit, false).unwrap();
        assert_eq!(merged.target_size, Some(17));
        assert_eq!(merged.target_format, Some(LutFormat::ThreeDl));
        assert_eq!(merged.precision, Some(Precision::Int(12)));
        assert!(merged.inverse);

        let merged = preset.apply(&explicit, true).unwrap();
        assert_eq!(merged.target_size, Some(33));
        assert_eq!(merged.title.as_deref(), Some("grade"));
    }
}
