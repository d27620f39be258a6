//! Format registry.
//!
//! Maps format tags and file extensions to [`LutFormat`] handlers. The
//! global instance is built once on first use and is read-only afterwards.
//!
//! ```
//! use lutlab_lut::{FormatHandler, FormatRegistry, LutFormat};
//!
//! let registry = FormatRegistry::global();
//! assert_eq!(registry.resolve("cube").unwrap(), LutFormat::Cube);
//! assert_eq!(registry.resolve(".M3D").unwrap(), LutFormat::Pandora);
//! assert!(registry.resolve("tiff").is_err());
//! assert!(LutFormat::Spi3d.supports(lutlab_lut::Dimensionality::ThreeD));
//! ```

use crate::formats::{FormatHandler, LutFormat};
use crate::{LutError, LutResult};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;
use tracing::trace;

/// Lookup table from identifiers to format handlers.
#[derive(Debug, Default)]
pub struct FormatRegistry {
    formats: Vec<LutFormat>,
    by_key: HashMap<String, LutFormat>,
}

fn normalize(identifier: &str) -> String {
    identifier.trim().trim_start_matches('.').to_ascii_lowercase()
}

impl FormatRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry holding every built-in format.
    pub fn global() -> &'static FormatRegistry {
        static INSTANCE: OnceLock<FormatRegistry> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let mut registry = FormatRegistry::new();
            for format in LutFormat::ALL {
                registry.register(format);
            }
            registry
        })
    }

    /// Registers `format` under its tag and every extension.
    ///
    /// Later registrations win on key collisions.
    pub fn register(&mut self, format: LutFormat) {
        self.by_key.insert(format.tag().to_string(), format);
        for ext in format.extensions() {
            self.by_key.insert(ext.to_string(), format);
        }
        if !self.formats.contains(&format) {
            self.formats.push(format);
        }
    }

    /// Resolves a tag or extension, case-insensitively and with or without
    /// a leading dot.
    pub fn resolve(&self, identifier: &str) -> LutResult<LutFormat> {
        let key = normalize(identifier);
        let format = self
            .by_key
            .get(&key)
            .copied()
            .ok_or_else(|| LutError::UnsupportedFormat(identifier.to_string()))?;
        trace!(identifier, format = format.tag(), "resolved format");
        Ok(format)
    }

    /// Resolves the format of `path` from its extension.
    pub fn resolve_path(&self, path: &Path) -> LutResult<LutFormat> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| LutError::UnsupportedFormat(format!("{} has no extension", path.display())))?;
        self.resolve(ext)
    }

    /// Registered formats in registration order.
    pub fn formats(&self) -> &[LutFormat] {
        &self.formats
    }
}
