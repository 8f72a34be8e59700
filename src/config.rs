//! Pack/unpack settings loadable from TOML or JSON
//!
//! ```toml
//! method = "zstd"
//! quality = 19
//! strict = false
//! ```

use crate::archive::{CompressionMethod, DEFAULT_QUALITY};
use crate::error::{PackError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings shared by [`ArchiveWriter`](crate::ArchiveWriter) and
/// [`ArchiveReader`](crate::ArchiveReader)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// Per-entry codec
    pub method: CompressionMethod,

    /// Per-entry compression effort
    pub quality: i32,

    /// Reject archives with bytes left after the last frame
    pub strict: bool,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            method: CompressionMethod::default(),
            quality: DEFAULT_QUALITY,
            strict: false,
        }
    }
}

impl PackConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.toml` or `.json` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            Some("json") => Self::from_json_str(&text),
            _ => Err(PackError::Config(format!(
                "unsupported config file: {}",
                path.display()
            ))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.method.validate_quality(self.quality)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| PackError::Config(e.to_string()))
    }
}
