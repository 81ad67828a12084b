use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{BridgeError, BridgeResult};

/// Limits and codec knobs shared by every call made through one [`crate::Bridge`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BridgeOpts {
    /// Largest element count (`width * height * depth * spectrum`) a single buffer may hold.
    pub max_elements: usize,
    /// Largest number of live handles the registry will hold at once.
    pub max_handles: usize,
    /// JPEG quality (1..=100) used by `save` and `convert_to`.
    pub jpeg_quality: u8,
}

impl Default for BridgeOpts {
    fn default() -> Self {
        Self {
            // 256M elements: a 16k x 16k RGBA image.
            max_elements: 1 << 28,
            max_handles: 1 << 20,
            jpeg_quality: 100,
        }
    }
}

impl BridgeOpts {
    /// Parse options from JSON text. Missing fields keep their defaults.
    pub fn from_json_str(s: &str) -> BridgeResult<Self> {
        let opts: Self = serde_json::from_str(s).context("parse bridge options json")?;
        opts.validate()?;
        Ok(opts)
    }

    /// Read and parse options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read bridge options '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Reject option values no call could run under.
    pub fn validate(&self) -> BridgeResult<()> {
        if self.max_elements == 0 {
            return Err(BridgeError::bad_argument("max_elements must be > 0"));
        }
        if self.max_handles == 0 {
            return Err(BridgeError::bad_argument("max_handles must be > 0"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(BridgeError::bad_argument("jpeg_quality must be in 1..=100"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
