use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name pattern matched against entries of the dataset directory.
pub const DEFAULT_PATTERN: &str = "*.xml";

// ---------------------------------------------------------------------------
// LoaderConfig
// ---------------------------------------------------------------------------

/// Options for reading a dataset directory.
///
/// Missing keys fall back to the defaults, so `{}` is a valid config file:
///
/// ```json
/// { "pattern": "*.xml", "sorted": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Glob matched against file names (not full paths).
    pub pattern: String,
    /// Process files in file-name order instead of directory order.
    pub sorted: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            sorted: false,
        }
    }
}

impl LoaderConfig {
    /// Read a config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text).context("parsing config JSON")
    }
}
