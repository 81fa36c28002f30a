//! Engine configuration.
//!
//! ```yaml
//! debounce_ms: 200
//! case_sensitive: false
//! not_found_message: "Text not found."
//! ```

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunables for an [`EditorSession`](crate::session::EditorSession).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Quiescence interval before syntax coloring is recomputed, in milliseconds.
    pub debounce_ms: u64,
    /// Case-sensitive find when the host has no toggle of its own.
    pub case_sensitive: bool,
    /// Notice shown when a search finds nothing.
    pub not_found_message: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 200,
            case_sensitive: false,
            not_found_message: "Text not found.".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, EngineError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// The debounce interval as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
