//! Console configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Console configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Prompt string re-sent to the client after every exchange.
    pub prompt: String,
    /// Separator between sub-statements on a single command line.
    pub command_separator: char,
    /// Local interface to bind. All interfaces when unset.
    pub bind_address: Option<String>,
    /// Destination root for uploaded files.
    pub write_root: PathBuf,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            command_separator: '|',
            bind_address: None,
            write_root: std::env::temp_dir(),
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }
}
