//! Configuration loader

use crate::config::KeygateConfig;
use crate::error::{Error, Result};
use std::path::Path;

/// Configuration loader for JSON and TOML files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file, apply environment overrides and validate
    pub fn load<P: AsRef<Path>>(path: P) -> Result<KeygateConfig> {
        let mut config = Self::read(path)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration file without overrides or validation
    pub fn read<P: AsRef<Path>>(path: P) -> Result<KeygateConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext {
            "json" => Self::from_json(&content),
            "toml" => Self::from_toml(&content),
            _ => Err(Error::Config(format!("Unknown config format: {}", ext))),
        }
    }

    /// Parse JSON configuration
    pub fn from_json(content: &str) -> Result<KeygateConfig> {
        serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid JSON: {}", e)))
    }

    /// Parse TOML configuration
    pub fn from_toml(content: &str) -> Result<KeygateConfig> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }
}
