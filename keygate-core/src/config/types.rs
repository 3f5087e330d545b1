//! Configuration type definitions
//!
//! These types represent the runtime configuration for Keygate.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::error::{Error, Result};

/// Environment variable that overrides `auth.api_key`
pub const API_KEY_ENV: &str = "KEYGATE_API_KEY";

/// Root configuration for Keygate
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeygateConfig {
    /// Hosting environment
    #[serde(default)]
    pub environment: Environment,

    /// HTTP listener configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Global logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl KeygateConfig {
    /// Apply environment overrides on top of the file contents
    pub fn apply_env(&mut self) {
        self.apply_overrides(std::env::var(API_KEY_ENV).ok());
    }

    fn apply_overrides(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key {
            tracing::info!("Using API key from {}", API_KEY_ENV);
            self.auth.api_key = Some(key);
        }
    }

    /// Check that the configuration can start a server
    ///
    /// An empty key is refused. HTTP/1.1 strips trailing whitespace from
    /// header values, so no request can carry an empty token.
    pub fn validate(&self) -> Result<()> {
        match self.auth.api_key.as_deref() {
            None => {
                return Err(Error::Config(format!(
                    "auth.api_key is not set (set it in the config file or via {})",
                    API_KEY_ENV
                )));
            }
            Some("") => {
                return Err(Error::Config(
                    "auth.api_key is empty; no request could ever authenticate".to_string(),
                ));
            }
            Some(_) => {}
        }
        self.server.listen_addr()?;
        Ok(())
    }
}

/// Hosting environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address (default: 127.0.0.1:5000)
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerConfig {
    /// Parse the listen address
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|e| Error::Config(format!("Invalid listen address '{}': {}", self.listen, e)))
    }
}

fn default_listen() -> String {
    "127.0.0.1:5000".to_string()
}

/// Authentication configuration (`Auth.ApiKey`)
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// The single accepted API key
    pub api_key: Option<String>,
}

// Keep the secret out of debug output
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Global logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KeygateConfig::default();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.server.listen, "127.0.0.1:5000");
        assert_eq!(config.logging.level, "info");
        assert!(config.auth.api_key.is_none());
    }

    #[test]
    fn test_validate_requires_api_key() {
        let config = KeygateConfig::default();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_listen() {
        let mut config = KeygateConfig::default();
        config.auth.api_key = Some("S3cr3t".to_string());
        config.server.listen = "not-an-address".to_string();
        assert!(config.validate().is_err());

        config.server.listen = "0.0.0.0:8080".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_api_key() {
        let mut config = KeygateConfig::default();
        config.auth.api_key = Some(String::new());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("auth.api_key is empty"));

        config.auth.api_key = Some(" ".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_override_replaces_file_key() {
        let mut config = KeygateConfig::default();
        config.auth.api_key = Some("from-file".to_string());

        config.apply_overrides(None);
        assert_eq!(config.auth.api_key.as_deref(), Some("from-file"));

        config.apply_overrides(Some("from-env".to_string()));
        assert_eq!(config.auth.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let auth = AuthConfig {
            api_key: Some("S3cr3t".to_string()),
        };
        let shown = format!("{:?}", auth);
        assert!(!shown.contains("S3cr3t"));
        assert!(shown.contains("redacted"));
    }
}
