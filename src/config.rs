//! Server configuration
//!
//! Defaults can be overridden from a JSON file; every field is optional.
//!
//! ```json
//! { "addr": "0.0.0.0:5000", "draw_interval_ms": 1000, "seed": 42 }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default listen address
pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";

/// Default pause between two draws
pub const DEFAULT_DRAW_INTERVAL_MS: u64 = 2500;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address the acceptor binds to
    pub addr: String,
    /// Pause between two draws, in milliseconds
    pub draw_interval_ms: u64,
    /// Seed for the draw order; random when absent
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            draw_interval_ms: DEFAULT_DRAW_INTERVAL_MS,
            seed: None,
        }
    }
}

impl ServerConfig {
    /// Load and validate a JSON config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate JSON config text
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.draw_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "draw_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.addr.trim().is_empty() {
            return Err(ConfigError::Invalid("addr must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn draw_interval(&self) -> Duration {
        Duration::from_millis(self.draw_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.addr, "127.0.0.1:5000");
        assert_eq!(config.draw_interval(), Duration::from_millis(2500));
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ServerConfig::from_json(r#"{"draw_interval_ms": 100}"#).unwrap();
        assert_eq!(config.draw_interval_ms, 100);
        assert_eq!(config.addr, DEFAULT_ADDR);
    }

    #[test]
    fn test_full_json() {
        let config =
            ServerConfig::from_json(r#"{"addr": "0.0.0.0:6000", "draw_interval_ms": 10, "seed": 3}"#)
                .unwrap();
        assert_eq!(config.addr, "0.0.0.0:6000");
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(matches!(
            ServerConfig::from_json(r#"{"draw_interval_ms": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            ServerConfig::from_json(r#"{"port": 1}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ServerConfig::from_file("/nonexistent/bingo.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
