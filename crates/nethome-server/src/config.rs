//! Server configuration.
//!
//! Loaded from a JSON file; `NETHOME_CONFIG` overrides the path. Items listed
//! in the configuration are created, configured through the init window and
//! activated at boot.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use nethome_core::eventbus::DEFAULT_CHANNEL_CAPACITY;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "NETHOME_CONFIG";

/// Environment variable for the log filter (tracing EnvFilter syntax).
pub const LOG_ENV_VAR: &str = "NETHOME_LOG";

/// One item to create at boot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemConfig {
    /// Registered item class.
    pub class: String,
    /// Name to register the item under.
    pub name: String,
    /// Attribute values applied during the construction window.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

/// Top-level server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Event bus channel capacity.
    pub bus_capacity: usize,
    /// Seconds between minute-tick events (lowered in tests).
    pub tick_seconds: u64,
    /// Items created at boot.
    pub items: Vec<ItemConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bus_capacity: DEFAULT_CHANNEL_CAPACITY,
            tick_seconds: 60,
            items: Vec::new(),
        }
    }
}

/// Errors from configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ServerConfig {
    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Load from the path in `NETHOME_CONFIG`, or defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::load(path),
            Err(_) => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bus_capacity, DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(config.tick_seconds, 60);
        assert!(config.items.is_empty());
    }

    #[test]
    fn test_parse_items() {
        let json = r#"{
            "bus_capacity": 16,
            "items": [
                {"class": "Lamp", "name": "Hall", "attributes": {"Room": "Hallway"}}
            ]
        }"#;
        let config: ServerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.bus_capacity, 16);
        assert_eq!(config.items.len(), 1);
        assert_eq!(config.items[0].class, "Lamp");
        assert_eq!(config.items[0].attributes["Room"], "Hallway");
    }
}
