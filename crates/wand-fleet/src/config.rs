//! Persisted fleet configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Default poll interval in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2;
/// Default reconnect (rescan) interval in milliseconds
pub const DEFAULT_RECONNECT_INTERVAL_MS: u64 = 1000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to write configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Scheduling options of the fleet manager, persisted as TOML.
/// Unset or invalid values fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetConfig {
    /// How often open controllers are polled for data, in milliseconds
    #[serde(default = "default_poll_interval")]
    pub controller_poll_interval: u64,
    /// How often the device list is reconciled, in milliseconds
    #[serde(default = "default_reconnect_interval")]
    pub controller_reconnect_interval: u64,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            controller_poll_interval: default_poll_interval(),
            controller_reconnect_interval: default_reconnect_interval(),
        }
    }
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_reconnect_interval() -> u64 {
    DEFAULT_RECONNECT_INTERVAL_MS
}

impl FleetConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.controller_poll_interval)
    }

    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.controller_reconnect_interval)
    }

    /// Load from a TOML file. A missing or unparsable file yields the
    /// defaults; neither is fatal.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    info!(path = %path.display(), "Loaded fleet configuration");
                    config
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Invalid fleet configuration, using defaults"
                    );
                    Self::default()
                }
            },
            Err(_) => {
                info!(
                    path = %path.display(),
                    "Fleet configuration not found, using defaults"
                );
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FleetConfig::default();
        assert_eq!(config.controller_poll_interval, 2);
        assert_eq!(config.controller_reconnect_interval, 1000);
        assert_eq!(config.poll_interval(), Duration::from_millis(2));
        assert_eq!(config.reconnect_interval(), Duration::from_millis(1000));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = FleetConfig::load(Path::new("/nonexistent/controllers.toml"));
        assert_eq!(config, FleetConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: FleetConfig = toml::from_str("controller_poll_interval = 5").unwrap();
        assert_eq!(config.controller_poll_interval, 5);
        assert_eq!(
            config.controller_reconnect_interval,
            DEFAULT_RECONNECT_INTERVAL_MS
        );
    }

    #[test]
    fn test_invalid_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("controllers.toml");
        std::fs::write(&path, "controller_poll_interval = \"fast\"").unwrap();
        let config = FleetConfig::load(&path);
        assert_eq!(config, FleetConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("controllers.toml");

        let config = FleetConfig {
            controller_poll_interval: 4,
            controller_reconnect_interval: 500,
        };
        config.save(&path).unwrap();

        assert_eq!(FleetConfig::load(&path), config);
    }
}
