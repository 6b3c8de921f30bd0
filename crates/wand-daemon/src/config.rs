//! Daemon configuration loading

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Main configuration structure, read from `wandd.toml`.
///
/// The fleet's own options (poll/reconnect intervals) live in a separate
/// file owned and persisted by the fleet manager; this file is read-only
/// at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub daemon: DaemonConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Bind address for the web server
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Path to the fleet manager's persisted configuration
    #[serde(default = "default_fleet_config")]
    pub fleet_config: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            fleet_config: default_fleet_config(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:9512".to_string()
}

fn default_fleet_config() -> String {
    "controllers.toml".to_string()
}

/// Load configuration from file. Missing or invalid files fall back to
/// the defaults; the daemon config is never fatal.
pub fn load_config(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded configuration");
                config
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Invalid configuration, using defaults"
                );
                Config {
                    daemon: DaemonConfig::default(),
                }
            }
        },
        Err(_) => {
            info!(
                path = %path.display(),
                "Configuration file not found, using defaults"
            );
            Config {
                daemon: DaemonConfig::default(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.daemon.bind, "0.0.0.0:9512");
        assert_eq!(config.daemon.fleet_config, "controllers.toml");
    }

    #[test]
    fn test_overrides() {
        let config: Config = toml::from_str(
            "[daemon]\nbind = \"127.0.0.1:8000\"\nfleet_config = \"/etc/wand/controllers.toml\"",
        )
        .unwrap();
        assert_eq!(config.daemon.bind, "127.0.0.1:8000");
        assert_eq!(config.daemon.fleet_config, "/etc/wand/controllers.toml");
    }
}
