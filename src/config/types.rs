//! Core configuration types and loading.

use serde::Deserialize;
use std::net::IpAddr;
use std::path::Path;
use thiserror::Error;

use super::defaults::{default_metrics_port, default_server_name};
use super::listen::ListenConfig;
use super::log::LogConfig;

/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable overriding the listen IP.
pub const BIND_ADDRESS_ENV: &str = "BIND_ADDRESS";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Relay configuration.
///
/// Every section is optional; an empty file (or no file) yields a relay on
/// `0.0.0.0:8080`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server information.
    #[serde(default)]
    pub server: ServerConfig,
    /// Network listen configuration.
    #[serde(default)]
    pub listen: ListenConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `PORT` and `BIND_ADDRESS` from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(PORT_ENV) {
            let port = value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidEnv {
                    var: PORT_ENV,
                    value: value.clone(),
                })?;
            self.listen.address.set_port(port);
        }
        if let Some(value) = lookup(BIND_ADDRESS_ENV) {
            let ip = value
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidEnv {
                    var: BIND_ADDRESS_ENV,
                    value: value.clone(),
                })?;
            self.listen.address.set_ip(ip);
        }
        Ok(())
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Name reported in startup logs (default "sigrelay").
    #[serde(default = "default_server_name")]
    pub name: String,
    /// Prometheus metrics HTTP port (default: 9090, 0 disables).
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            metrics_port: default_metrics_port(),
        }
    }
}
