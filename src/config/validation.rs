//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listen.allow_origins contains an empty entry")]
    EmptyOrigin,
    #[error("server.metrics_port {0} collides with the listen port")]
    MetricsPortCollision(u16),
    #[error("log.filter must not be empty")]
    EmptyLogFilter,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listen.allow_origins.iter().any(|o| o.trim().is_empty()) {
        errors.push(ValidationError::EmptyOrigin);
    }

    let metrics_port = config.server.metrics_port;
    if metrics_port != 0 && metrics_port == config.listen.address.port() {
        errors.push(ValidationError::MetricsPortCollision(metrics_port));
    }

    if config.log.filter.trim().is_empty() {
        errors.push(ValidationError::EmptyLogFilter);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
