//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig) and loading
//! - [`listen`]: Network listener configuration (ListenConfig)
//! - [`log`]: Log filter and output format (LogConfig, LogFormat)
//! - [`validation`]: Startup checks over a loaded Config
//! - [`defaults`]: serde default value functions

mod defaults;
mod listen;
mod log;
mod types;
mod validation;

pub use listen::ListenConfig;
pub use log::{LogConfig, LogFormat};
pub use types::Config;
pub use validation::validate;
