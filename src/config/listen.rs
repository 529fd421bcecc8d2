//! Network listener configuration.

use super::defaults::default_listen_address;
use serde::Deserialize;
use std::net::SocketAddr;

/// WebSocket / health listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (default "0.0.0.0:8080").
    #[serde(default = "default_listen_address")]
    pub address: SocketAddr,
    /// Allowed origins for the WebSocket upgrade (e.g., `["https://example.com"]`).
    /// Empty list allows all origins.
    #[serde(default)]
    pub allow_origins: Vec<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: default_listen_address(),
            allow_origins: Vec::new(),
        }
    }
}

impl ListenConfig {
    /// Whether a WebSocket upgrade carrying `origin` may proceed.
    ///
    /// Requests without an Origin header (native clients) are only accepted
    /// when no allow-list is configured.
    pub fn origin_allowed(&self, origin: Option<&str>) -> bool {
        if self.allow_origins.is_empty() {
            return true;
        }
        match origin {
            Some(origin) => self
                .allow_origins
                .iter()
                .any(|a| a == origin || a == "*"),
            None => false,
        }
    }
}
