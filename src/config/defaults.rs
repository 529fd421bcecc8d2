//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Port the relay listens on when nothing else is configured.
pub const DEFAULT_PORT: u16 = 8080;

/// Port of the Prometheus endpoint when nothing else is configured.
pub const DEFAULT_METRICS_PORT: u16 = 9090;

pub fn default_server_name() -> String {
    "sigrelay".to_string()
}

pub fn default_metrics_port() -> u16 {
    DEFAULT_METRICS_PORT
}

/// All interfaces, port 8080.
pub fn default_listen_address() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT)
}

pub fn default_log_filter() -> String {
    "info".to_string()
}
