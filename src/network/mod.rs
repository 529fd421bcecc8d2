//! Network module.
//!
//! Contains the Gateway (WebSocket listener and health check) and the
//! per-client Connection task.

mod connection;
mod gateway;

pub use connection::Connection;
pub use gateway::Gateway;
