//! State management module.
//!
//! Contains the Registry (shared client map), connection handles, and the
//! per-connection session state machine.

mod handle;
mod registry;
mod session;
mod uid;

pub use handle::ConnectionHandle;
pub use registry::{ClientId, Registry};
pub use session::SessionState;
pub use uid::{ConnectionId, ConnectionIdGenerator};
