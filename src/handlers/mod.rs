//! Frame handlers.
//!
//! One [`Router`] is attached to each connection. It owns the connection's
//! [`SessionState`](crate::state::SessionState), classifies every inbound
//! frame as a registration or a directed envelope, and either updates the
//! shared [`Registry`](crate::state::Registry) or forwards the envelope to
//! its destination's queue.

mod router;

pub use router::{Dispatch, Router};
