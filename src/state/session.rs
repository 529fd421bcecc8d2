//! Per-connection session state.
//!
//! ```text
//! ┌──────────────┐  first client_id  ┌────────────┐  disconnect  ┌────────┐
//! │ Unregistered ├──────────────────►│ Registered ├─────────────►│ Closed │
//! └──────┬───────┘                   └────────────┘              └────────┘
//!        │                 disconnect                                 ▲
//!        └────────────────────────────────────────────────────────────┘
//! ```
//!
//! No transition leaves `Registered` except to `Closed`, and nothing leaves
//! `Closed`.

use super::ClientId;

/// Lifecycle of one connection's identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Connected, no identifier claimed yet.
    #[default]
    Unregistered,
    /// Identifier claimed; fixed for the rest of the connection.
    Registered(ClientId),
    /// Transport closed.
    Closed,
}

impl SessionState {
    /// Claim `id` if no identifier has been claimed yet.
    ///
    /// Returns `false` (and leaves the state untouched) when already
    /// registered or closed.
    pub fn register(&mut self, id: ClientId) -> bool {
        match self {
            Self::Unregistered => {
                *self = Self::Registered(id);
                true
            }
            Self::Registered(_) | Self::Closed => false,
        }
    }

    /// Move to `Closed`, returning the identifier that was held, if any.
    pub fn close(&mut self) -> Option<ClientId> {
        match std::mem::replace(self, Self::Closed) {
            Self::Registered(id) => Some(id),
            Self::Unregistered | Self::Closed => None,
        }
    }

    pub fn client_id(&self) -> Option<&str> {
        match self {
            Self::Registered(id) => Some(id.as_str()),
            Self::Unregistered | Self::Closed => None,
        }
    }

    pub fn is_unregistered(&self) -> bool {
        matches!(self, Self::Unregistered)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}
