//! The Registry - live mapping from client id to connection handle.
//!
//! The Registry is the only state shared between connection tasks. It is a
//! sharded `DashMap`, so `register`, `lookup` and `remove` from different
//! tasks never block each other for long. No guard escapes a method: every
//! read clones the handle before returning, so callers can `.await` freely.
//!
//! # Ownership
//!
//! The Registry never opens or closes connections. A registration under an
//! id that is already present replaces the previous handle; the previous
//! connection stays open but is no longer reachable by that id.

use super::ConnectionHandle;
use dashmap::DashMap;

/// Client-chosen identifier (opaque, not validated).
pub type ClientId = String;

/// Process-wide client id -> connection handle map.
#[derive(Debug, Default)]
pub struct Registry {
    clients: DashMap<ClientId, ConnectionHandle>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the mapping for `id`.
    ///
    /// Returns the handle that was displaced, if any.
    pub fn register(&self, id: ClientId, handle: ConnectionHandle) -> Option<ConnectionHandle> {
        self.clients.insert(id, handle)
    }

    /// Current handle for `id`.
    pub fn lookup(&self, id: &str) -> Option<ConnectionHandle> {
        self.clients.get(id).map(|entry| entry.value().clone())
    }

    /// Delete the mapping for `id` (no-op if absent).
    ///
    /// Unconditional: if `id` was taken over by a newer connection, that
    /// connection loses its entry too.
    pub fn remove(&self, id: &str) -> Option<ConnectionHandle> {
        self.clients.remove(id).map(|(_, handle)| handle)
    }

    /// Number of registered clients.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Snapshot of registered ids (diagnostics only).
    pub fn client_ids(&self) -> Vec<ClientId> {
        self.clients.iter().map(|e| e.key().clone()).collect()
    }
}
