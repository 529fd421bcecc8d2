//! Connection handles: the send side of one live connection.

use super::ConnectionId;
use tokio::sync::mpsc;

/// Sender half of a connection's outbound queue.
///
/// Cloned into the registry and into the owning router. The connection task
/// holds the receiver; once that task closes or drops it, the handle reports
/// itself closed and further sends are discarded.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<String>,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, tx: mpsc::UnboundedSender<String>) -> Self {
        Self { id, tx }
    }

    /// Create a handle together with the receiver its connection task drains.
    pub fn channel(id: ConnectionId) -> (Self, mpsc::UnboundedReceiver<String>) {
        // Unbounded: a slow reader grows its own queue, senders never wait.
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(id, tx), rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Whether the connection is still accepting frames.
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Queue a text frame. Returns `false` if the connection is gone.
    pub fn send(&self, frame: String) -> bool {
        self.tx.send(frame).is_ok()
    }
}
