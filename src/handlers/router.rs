//! Per-connection frame router.

use crate::error::{RelayError, RelayResult};
use crate::metrics;
use crate::state::{ClientId, ConnectionHandle, Registry, SessionState};
use sigrelay_proto::{Envelope, Frame};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happened to one successfully handled frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The frame claimed an identifier for this connection.
    Registered(ClientId),
    /// The frame was queued to the destination's connection.
    Forwarded { to: ClientId },
    /// The frame had no usable `to` and was dropped.
    NoDestination,
    /// The connection is already closed; the frame was not looked at.
    Ignored,
}

/// Routes the frames of one connection.
pub struct Router {
    registry: Arc<Registry>,
    handle: ConnectionHandle,
    state: SessionState,
}

impl Router {
    /// Attach a router to a freshly established connection.
    pub fn new(registry: Arc<Registry>, handle: ConnectionHandle) -> Self {
        Self {
            registry,
            handle,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Handle one inbound text or binary frame.
    ///
    /// Errors are never fatal to the connection: the caller logs them and
    /// keeps reading.
    pub fn on_message(&mut self, raw: &[u8]) -> RelayResult<Dispatch> {
        metrics::record_received();
        let result = self.dispatch(raw);
        match &result {
            Ok(Dispatch::Forwarded { .. }) => metrics::record_forwarded(),
            Ok(Dispatch::NoDestination) => metrics::record_dropped("no_destination"),
            Ok(Dispatch::Registered(_) | Dispatch::Ignored) => {}
            Err(e) => metrics::record_dropped(e.error_code()),
        }
        result
    }

    fn dispatch(&mut self, raw: &[u8]) -> RelayResult<Dispatch> {
        if self.state.is_closed() {
            return Ok(Dispatch::Ignored);
        }

        let frame = Frame::parse(raw)?;

        // Only the first claim registers; later claims fall through to
        // forwarding untouched.
        if self.state.is_unregistered()
            && let Some(id) = frame.registration_id()
        {
            let id = id.to_owned();
            return Ok(self.register(id));
        }

        self.forward(frame.into_envelope())
    }

    fn register(&mut self, id: ClientId) -> Dispatch {
        self.state.register(id.clone());
        if let Some(previous) = self.registry.register(id.clone(), self.handle.clone()) {
            debug!(
                client_id = %id,
                previous = %previous.id(),
                "Client id taken over from another connection"
            );
        }
        metrics::set_registered_clients(self.registry.len());
        info!(client_id = %id, "Client registered");
        Dispatch::Registered(id)
    }

    fn forward(&self, envelope: Envelope) -> RelayResult<Dispatch> {
        let Some(to) = envelope.destination().map(str::to_owned) else {
            return Ok(Dispatch::NoDestination);
        };

        let target = self
            .registry
            .lookup(&to)
            .ok_or_else(|| RelayError::UnknownDestination(to.clone()))?;
        if !target.is_open() {
            return Err(RelayError::DestinationClosed(to));
        }

        debug!(from = ?envelope.sender(), to = %to, "Forwarding message");
        if !target.send(envelope.into_forwarded().encode()) {
            // Closed between the check and the send.
            return Err(RelayError::DestinationClosed(to));
        }
        Ok(Dispatch::Forwarded { to })
    }

    /// Handle the connection's closure.
    ///
    /// Returns the identifier the connection held, if any, after removing
    /// its registry entry. The removal is unconditional, so closing a
    /// connection whose id was taken over also unregisters the newer one.
    pub fn on_close(&mut self) -> Option<ClientId> {
        let id = self.state.close()?;
        if let Some(current) = self.registry.remove(&id)
            && current.id() != self.handle.id()
        {
            debug!(
                client_id = %id,
                owner = %current.id(),
                "Removed entry held by a newer connection"
            );
        }
        metrics::set_registered_clients(self.registry.len());
        info!(client_id = %id, "Client disconnected");
        Some(id)
    }

    /// Report a transport-level error. Cleanup happens in [`Router::on_close`].
    pub fn on_error(&self, error: &dyn std::error::Error) {
        warn!(client_id = ?self.state.client_id(), error = %error, "Transport error");
    }
}
