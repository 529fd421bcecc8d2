//! Connection - Handles an individual client connection.
//!
//! Each Connection runs in its own Tokio task:
//!
//! ```text
//!    ┌──────────────────────────────────────────────────┐
//!    │               Connection Task                    │
//!    │                                                  │
//!    │  ┌──────────────┐          ┌────────────────┐    │
//!    │  │ socket read  │          │  socket write  │    │
//!    │  └──────┬───────┘          └───────▲────────┘    │
//!    │         ▼                          │             │
//!    │    tokio::select! ◄────────── [Outgoing Queue] ◄─┼── other Routers
//!    │         │                                        │
//!    │         ▼                                        │
//!    │     [Router] ──────────▶ other connections' queues
//!    └──────────────────────────────────────────────────┘
//! ```
//!
//! Whatever ends the loop (close frame, transport error, server shutdown),
//! the close path runs exactly once afterwards.

use crate::error::RelayError;
use crate::handlers::{Dispatch, Router};
use crate::metrics;
use crate::state::{ConnectionHandle, ConnectionId, Registry};
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// A client connection handler.
pub struct Connection {
    id: ConnectionId,
    addr: SocketAddr,
    registry: Arc<Registry>,
    socket: WebSocket,
    shutdown: CancellationToken,
}

impl Connection {
    /// Create a new connection handler.
    pub fn new(
        id: ConnectionId,
        addr: SocketAddr,
        registry: Arc<Registry>,
        socket: WebSocket,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            id,
            addr,
            registry,
            socket,
            shutdown,
        }
    }

    /// Run the connection until the client leaves or the server shuts down.
    #[instrument(skip(self), fields(conn = %self.id, addr = %self.addr), name = "connection")]
    pub async fn run(self) {
        let Self {
            id,
            registry,
            socket,
            shutdown,
            ..
        } = self;

        metrics::connection_opened();
        info!("Client connected");

        let (handle, mut outgoing) = ConnectionHandle::channel(id);
        let mut router = Router::new(registry, handle);
        let (mut sink, mut stream) = socket.split();

        loop {
            tokio::select! {
                inbound = stream.next() => match inbound {
                    Some(Ok(Message::Text(text))) => route(&mut router, text.as_bytes()),
                    Some(Ok(Message::Binary(bytes))) => route(&mut router, &bytes),
                    // Answered by the transport.
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                    Some(Ok(Message::Close(frame))) => {
                        debug!(?frame, "Close frame received");
                        break;
                    }
                    Some(Err(e)) => {
                        router.on_error(&e);
                        break;
                    }
                    None => break,
                },
                Some(frame) = outgoing.recv() => {
                    if let Err(e) = sink.send(Message::Text(frame)).await {
                        router.on_error(&e);
                        break;
                    }
                }
                () = shutdown.cancelled() => {
                    debug!("Server shutting down");
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
            }
        }

        // Stop accepting frames before the registry entry goes away, so a
        // concurrent sender sees "not connected" rather than a silent drop.
        outgoing.close();
        router.on_close();
        metrics::connection_closed();
        info!("Connection closed");
    }
}

/// Hand one inbound frame to the router and log the outcome.
fn route(router: &mut Router, raw: &[u8]) {
    match router.on_message(raw) {
        Ok(Dispatch::NoDestination) => debug!("Frame without destination dropped"),
        Ok(_) => {}
        Err(e @ RelayError::Malformed(_)) => {
            warn!(error = %e, len = raw.len(), "Discarding malformed frame");
        }
        Err(e) => warn!(code = e.error_code(), error = %e, "Frame not delivered"),
    }
}
