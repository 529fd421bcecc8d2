//! Unified error handling for sigrelay.
//!
//! Every relay error is recoverable: it is logged and counted, the frame
//! that caused it is discarded, and the connection stays open. The protocol
//! has no error frame, so nothing here is ever sent back to a client.

use crate::state::ClientId;
use sigrelay_proto::ProtocolError;
use thiserror::Error;

/// Errors raised while routing one inbound frame.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The frame is not a JSON object.
    #[error("malformed frame: {0}")]
    Malformed(#[from] ProtocolError),

    /// Nobody is registered under the destination id.
    #[error("client {0} not found")]
    UnknownDestination(ClientId),

    /// The destination is registered but its connection is no longer open.
    #[error("client {0} not connected")]
    DestinationClosed(ClientId),
}

impl RelayError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed",
            Self::UnknownDestination(_) => "unknown_destination",
            Self::DestinationClosed(_) => "destination_closed",
        }
    }
}

/// Result type for frame routing.
pub type RelayResult<T> = Result<T, RelayError>;
