//! # sigrelay-proto
//!
//! Wire format for the sigrelay signaling relay.
//!
//! Every frame is a JSON object. Three shapes exist:
//!
//! - **Registration** (client -> server): `{"client_id": "alice"}`
//! - **Directed** (client -> server): `{"to": "bob", "from": "alice", ...payload}`
//! - **Forwarded** (server -> client): `{"from": "alice", ...payload}`
//!
//! The payload is never interpreted. Unknown fields pass through in their
//! original order.
//!
//! ## Parsing
//!
//! ```rust
//! use sigrelay_proto::Frame;
//!
//! let frame = Frame::parse(br#"{"to":"bob","from":"alice","type":"offer"}"#).unwrap();
//! assert_eq!(frame.registration_id(), None);
//!
//! let envelope = frame.into_envelope();
//! assert_eq!(envelope.destination(), Some("bob"));
//! assert_eq!(envelope.into_forwarded().encode(), r#"{"from":"alice","type":"offer"}"#);
//! ```
//!
//! ## Building
//!
//! ```rust
//! use sigrelay_proto::{encode_registration, Envelope};
//!
//! let hello = encode_registration("alice");
//! let offer = Envelope::to("bob").with_from("alice").with_field("sdp", "v=0").encode();
//! # let _ = (hello, offer);
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod envelope;
pub mod error;
pub mod frame;

pub use self::envelope::{Envelope, Forwarded};
pub use self::error::{ProtocolError, Result};
pub use self::frame::{encode_registration, Frame};

/// Ordered bag of JSON fields carried by a frame.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Field carrying the identifier in a registration frame.
pub const CLIENT_ID_FIELD: &str = "client_id";

/// Field naming the destination of a directed frame.
pub const TO_FIELD: &str = "to";

/// Field naming the (unverified) sender of a directed or forwarded frame.
pub const FROM_FIELD: &str = "from";
