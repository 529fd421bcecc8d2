//! Inbound frame parsing and classification.
//!
//! A [`Frame`] is any JSON object received from a client. Whether it is
//! treated as a registration or as a directed envelope depends on the
//! connection's state, which lives in the server; this module only exposes
//! the field extraction both paths need.

use serde_json::Value;

use crate::envelope::Envelope;
use crate::error::{ProtocolError, Result};
use crate::{Fields, CLIENT_ID_FIELD};

/// A parsed inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    fields: Fields,
}

impl Frame {
    /// Parse a raw text or binary payload.
    ///
    /// Fails with [`ProtocolError::Json`] on anything that is not JSON and
    /// with [`ProtocolError::NotAnObject`] on JSON scalars and arrays.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        match serde_json::from_slice::<Value>(raw)? {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ProtocolError::NotAnObject(ProtocolError::kind_of(&other))),
        }
    }

    /// Wrap an already-decoded field map.
    pub fn from_fields(fields: Fields) -> Self {
        Self { fields }
    }

    /// The identifier claimed by this frame, if it carries a non-empty
    /// string `client_id`.
    pub fn registration_id(&self) -> Option<&str> {
        non_empty_str(self.fields.get(CLIENT_ID_FIELD))
    }

    /// All fields, in the order they were received.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Split the frame into destination, sender and payload.
    pub fn into_envelope(self) -> Envelope {
        Envelope::from_fields(self.fields)
    }
}

/// Encode a registration frame for `client_id`.
pub fn encode_registration(client_id: &str) -> String {
    let mut fields = Fields::new();
    fields.insert(CLIENT_ID_FIELD.to_owned(), Value::from(client_id));
    Value::Object(fields).to_string()
}

pub(crate) fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
