//! Directed envelopes and the frames forwarded to their destination.

use serde_json::Value;

use crate::frame::non_empty_str;
use crate::{Fields, FROM_FIELD, TO_FIELD};

/// A directed frame split into its routing fields and opaque payload.
///
/// `to` only counts as a destination when it is a non-empty string.
/// `from` is whatever the sender wrote; it is never checked against the
/// sender's registered identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    to: Option<String>,
    from: Option<Value>,
    data: Fields,
}

impl Envelope {
    /// Split a field map, keeping the payload fields in their original order.
    pub fn from_fields(mut fields: Fields) -> Self {
        let to = fields.shift_remove(TO_FIELD);
        let from = fields.shift_remove(FROM_FIELD);
        let to = non_empty_str(to.as_ref()).map(str::to_owned);
        Self {
            to,
            from,
            data: fields,
        }
    }

    /// Start building an envelope addressed to `destination`.
    pub fn to(destination: impl Into<String>) -> Self {
        Self {
            to: Some(destination.into()),
            ..Self::default()
        }
    }

    /// Set the sender field.
    pub fn with_from(mut self, from: impl Into<Value>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Append a payload field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// The destination identifier, if there is one to route to.
    pub fn destination(&self) -> Option<&str> {
        self.to.as_deref()
    }

    /// The sender field exactly as supplied.
    pub fn sender(&self) -> Option<&Value> {
        self.from.as_ref()
    }

    /// Payload fields (everything except `to` and `from`).
    pub fn data(&self) -> &Fields {
        &self.data
    }

    /// Encode as a directed frame (`to`, `from`, then payload).
    pub fn encode(self) -> String {
        let mut fields = Fields::with_capacity(self.data.len() + 2);
        if let Some(to) = self.to {
            fields.insert(TO_FIELD.to_owned(), Value::String(to));
        }
        if let Some(from) = self.from {
            fields.insert(FROM_FIELD.to_owned(), from);
        }
        fields.extend(self.data);
        Value::Object(fields).to_string()
    }

    /// Drop the destination and produce the frame the destination receives.
    pub fn into_forwarded(self) -> Forwarded {
        let mut fields = Fields::with_capacity(self.data.len() + 1);
        if let Some(from) = self.from {
            fields.insert(FROM_FIELD.to_owned(), from);
        }
        fields.extend(self.data);
        Forwarded { fields }
    }
}

/// A frame as delivered to the destination: `from` followed by the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Forwarded {
    fields: Fields,
}

impl Forwarded {
    /// Fields of the forwarded frame.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Serialize to the JSON text sent on the wire.
    pub fn encode(self) -> String {
        Value::Object(self.fields).to_string()
    }
}
