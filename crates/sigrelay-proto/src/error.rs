//! Error types for the relay wire format.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Reasons a raw frame cannot be turned into a [`Frame`](crate::Frame).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// The bytes are not valid JSON (this includes invalid UTF-8).
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The bytes are valid JSON but not an object.
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

impl ProtocolError {
    /// Short description of a JSON value's kind, for error reporting.
    pub(crate) fn kind_of(value: &serde_json::Value) -> &'static str {
        match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "a boolean",
            serde_json::Value::Number(_) => "a number",
            serde_json::Value::String(_) => "a string",
            serde_json::Value::Array(_) => "an array",
            serde_json::Value::Object(_) => "an object",
        }
    }
}
