//! Errors raised at the wire boundary, before any resolver runs.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The payload is not valid JSON or does not match any request kind
    #[error("Malformed request: {0}")]
    Malformed(String),

    /// The response could not be serialized
    #[error("Failed to encode response: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            ProtocolError::Encode(err.to_string())
        } else {
            ProtocolError::Malformed(err.to_string())
        }
    }
}
