//! Error types for the protocol codec.

use thiserror::Error;

/// Result type for codec operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors produced while decoding or encoding messages.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The text is not a JSON object with a string `type` field.
    #[error("message has no type")]
    MissingType,

    /// The `type` field names no known message.
    #[error("unknown message type: {0}")]
    UnknownType(String),

    /// The message is not valid JSON or its fields do not match its type.
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ProtocolError {
    /// Returns true for messages that should be ignored without reply even
    /// when rejection replies are enabled.
    pub fn is_unknown_type(&self) -> bool {
        matches!(self, ProtocolError::UnknownType(_))
    }
}
