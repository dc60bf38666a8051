//! Error types for the sync server.

use pagesync_core::CoreError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the sync server.
///
/// Bad viewer input never produces one of these; it is dropped or answered
/// with a `REJECTED` message.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Core configuration error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// WebSocket handshake or framing error.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// The viewer did not finish the WebSocket upgrade in time.
    #[error("websocket handshake timed out")]
    HandshakeTimeout,

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Returns true if the error only concerns one connection.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            ServerError::WebSocket(_) | ServerError::HandshakeTimeout
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_classification() {
        assert!(ServerError::WebSocket(tungstenite::Error::ConnectionClosed).is_connection_error());
        assert!(ServerError::HandshakeTimeout.is_connection_error());
        assert!(!ServerError::InvalidConfig("bad".into()).is_connection_error());
    }

    #[test]
    fn core_errors_pass_through() {
        let err = ServerError::from(CoreError::invalid_config("page_size must be greater than zero"));
        assert_eq!(
            err.to_string(),
            "invalid configuration: page_size must be greater than zero"
        );
    }
}
