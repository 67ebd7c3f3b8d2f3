//! Presence error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PresenceError {
    #[error("Client not connected")]
    NotConnected,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Handshake timed out after {0:?}")]
    HandshakeTimeout(std::time::Duration),

    #[error("Send failed: {0}")]
    Send(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type PresenceResult<T> = Result<T, PresenceError>;
