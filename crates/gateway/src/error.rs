//! Error types for the gateway layer

use chatzen_chats::ChatError;
use chatzen_users::SessionError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Gateway error types
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl GatewayError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_frame(message: impl Into<String>) -> Self {
        Self::InvalidFrame(message.into())
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<GatewayError> for ChatError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Status { status, message } => ChatError::status(status, message),
            GatewayError::Http(err) => ChatError::transport(err.to_string()),
            GatewayError::WebSocket(err) => ChatError::channel(err.to_string()),
            GatewayError::InvalidFrame(message) => ChatError::channel(message),
            GatewayError::Serialization(err) => ChatError::Serialization(err),
            GatewayError::Session(err) => ChatError::Session(err),
        }
    }
}
