//! Exchange adapter error types
//!
//! All exchange-related errors are wrapped in the ExchangeError enum
//! which implements thiserror for consistent error handling.

use thiserror::Error;

use crate::adapters::types::ExchangeSite;

/// Exchange-specific error types for adapter operations
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Connection to exchange failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request failed (network or status)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid or unexpected response from exchange
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// WebSocket protocol error (boxed to reduce enum size)
    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    /// The exchange has no streaming endpoint
    #[error("{0} does not support streaming updates")]
    StreamingUnsupported(ExchangeSite),
}

/// Result type alias for exchange operations
pub type ExchangeResult<T> = std::result::Result<T, ExchangeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_display() {
        let err = ExchangeError::ConnectionFailed("timeout".to_string());
        assert_eq!(err.to_string(), "Connection failed: timeout");
    }

    #[test]
    fn test_invalid_response_display() {
        let err = ExchangeError::InvalidResponse("malformed JSON".to_string());
        assert_eq!(err.to_string(), "Invalid response: malformed JSON");
    }

    #[test]
    fn test_streaming_unsupported_display() {
        let err = ExchangeError::StreamingUnsupported(ExchangeSite::Kraken);
        assert_eq!(err.to_string(), "Kraken does not support streaming updates");
    }
}
