//! Error types for the data-store client

use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Data-store client errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// HTTP request failed (connect, timeout, TLS, body decode)
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing required secret in the environment
    #[error("Missing required secret: {0}")]
    MissingSecret(String),

    /// Store returned an error response
    #[error("Store error ({status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Error message from the store
        message: String,
    },

    /// Store returned a response the client could not interpret
    #[error("Unexpected store response: {0}")]
    UnexpectedResponse(String),
}

impl StoreError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing secret error
    pub fn missing_secret(var: impl Into<String>) -> Self {
        Self::MissingSecret(var.into())
    }

    /// Create a rejected-response error
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Check if this error came from the transport layer
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if the store rejected the request for auth reasons
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Rejected { status, .. } if *status == 401 || *status == 403)
    }

    /// Status code of a store-side rejection, if any
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
