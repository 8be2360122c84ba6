//! Error types for credence

use thiserror::Error;

/// Result type alias for credence operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for credence
///
/// These are programmer-error and infrastructure conditions. Routine
/// authentication failures are not errors; they are carried as values in
/// [`crate::AuthOutcome`].
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration detected at startup
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid parameter passed to an operation
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Cryptographic operation failed
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Storage error from a lookup collaborator
    #[error("Storage error: {0}")]
    Storage(String),

    /// Resource already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Session error
    #[error("Session error: {0}")]
    Session(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Storage(_) | Error::Other(_))
    }

    /// Check if this error is a client error (4xx-like)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidParameter(_) | Error::AlreadyExists(_) | Error::NotFound(_)
        )
    }

    /// Check if this error is a server error (5xx-like)
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Error::Configuration(_)
                | Error::Crypto(_)
                | Error::Storage(_)
                | Error::Session(_)
                | Error::Json(_)
                | Error::Other(_)
        )
    }
}
