//! Common error types for the Late Show API

use thiserror::Error;

/// Common result type for Late Show operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the store, validation and API layers
#[derive(Error, Debug)]
pub enum Error {
    /// A field invariant was violated before the record reached the store
    #[error("{0}")]
    Validation(String),

    /// Referenced record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Record would duplicate an existing one (guest already on episode)
    #[error("{0}")]
    Conflict(String),

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build a validation error from any message
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}
