//! Error types for secureshare.

use thiserror::Error;

/// Common error type for secureshare.
#[derive(Error, Debug)]
pub enum ShareError {
    /// Invalid or missing configuration. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// Upload filename is empty, absent, or escapes the storage root.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Blob storage failure (write, mkdir, delete).
    #[error("{0}")]
    Storage(String),

    /// Request value out of the accepted range.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Database error.
    ///
    /// Database errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Capability that is part of the interface but has no implementation yet.
    #[error("not implemented: {0}")]
    Unimplemented(&'static str),
}

impl From<sqlx::Error> for ShareError {
    fn from(e: sqlx::Error) -> Self {
        ShareError::Database(e.to_string())
    }
}

/// Result type alias for secureshare operations.
pub type Result<T> = std::result::Result<T, ShareError>;
