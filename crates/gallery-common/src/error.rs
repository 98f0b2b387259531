//! Common error types used throughout gallery.
//!
//! This module provides a unified error type that covers the failure cases of
//! the gallery core: missing records, unauthenticated viewers, bad uploads,
//! and storage failures.

/// Common error type for gallery.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested image does not exist, or its token could not be decoded.
    #[error("Item not found: {0}")]
    NotFound(String),

    /// The operation needs a signed-in viewer and none was resolved.
    #[error("Unauthorized")]
    Unauthorized,

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided (e.g. an upload without image data).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error comes from the storage layer rather than the caller.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Io(_) | Self::Internal(_))
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
