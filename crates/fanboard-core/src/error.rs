//! Error types for fanboard-core

use thiserror::Error;

/// Result type alias using fanboard-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in fanboard-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// A submitted field failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Local store error
    #[error("Storage error: {0}")]
    Storage(String),

    /// `SQLite` error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
