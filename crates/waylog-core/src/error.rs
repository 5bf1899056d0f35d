//! Error types for waylog-core

use thiserror::Error;

/// Result type alias using waylog-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in waylog-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Entry not found
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote record parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Remote store error
    #[error("Remote error: {0}")]
    Remote(String),

    /// Remote store HTTP transport error
    #[error("Remote HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}
