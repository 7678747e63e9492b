//! Error types for the phone-cluster registry

use thiserror::Error;

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the phone-cluster registry
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed or missing required input (client-caused)
    #[error("missing or invalid '{0}'")]
    InvalidArgument(&'static str),

    /// Referenced client does not exist
    #[error("client not found: {0}")]
    NotFound(String),

    /// Generated id collided with an existing row
    #[error("duplicate client id: {0}")]
    DuplicateKey(String),

    /// Database error (pool, storage medium)
    #[error("database error: {0}")]
    Database(String),

    /// `SQLite` error
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
