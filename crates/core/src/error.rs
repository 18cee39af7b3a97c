//! Unified error types for city-compare.
//!
//! Display strings carry an upper-case code prefix so log lines and CLI
//! output can be grepped by failure class.

use std::path::PathBuf;

use tokio_rusqlite::rusqlite;

/// Unified error type shared by the core, client and CLI crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., an empty endpoint).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// City is not part of the configured state.
    #[error("INVALID_CITY: {0}")]
    InvalidCity(String),

    /// Cache file could not be written.
    #[error("CACHE_ERROR: failed to write {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cache mapping could not be serialized.
    #[error("CACHE_ERROR: failed to serialize cache: {0}")]
    CacheSerialize(#[from] serde_json::Error),

    /// Network failure before a response was received.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// HTTP error response (non-2xx).
    #[error("HTTP_ERROR: {url} returned status {status}")]
    HttpError { url: String, status: u16 },

    /// Response body could not be parsed.
    #[error("PARSE_ERROR: {0}")]
    Parse(String),

    /// Input file (e.g., the city list) could not be read.
    #[error("IO_ERROR: {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// Database operation failed.
    #[error("DATABASE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("DATABASE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Configuration was rejected.
    #[error("CONFIG_ERROR: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
