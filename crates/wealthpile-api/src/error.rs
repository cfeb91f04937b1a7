//! Error types for the wealth data service.

use thiserror::Error;

/// Result type for data service operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while acquiring or caching wealth figures.
#[derive(Debug, Error)]
pub enum Error {
    /// A required setting is absent
    #[error("configuration missing: {0}")]
    ConfigurationMissing(&'static str),

    /// A setting is present but unusable
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Network failure or non-success status from a remote service
    #[error("remote fetch failed: {0}")]
    RemoteFetchFailed(String),

    /// A remote response did not have the expected shape
    #[error("parse failure: {message}")]
    ParseFailure {
        message: String,
        /// Field names seen on the record, for diagnostics
        fields: Vec<String>,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::RemoteFetchFailed(e.to_string())
    }
}
