//! Error types for the scene driver.

use thiserror::Error;

/// Result type for scene operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a scene.
#[derive(Debug, Error)]
pub enum Error {
    /// The profile cannot be animated
    #[error("growth error: {0}")]
    Growth(#[from] wealthpile_growth::Error),

    /// The unit count cannot be laid out
    #[error("layout error: {0}")]
    Layout(#[from] wealthpile_layout::Error),

    /// A setting is present but unusable
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Wealth service request failed
    #[error("wealth fetch failed: {0}")]
    Fetch(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Fetch(e.to_string())
    }
}
