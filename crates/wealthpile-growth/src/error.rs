//! Error types for the growth model.

use thiserror::Error;

/// Result type for growth computations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the growth model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The profile cannot drive a growth computation.
    #[error("invalid profile {id}: {reason}")]
    InvalidProfile { id: String, reason: &'static str },

    /// A unit value must be a positive, finite number of dollars.
    #[error("invalid unit value: {0}")]
    InvalidUnitValue(f64),
}
