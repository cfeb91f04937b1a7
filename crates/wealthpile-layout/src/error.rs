//! Error types for the layout engine.

use thiserror::Error;

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while laying out units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A pile must be able to hold at least one unit.
    #[error("pile capacity must be greater than zero")]
    ZeroCapacity,

    /// The requested layout does not fit in memory addressing.
    #[error("layout of {0} units is too large")]
    TooLarge(u64),
}
