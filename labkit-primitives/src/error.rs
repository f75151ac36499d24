//! Error type for the primitive constructors.

use thiserror::Error;

/// Result alias used by the primitive types.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while constructing primitive types.
#[derive(Debug, Error)]
pub enum Error {
    /// Tool identifier failed validation.
    #[error("invalid tool id `{id}`: {reason}")]
    InvalidToolId {
        /// The offending identifier string.
        id: String,
        /// Why it was rejected.
        reason: String,
    },
}
