use labkit_primitives::ToolId;
use thiserror::Error;

/// Errors produced by registration and lookup.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The id is not a valid tool identifier.
    #[error(transparent)]
    InvalidToolId(#[from] labkit_primitives::Error),

    /// A tool with this id is already registered.
    #[error("tool `{id}` is already registered")]
    DuplicateToolId {
        /// Id of the rejected registration.
        id: ToolId,
    },

    /// No tool with this id is registered.
    #[error("tool `{id}` is not registered")]
    UnknownToolId {
        /// Id the caller asked for.
        id: String,
    },
}

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
