use labkit_state::StateError;
use thiserror::Error;

/// Errors returned when a user edit cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// The entered text is not a number.
    #[error("`{text}` is not a valid number for {field}")]
    InvalidNumber {
        /// Field being edited.
        field: String,
        /// Text the user entered.
        text: String,
    },
    /// The controller refused the edit.
    #[error(transparent)]
    State(#[from] StateError),
}

/// Result alias for presentation operations.
pub type ViewResult<T> = Result<T, ViewError>;
