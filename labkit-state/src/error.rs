//! Errors raised by controller operations.

use labkit_primitives::ToolId;
use thiserror::Error;

/// Errors emitted when a caller drives a controller incorrectly.
///
/// Domain errors from the calculation modules are not represented here: they are
/// caught by the controller and surfaced as
/// [`StateEvent::InvalidInput`](crate::StateEvent::InvalidInput).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The named field does not exist on this tool.
    #[error("tool `{tool}` has no field `{field}`")]
    UnknownField {
        /// Tool that rejected the edit.
        tool: ToolId,
        /// Name supplied by the caller.
        field: String,
    },
    /// The field is derived in the current mode and cannot be set.
    #[error("field `{field}` is computed in `{mode}` mode and cannot be set")]
    ReadOnlyField {
        /// Derived field name.
        field: &'static str,
        /// Active calculation mode.
        mode: &'static str,
    },
    /// The requested calculation mode does not exist on this tool.
    #[error("tool `{tool}` has no mode `{mode}`")]
    UnknownMode {
        /// Tool that rejected the mode.
        tool: ToolId,
        /// Mode supplied by the caller.
        mode: String,
    },
}

/// Result alias for controller operations.
pub type StateResult<T> = Result<T, StateError>;
