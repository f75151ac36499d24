//! Core shared types for labkit tool hosts.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod ids;
mod tool_id;

/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Identifier of a single constructed tool instance.
pub use ids::InstanceId;
/// Stable identifier used to register and look up tools.
pub use tool_id::ToolId;
