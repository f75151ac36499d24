//! Laboratory calculator toolkit facade.
//!
//! Depend on this crate via `cargo add labkit`. It bundles the workspace crates
//! behind feature flags so hosts can pull in only the calculation layer, or
//! the whole registry-and-shell stack.

#![warn(missing_docs, clippy::pedantic)]

/// Shared identifiers and errors.
pub use labkit_primitives as primitives;

/// Pure calculation functions.
pub use labkit_calc as calc;

/// Reactive tool controllers (enabled by `state` feature).
#[cfg(feature = "state")]
pub use labkit_state as state;

/// Presentations and frames (enabled by `views` feature).
#[cfg(feature = "views")]
pub use labkit_views as views;

/// Tool registry (enabled by `registry` feature).
#[cfg(feature = "registry")]
pub use labkit_registry as registry;

/// Host shell and built-in tools (enabled by `shell` feature).
#[cfg(feature = "shell")]
pub use labkit_shell as shell;

/// Configuration loading (enabled by `config` feature).
#[cfg(feature = "config")]
pub use labkit_config as config;

/// Tracing setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use labkit_telemetry as telemetry;
