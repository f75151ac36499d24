//! The host shell: a start menu and a workspace holding at most one tool.

#![warn(missing_docs, clippy::pedantic)]

mod builtin;
mod shell;

pub use builtin::{BEER_LAMBERT, THERMODYNAMICS, register_builtin_tools, register_configured_tools};
pub use shell::HostShell;
