//! Tool registration and on-demand construction.
//!
//! Hosts register every available tool once at startup, then read the
//! registry to populate a menu and to build a fresh instance whenever the user
//! selects a tool. Nothing is constructed at registration time.

#![warn(missing_docs, clippy::pedantic)]

mod descriptor;
mod error;
mod instance;
mod menu;
mod registry;

pub use descriptor::{ToolDescriptor, ToolFactory, ToolRegistration};
pub use error::{RegistryError, RegistryResult};
pub use instance::ToolInstance;
pub use menu::{MenuEntry, ToolMenu};
pub use registry::ToolRegistry;
