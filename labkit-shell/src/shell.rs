use std::fmt::Write as _;

use labkit_config::{DEFAULT_APP_TITLE, ShellConfig};
use labkit_registry::{RegistryResult, ToolInstance, ToolMenu, ToolRegistry};
use tracing::{info, warn};

/// Start menu plus a single-tool workspace.
///
/// Opening a tool builds a fresh instance through the registry and discards
/// whatever was open before; returning home discards it as well.
#[derive(Debug)]
pub struct HostShell<'r> {
    registry: &'r ToolRegistry,
    app_title: String,
    current: Option<ToolInstance>,
}

impl<'r> HostShell<'r> {
    /// Creates a shell showing the start menu.
    #[must_use]
    pub fn new(registry: &'r ToolRegistry) -> Self {
        Self {
            registry,
            app_title: DEFAULT_APP_TITLE.to_owned(),
            current: None,
        }
    }

    /// Creates a shell using the title from `config`. If `config` names a
    /// default tool, it is opened right away; an unavailable default is logged
    /// and the start menu is shown instead.
    #[must_use]
    pub fn with_config(registry: &'r ToolRegistry, config: &ShellConfig) -> Self {
        let mut shell = Self {
            registry,
            app_title: config.app_title.clone(),
            current: None,
        };
        if let Some(tool) = &config.default_tool {
            shell.open(tool).ok();
        }
        shell
    }

    /// Menu entries in registration order.
    #[must_use]
    pub fn menu(&self) -> ToolMenu {
        self.registry.list()
    }

    /// Builds the tool `id` and mounts it, dropping the previous tool.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownToolId`](labkit_registry::RegistryError::UnknownToolId)
    /// if `id` is not registered. The current workspace is left as it was.
    pub fn open(&mut self, id: &str) -> RegistryResult<&mut ToolInstance> {
        let instance = self.registry.create(id).inspect_err(|err| {
            warn!(tool = id, error = %err, "tool unavailable");
        })?;
        info!(tool = %instance.tool_id(), instance = %instance.instance_id(), "tool mounted");
        Ok(self.current.insert(instance))
    }

    /// Closes the open tool, if any, and shows the start menu. Returns `true`
    /// if a tool was closed.
    pub fn home(&mut self) -> bool {
        match self.current.take() {
            Some(instance) => {
                info!(tool = %instance.tool_id(), instance = %instance.instance_id(), "tool closed");
                true
            }
            None => false,
        }
    }

    /// Window title: the app title, followed by the open tool's name.
    #[must_use]
    pub fn title(&self) -> String {
        match &self.current {
            Some(tool) => format!("{} - {}", self.app_title, tool.display_name()),
            None => self.app_title.clone(),
        }
    }

    /// The open tool.
    #[must_use]
    pub fn current(&self) -> Option<&ToolInstance> {
        self.current.as_ref()
    }

    /// The open tool, mutably.
    pub fn current_mut(&mut self) -> Option<&mut ToolInstance> {
        self.current.as_mut()
    }

    /// Renders the workspace as text: the open tool's frame, or the start menu.
    pub fn render(&mut self) -> String {
        if let Some(tool) = &mut self.current {
            return tool.render().to_string();
        }
        let mut out = format!("== {} ==\n", self.app_title);
        for entry in self.registry.list() {
            let _ = write!(out, "  {:<16} {}", entry.id.as_str(), entry.display_name);
            if let Some(description) = &entry.description {
                let _ = write!(out, " - {description}");
            }
            out.push('\n');
        }
        out
    }
}
