//! The id → descriptor table.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use labkit_primitives::ToolId;
use tracing::{debug, info, warn};

use crate::descriptor::{ToolDescriptor, ToolFactory, ToolRegistration};
use crate::instance::ToolInstance;
use crate::menu::ToolMenu;
use crate::{RegistryError, RegistryResult};

#[derive(Default)]
struct Inner {
    order: Vec<Arc<ToolDescriptor>>,
    index: HashMap<ToolId, usize>,
}

/// Registry of available tools, keyed by [`ToolId`].
///
/// Registration is append-only and a duplicate id is rejected without
/// touching the existing entry. Lookups take a read lock only long enough to
/// clone the descriptor handle, so factories run unlocked.
#[derive(Default)]
pub struct ToolRegistry {
    inner: RwLock<Inner>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let ids: Vec<&str> = inner.order.iter().map(|d| d.id().as_str()).collect();
        f.debug_struct("ToolRegistry").field("registered", &ids).finish()
    }
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry, created empty on first use.
    pub fn global() -> &'static ToolRegistry {
        static GLOBAL: OnceLock<ToolRegistry> = OnceLock::new();
        GLOBAL.get_or_init(ToolRegistry::new)
    }

    /// Registers a tool under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidToolId`] for a malformed id and
    /// [`RegistryError::DuplicateToolId`] if the id is taken. The registry is
    /// unchanged on failure.
    pub fn register<F>(
        &self,
        id: &str,
        display_name: impl Into<String>,
        factory: F,
    ) -> RegistryResult<()>
    where
        F: ToolFactory + 'static,
    {
        self.register_tool(ToolRegistration::new(id, display_name, factory))
    }

    /// Registers a prepared [`ToolRegistration`].
    ///
    /// # Errors
    ///
    /// Same as [`ToolRegistry::register`].
    pub fn register_tool(&self, registration: ToolRegistration) -> RegistryResult<()> {
        let descriptor = registration.into_descriptor()?;
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.index.contains_key(descriptor.id()) {
            warn!(tool = %descriptor.id(), "duplicate tool registration rejected");
            return Err(RegistryError::DuplicateToolId {
                id: descriptor.id().clone(),
            });
        }

        debug!(tool = %descriptor.id(), name = descriptor.display_name(), "tool registered");
        let position = inner.order.len();
        inner.index.insert(descriptor.id().clone(), position);
        inner.order.push(Arc::new(descriptor));
        Ok(())
    }

    /// Builds a new, independent instance of the tool `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownToolId`] if nothing is registered under
    /// `id`.
    pub fn create(&self, id: &str) -> RegistryResult<ToolInstance> {
        let descriptor = self.descriptor(id).ok_or_else(|| RegistryError::UnknownToolId {
            id: id.to_owned(),
        })?;
        let instance = ToolInstance::new(
            descriptor.id().clone(),
            descriptor.display_name().to_owned(),
            descriptor.build(),
        );
        info!(tool = %instance.tool_id(), instance = %instance.instance_id(), "tool instance created");
        Ok(instance)
    }

    /// Registered tools in registration order. No factory is called.
    #[must_use]
    pub fn list(&self) -> ToolMenu {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        ToolMenu::new(inner.order.iter().cloned().collect())
    }

    /// Display name of `id`, if registered.
    #[must_use]
    pub fn display_name(&self, id: &str) -> Option<String> {
        self.descriptor(id).map(|d| d.display_name().to_owned())
    }

    /// Returns `true` if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.descriptor(id).is_some()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn descriptor(&self, id: &str) -> Option<Arc<ToolDescriptor>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let position = *inner.index.get(id)?;
        inner.order.get(position).cloned()
    }
}
