//! What the registry stores per tool.

use std::fmt;
use std::sync::Arc;

use labkit_primitives::ToolId;
use labkit_views::Presentation;

/// Builds a fresh, fully wired presentation (and the controller it owns).
///
/// Implemented for every `Fn() -> P` closure where `P` is a presentation, so
/// most registrations pass a closure.
pub trait ToolFactory: Send + Sync {
    /// Constructs a new instance. Never returns a cached one.
    fn create(&self) -> Box<dyn Presentation>;
}

impl<F, P> ToolFactory for F
where
    F: Fn() -> P + Send + Sync,
    P: Presentation + 'static,
{
    fn create(&self) -> Box<dyn Presentation> {
        Box::new(self())
    }
}

/// A registered tool: its id, menu text and factory.
pub struct ToolDescriptor {
    id: ToolId,
    display_name: String,
    description: Option<String>,
    factory: Arc<dyn ToolFactory>,
}

impl ToolDescriptor {
    /// Registry key.
    #[must_use]
    pub fn id(&self) -> &ToolId {
        &self.id
    }

    /// Human-readable name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Optional menu description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub(crate) fn build(&self) -> Box<dyn Presentation> {
        self.factory.create()
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Builder for a registration, used when a tool carries a description.
pub struct ToolRegistration {
    id: String,
    display_name: String,
    description: Option<String>,
    factory: Arc<dyn ToolFactory>,
}

impl ToolRegistration {
    /// Starts a registration. The id is validated when registered.
    pub fn new<F>(id: impl Into<String>, display_name: impl Into<String>, factory: F) -> Self
    where
        F: ToolFactory + 'static,
    {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: None,
            factory: Arc::new(factory),
        }
    }

    /// Sets the menu description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn into_descriptor(self) -> labkit_primitives::Result<ToolDescriptor> {
        Ok(ToolDescriptor {
            id: ToolId::new(self.id)?,
            display_name: self.display_name,
            description: self.description,
            factory: self.factory,
        })
    }
}

impl fmt::Debug for ToolRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistration")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
