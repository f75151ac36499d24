use std::fmt;

use labkit_primitives::{InstanceId, ToolId};
use labkit_views::{Frame, Presentation};

/// A freshly constructed tool: the presentation and the controller it owns.
///
/// Dropping the instance drops both, releasing the presentation's
/// subscription.
pub struct ToolInstance {
    tool_id: ToolId,
    display_name: String,
    presentation: Box<dyn Presentation>,
}

impl ToolInstance {
    pub(crate) fn new(tool_id: ToolId, display_name: String, presentation: Box<dyn Presentation>) -> Self {
        Self {
            tool_id,
            display_name,
            presentation,
        }
    }

    /// Registry id the instance was created from.
    #[must_use]
    pub fn tool_id(&self) -> &ToolId {
        &self.tool_id
    }

    /// Identifier of this particular instance.
    #[must_use]
    pub fn instance_id(&self) -> InstanceId {
        self.presentation.instance_id()
    }

    /// Display name from the registration.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The presentation surface.
    #[must_use]
    pub fn presentation(&self) -> &dyn Presentation {
        self.presentation.as_ref()
    }

    /// Mutable access to the presentation surface, for forwarding edits.
    pub fn presentation_mut(&mut self) -> &mut dyn Presentation {
        self.presentation.as_mut()
    }

    /// Renders the current frame.
    pub fn render(&mut self) -> Frame {
        self.presentation.render()
    }
}

impl fmt::Debug for ToolInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolInstance")
            .field("tool_id", &self.tool_id)
            .field("instance_id", &self.instance_id())
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}
