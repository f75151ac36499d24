use std::sync::Arc;

use labkit_primitives::ToolId;
use serde::Serialize;

use crate::descriptor::ToolDescriptor;

/// One start-menu line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    /// Id to pass to [`ToolRegistry::create`](crate::ToolRegistry::create).
    pub id: ToolId,
    /// Human-readable name.
    pub display_name: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Lazy iterator over the registered tools in registration order.
///
/// Holds a snapshot taken when [`ToolRegistry::list`](crate::ToolRegistry::list)
/// was called; later registrations are not seen. Clone it to iterate again.
#[derive(Debug, Clone)]
pub struct ToolMenu {
    entries: Arc<[Arc<ToolDescriptor>]>,
    next: usize,
}

impl ToolMenu {
    pub(crate) fn new(entries: Arc<[Arc<ToolDescriptor>]>) -> Self {
        Self { entries, next: 0 }
    }
}

impl Iterator for ToolMenu {
    type Item = MenuEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let descriptor = self.entries.get(self.next)?;
        self.next += 1;
        Some(MenuEntry {
            id: descriptor.id().clone(),
            display_name: descriptor.display_name().to_owned(),
            description: descriptor.description().map(str::to_owned),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ToolMenu {}
