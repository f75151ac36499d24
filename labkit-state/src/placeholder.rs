//! Controller for tools that are listed but not implemented yet.

use labkit_calc::CalcError;
use labkit_primitives::{InstanceId, ToolId};

use crate::controller::{FieldValue, ToolController};
use crate::event::SubscriptionId;
use crate::notifier::{Listener, Notifier};
use crate::{StateError, StateResult};

/// A stateless controller: no fields, no modes, never emits.
#[derive(Debug)]
pub struct PlaceholderController {
    tool_id: ToolId,
    instance_id: InstanceId,
    notifier: Notifier,
}

impl PlaceholderController {
    /// Creates a placeholder for `tool_id`.
    #[must_use]
    pub fn new(tool_id: ToolId) -> Self {
        Self {
            tool_id,
            instance_id: InstanceId::random(),
            notifier: Notifier::new(),
        }
    }
}

impl ToolController for PlaceholderController {
    fn tool_id(&self) -> &ToolId {
        &self.tool_id
    }

    fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    fn set_mode(&mut self, mode: &str) -> StateResult<bool> {
        Err(StateError::UnknownMode {
            tool: self.tool_id.clone(),
            mode: mode.to_owned(),
        })
    }

    fn inputs(&self) -> Vec<FieldValue> {
        Vec::new()
    }

    fn outputs(&self) -> Vec<FieldValue> {
        Vec::new()
    }

    fn set_input(&mut self, field: &str, _value: f64) -> StateResult<bool> {
        Err(StateError::UnknownField {
            tool: self.tool_id.clone(),
            field: field.to_owned(),
        })
    }

    fn last_error(&self) -> Option<&CalcError> {
        None
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        self.notifier.subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }
}
