//! The contract every tool controller satisfies.

use labkit_calc::{CalcError, Series};
use labkit_primitives::{InstanceId, ToolId};
use serde::Serialize;
use tracing::warn;

use crate::event::{StateEvent, SubscriptionId};
use crate::field::Field;
use crate::notifier::{Listener, Notifier};
use crate::StateResult;

/// Read-only view of one input or output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldValue {
    /// Machine-readable field name accepted by [`ToolController::set_input`].
    pub name: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Units, empty when dimensionless.
    pub units: &'static str,
    /// Current value.
    pub value: f64,
}

/// Serializable copy of a controller's visible state, for export collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    /// Tool the state belongs to.
    pub tool_id: ToolId,
    /// Instance the state belongs to.
    pub instance_id: InstanceId,
    /// Active calculation mode, if the tool has modes.
    pub mode: Option<&'static str>,
    /// Current inputs.
    pub inputs: Vec<FieldValue>,
    /// Current outputs.
    pub outputs: Vec<FieldValue>,
    /// Message of the last rejected calculation, if any.
    pub last_error: Option<String>,
}

/// Uniform interface presentations and the shell use to drive any tool.
///
/// Implementations hold all mutable state for one tool instance. Setting an
/// input to its current value must be a no-op; any other set stores the
/// value, recomputes outputs synchronously, and emits exactly one
/// [`StateEvent::StateChanged`] followed by one [`StateEvent::ResultComputed`]
/// per output whose value changed.
pub trait ToolController {
    /// Registry id of the tool.
    fn tool_id(&self) -> &ToolId;

    /// Identifier of this instance.
    fn instance_id(&self) -> InstanceId;

    /// Active mode name, if the tool has modes.
    fn mode(&self) -> Option<&'static str> {
        None
    }

    /// Names of the modes accepted by [`ToolController::set_mode`].
    fn modes(&self) -> &'static [&'static str] {
        &[]
    }

    /// Switches the calculation mode. Returns `true` if the mode changed.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::UnknownMode`](crate::StateError::UnknownMode) for
    /// names not listed by [`ToolController::modes`].
    fn set_mode(&mut self, mode: &str) -> StateResult<bool>;

    /// Current inputs, in display order.
    fn inputs(&self) -> Vec<FieldValue>;

    /// Current outputs, in display order.
    fn outputs(&self) -> Vec<FieldValue>;

    /// Sets an input by name. Returns `true` if the value changed.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::UnknownField`](crate::StateError::UnknownField)
    /// for names the tool does not define, and
    /// [`StateError::ReadOnlyField`](crate::StateError::ReadOnlyField) for
    /// fields that are derived in the current mode.
    fn set_input(&mut self, field: &str, value: f64) -> StateResult<bool>;

    /// The most recent calculation error, cleared by the next successful
    /// recompute.
    fn last_error(&self) -> Option<&CalcError>;

    /// Plot series derived from the current state.
    fn series(&self) -> Vec<Series> {
        Vec::new()
    }

    /// Registers a listener for this controller's events.
    fn subscribe(&self, listener: Listener) -> SubscriptionId;

    /// Removes a listener. Returns `false` if it was not subscribed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Copies the visible state.
    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            tool_id: self.tool_id().clone(),
            instance_id: self.instance_id(),
            mode: self.mode(),
            inputs: self.inputs(),
            outputs: self.outputs(),
            last_error: self.last_error().map(ToString::to_string),
        }
    }
}

/// Collects the events of one update cycle so they are emitted only after all
/// state has been written.
#[derive(Debug, Default)]
pub(crate) struct Cycle {
    events: Vec<StateEvent>,
}

impl Cycle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn changed(field: &'static str) -> Self {
        Self {
            events: vec![StateEvent::StateChanged { field }],
        }
    }

    pub(crate) fn push(&mut self, event: StateEvent) {
        self.events.push(event);
    }

    /// Writes a derived value, recording a result event if it moved.
    pub(crate) fn output(&mut self, field: &mut Field<f64>, value: f64) {
        if field.replace(value).is_changed() {
            self.events.push(StateEvent::ResultComputed {
                field: field.name(),
                value,
            });
        }
    }

    pub(crate) fn invalid(&mut self, tool: &ToolId, instance: InstanceId, err: &CalcError) {
        warn!(tool = %tool, instance = %instance, error = %err, "calculation rejected inputs");
        self.events.push(StateEvent::InvalidInput {
            message: err.to_string(),
        });
    }

    pub(crate) fn finish(self, notifier: &Notifier) {
        if !self.events.is_empty() {
            notifier.emit_all(self.events);
        }
    }
}

pub(crate) fn field_value(field: &Field<f64>, label: &'static str, units: &'static str) -> FieldValue {
    FieldValue {
        name: field.name(),
        label,
        units,
        value: field.get(),
    }
}
