//! Ready-made listeners.

use std::cell::RefCell;
use std::rc::Rc;

use labkit_primitives::{InstanceId, ToolId};
use tracing::debug;

use crate::event::StateEvent;
use crate::notifier::Listener;

/// Collects delivered events in order. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<StateEvent>>>,
}

impl EventRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a listener that appends to this recorder.
    #[must_use]
    pub fn listener(&self) -> Listener {
        let events = Rc::clone(&self.events);
        Box::new(move |event| events.borrow_mut().push(event.clone()))
    }

    /// Copies the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<StateEvent> {
        self.events.borrow().clone()
    }

    /// Number of [`StateEvent::StateChanged`] events seen.
    #[must_use]
    pub fn state_changes(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.is_state_changed())
            .count()
    }

    /// Discards everything recorded so far.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

/// Returns a listener that logs each event at debug level.
#[must_use]
pub fn tracing_listener(tool: ToolId, instance: InstanceId) -> Listener {
    Box::new(move |event| match event {
        StateEvent::StateChanged { field } => {
            debug!(%tool, %instance, field, "state changed");
        }
        StateEvent::ResultComputed { field, value } => {
            debug!(%tool, %instance, field, value, "result computed");
        }
        StateEvent::InvalidInput { message } => {
            debug!(%tool, %instance, %message, "invalid input");
        }
        StateEvent::ModeChanged { mode } => {
            debug!(%tool, %instance, mode, "mode changed");
        }
        StateEvent::SeriesUpdated { series } => {
            debug!(%tool, %instance, series, "series updated");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Notifier;

    #[test]
    fn recorder_shares_buffer_across_clones() {
        let notifier = Notifier::new();
        let recorder = EventRecorder::new();
        let copy = recorder.clone();
        notifier.subscribe(recorder.listener());
        notifier.emit(StateEvent::StateChanged { field: "x" });

        assert_eq!(copy.state_changes(), 1);
        copy.clear();
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn tracing_listener_accepts_every_event() {
        let notifier = Notifier::new();
        let tool = ToolId::new("beer_lambert").unwrap();
        notifier.subscribe(tracing_listener(tool, InstanceId::random()));
        notifier.emit_all(vec![
            StateEvent::StateChanged { field: "x" },
            StateEvent::ResultComputed { field: "y", value: 1.0 },
            StateEvent::InvalidInput { message: "bad".into() },
            StateEvent::ModeChanged { mode: "m" },
            StateEvent::SeriesUpdated { series: "s" },
        ]);
        assert_eq!(notifier.subscriber_count(), 1);
    }
}
