//! Notifications emitted by controllers.

use std::fmt;

use serde::Serialize;

/// Handle returned by [`Notifier::subscribe`](crate::Notifier::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// A change notification delivered to listeners.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StateEvent {
    /// An input actually changed value. Exactly one per effective edit.
    StateChanged {
        /// Name of the input that changed.
        field: &'static str,
    },
    /// A derived output took a new value.
    ResultComputed {
        /// Name of the output.
        field: &'static str,
        /// New value.
        value: f64,
    },
    /// The calculation rejected the current inputs; outputs kept their last
    /// valid values.
    InvalidInput {
        /// Human-readable reason.
        message: String,
    },
    /// The calculation mode changed, which also changes which field is derived.
    ModeChanged {
        /// New mode name.
        mode: &'static str,
    },
    /// A plot series derived from collected data changed.
    SeriesUpdated {
        /// Series name.
        series: &'static str,
    },
}

impl StateEvent {
    /// Returns `true` for [`StateEvent::StateChanged`].
    #[must_use]
    pub const fn is_state_changed(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }

    /// Returns `true` for [`StateEvent::InvalidInput`].
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
