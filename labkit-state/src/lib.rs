//! Reactive state controllers for labkit tools.
//!
//! A controller owns one tool instance's inputs, recomputes the derived outputs
//! through the pure functions in `labkit-calc` whenever an input actually
//! changes, and fans the resulting [`StateEvent`]s out to subscribed
//! listeners. Everything here is single-threaded: controllers are `!Send` and
//! rely on `RefCell` instead of locks.

#![warn(missing_docs, clippy::pedantic)]

mod beer_lambert;
mod controller;
mod error;
mod event;
mod field;
mod listeners;
mod notifier;
mod placeholder;
mod thermodynamics;

pub use beer_lambert::{BeerLambertController, BeerLambertField};
pub use controller::{FieldValue, StateSnapshot, ToolController};
pub use error::{StateError, StateResult};
pub use event::{StateEvent, SubscriptionId};
pub use field::{Change, Field, SameValue};
pub use listeners::{EventRecorder, tracing_listener};
pub use notifier::{Listener, Notifier};
pub use placeholder::PlaceholderController;
pub use thermodynamics::{ThermodynamicsController, ThermodynamicsField};
