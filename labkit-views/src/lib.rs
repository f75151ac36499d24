//! Presentations for labkit tools.
//!
//! A presentation is bound to exactly one controller at construction. It
//! forwards user edits into the controller, listens for change notifications to
//! know what needs repainting, and re-derives every displayed value from the
//! controller whenever it renders a [`Frame`].

#![warn(missing_docs, clippy::pedantic)]

mod beer_lambert;
mod error;
mod frame;
mod placeholder;
mod thermodynamics;
mod view;

pub use beer_lambert::BeerLambertView;
pub use error::{ViewError, ViewResult};
pub use frame::{Frame, Row, format_value};
pub use placeholder::PlaceholderView;
pub use thermodynamics::ThermodynamicsView;
pub use view::{Presentation, ToolView};
