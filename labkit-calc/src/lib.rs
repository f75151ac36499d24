//! Pure calculation modules backing the labkit tools.
//!
//! Every function in this crate maps plain `f64` inputs to outputs without
//! touching controller or presentation state, so each formula can be exercised
//! on its own. Domain violations are reported as [`CalcError`] values rather
//! than panics.

#![warn(missing_docs, clippy::pedantic)]

pub mod beer_lambert;
mod error;
pub mod regression;
pub mod series;
pub mod thermodynamics;

pub use error::{CalcError, CalcResult};
pub use regression::{LinearFit, fit_line};
pub use series::{Point, Series, linspace};
