//! Typed input cells with explicit change records.

use labkit_calc::beer_lambert::BeerLambertMode;
use labkit_calc::thermodynamics::ThermodynamicsMode;
use serde::Serialize;
use tracing::trace;

/// Equality used to decide whether a set is a no-op.
///
/// Floats treat every `NaN` as equal so that storing `NaN` twice is still a
/// no-op.
pub trait SameValue {
    /// Returns `true` when `self` and `other` are indistinguishable.
    fn same_value(&self, other: &Self) -> bool;
}

impl SameValue for f64 {
    fn same_value(&self, other: &Self) -> bool {
        #[allow(clippy::float_cmp)]
        let equal = self == other;
        equal || (self.is_nan() && other.is_nan())
    }
}

impl SameValue for BeerLambertMode {
    fn same_value(&self, other: &Self) -> bool {
        self == other
    }
}

impl SameValue for ThermodynamicsMode {
    fn same_value(&self, other: &Self) -> bool {
        self == other
    }
}

impl SameValue for (f64, f64) {
    fn same_value(&self, other: &Self) -> bool {
        self.0.same_value(&other.0) && self.1.same_value(&other.1)
    }
}

/// Outcome of writing a value into a [`Field`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change<T> {
    /// The stored value already equalled the new one.
    Unchanged,
    /// The stored value was replaced.
    Updated {
        /// Value before the write.
        old: T,
        /// Value after the write.
        new: T,
    },
}

impl<T> Change<T> {
    /// Returns `true` when the write replaced the stored value.
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

/// A named value cell.
#[derive(Debug, Clone, Copy)]
pub struct Field<T> {
    name: &'static str,
    value: T,
}

impl<T> Field<T>
where
    T: Copy + SameValue + std::fmt::Debug,
{
    /// Creates a field holding `value`.
    #[must_use]
    pub const fn new(name: &'static str, value: T) -> Self {
        Self { name, value }
    }

    /// Returns the field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the stored value.
    #[must_use]
    pub fn get(&self) -> T {
        self.value
    }

    /// Stores `value`, reporting whether anything changed.
    pub fn replace(&mut self, value: T) -> Change<T> {
        if self.value.same_value(&value) {
            return Change::Unchanged;
        }
        let old = self.value;
        self.value = value;
        trace!(field = self.name, ?old, new = ?value, "field updated");
        Change::Updated { old, new: value }
    }
}
