//! Error types for the calculation modules.

use thiserror::Error;

/// Errors emitted when inputs fall outside a formula's valid domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// An input value is outside the valid domain of the formula.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Human-readable reason describing the violation.
        reason: String,
    },
    /// A fit or series needs more data points than were supplied.
    #[error("at least {required} data points are required, got {actual}")]
    InsufficientData {
        /// Minimum number of points.
        required: usize,
        /// Number of points supplied.
        actual: usize,
    },
}

impl CalcError {
    /// Helper to construct [`CalcError::InvalidInput`] from string-like values.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Result type alias for calculation functions.
pub type CalcResult<T> = Result<T, CalcError>;

pub(crate) fn ensure_finite(name: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::invalid(format!("{name} must be a finite number")))
    }
}

pub(crate) fn ensure_non_negative(name: &str, value: f64) -> CalcResult<f64> {
    ensure_finite(name, value)?;
    if value < 0.0 {
        return Err(CalcError::invalid(format!("{name} cannot be negative")));
    }
    Ok(value)
}

pub(crate) fn ensure_positive(name: &str, value: f64) -> CalcResult<f64> {
    ensure_finite(name, value)?;
    if value <= 0.0 {
        return Err(CalcError::invalid(format!("{name} must be positive")));
    }
    Ok(value)
}
