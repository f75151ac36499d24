//! Rendered output of a presentation.

use std::fmt;

use labkit_state::FieldValue;
use serde::Serialize;

/// One labelled value in a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    /// Field name accepted by [`Presentation::edit`](crate::Presentation::edit).
    pub name: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Raw value.
    pub value: f64,
    /// Units, empty when dimensionless.
    pub units: &'static str,
}

impl From<FieldValue> for Row {
    fn from(field: FieldValue) -> Self {
        Self {
            name: field.name,
            label: field.label,
            value: field.value,
            units: field.units,
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, format_value(self.value))?;
        if !self.units.is_empty() {
            write!(f, " {}", self.units)?;
        }
        Ok(())
    }
}

/// Everything a host needs to paint one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Frame {
    /// Window or panel title.
    pub title: String,
    /// Active mode name.
    pub mode: Option<&'static str>,
    /// Equation for the active mode.
    pub equation: Option<&'static str>,
    /// Editable inputs.
    pub inputs: Vec<Row>,
    /// Derived outputs.
    pub outputs: Vec<Row>,
    /// Free-form lines such as fit summaries.
    pub notes: Vec<String>,
    /// Status line: the last rejected edit or calculation error.
    pub status: Option<String>,
}

impl Frame {
    /// Looks up an input or output row by field name.
    #[must_use]
    pub fn row(&self, name: &str) -> Option<&Row> {
        self.inputs
            .iter()
            .chain(&self.outputs)
            .find(|row| row.name == name)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        match (self.mode, self.equation) {
            (Some(mode), Some(equation)) => writeln!(f, "Mode: {mode} ({equation})")?,
            (Some(mode), None) => writeln!(f, "Mode: {mode}")?,
            _ => {}
        }
        if !self.inputs.is_empty() {
            writeln!(f, "Inputs:")?;
            for row in &self.inputs {
                writeln!(f, "  {row}")?;
            }
        }
        if !self.outputs.is_empty() {
            writeln!(f, "Results:")?;
            for row in &self.outputs {
                writeln!(f, "  {row}")?;
            }
        }
        for note in &self.notes {
            writeln!(f, "{note}")?;
        }
        if let Some(status) = &self.status {
            writeln!(f, "Status: {status}")?;
        }
        Ok(())
    }
}

/// Formats a value for display: scientific notation for very small or very
/// large magnitudes, otherwise up to six decimals without trailing zeros.
#[must_use]
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_owned();
    }
    let magnitude = value.abs();
    if !(1.0e-3..1.0e6).contains(&magnitude) {
        return format!("{value:.4e}");
    }
    let fixed = format!("{value:.6}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_owned()
}
