use labkit_state::{ThermodynamicsController, ToolController};

use crate::frame::{Frame, format_value};
use crate::view::{Presentation, ToolView};
use crate::{ViewError, ViewResult};

const TITLE: &str = "Thermodynamics Tool";

/// Thermodynamics calculator with van't Hoff measurement entry.
///
/// Besides the controller's own fields, `edit` accepts `temperature_c` for a
/// temperature entered in degrees Celsius.
#[derive(Debug)]
pub struct ThermodynamicsView {
    view: ToolView<ThermodynamicsController>,
}

impl ThermodynamicsView {
    /// Binds a view to `controller`.
    #[must_use]
    pub fn new(controller: ThermodynamicsController) -> Self {
        Self::with_title(controller, TITLE)
    }

    /// Binds a view with a custom title.
    #[must_use]
    pub fn with_title(controller: ThermodynamicsController, title: impl Into<String>) -> Self {
        Self {
            view: ToolView::new(controller, title),
        }
    }

    /// Typed access to the controller.
    #[must_use]
    pub fn state(&self) -> &ThermodynamicsController {
        self.view.controller()
    }

    /// Parses and adds a `(T, K)` measurement.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidNumber`] when either text is not a number.
    pub fn add_measurement(&mut self, temperature: &str, constant: &str) -> ViewResult<bool> {
        let t = parse("temperature", temperature)?;
        let k = parse("equilibrium_constant", constant)?;
        Ok(self.view.controller_mut().add_measurement(t, k))
    }

    /// Removes every measurement.
    pub fn clear_measurements(&mut self) {
        self.view.controller_mut().clear_measurements();
    }

    /// Sets the plotted temperature range from text.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidNumber`] when either bound is not a number.
    pub fn set_temperature_range(&mut self, t_min: &str, t_max: &str) -> ViewResult<bool> {
        let min = parse("t_min", t_min)?;
        let max = parse("t_max", t_max)?;
        Ok(self
            .view
            .controller_mut()
            .set_temperature_range(min, max)
            .is_changed())
    }

    fn notes(&self) -> Vec<String> {
        let state = self.view.controller();
        let mut notes = Vec::new();
        let (t_min, t_max) = state.temperature_range();
        notes.push(format!(
            "Temperature range: {} - {} K",
            format_value(t_min),
            format_value(t_max)
        ));
        if let Some(fit) = state.van_t_hoff() {
            notes.push(format!(
                "van't Hoff ({} points): ΔH = {} kJ/mol, ΔS = {} J/mol·K, R² = {}",
                state.measurements().len(),
                format_value(fit.delta_h),
                format_value(fit.delta_s),
                format_value(fit.fit.r_squared),
            ));
        }
        for series in state.series() {
            notes.push(format!("Plot: {} ({} points)", series.title, series.len()));
        }
        notes
    }
}

fn parse(field: &str, text: &str) -> ViewResult<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| ViewError::InvalidNumber {
            field: field.to_owned(),
            text: text.to_owned(),
        })
}

impl Presentation for ThermodynamicsView {
    fn controller(&self) -> &dyn ToolController {
        self.view.controller()
    }

    fn title(&self) -> &str {
        self.view.title()
    }

    fn edit(&mut self, field: &str, text: &str) -> ViewResult<bool> {
        self.view.edit(field, text)
    }

    fn select_mode(&mut self, mode: &str) -> ViewResult<bool> {
        self.view.select_mode(mode)
    }

    fn needs_redraw(&self) -> bool {
        self.view.needs_redraw()
    }

    fn render(&mut self) -> Frame {
        let equation = self.view.controller().calculation_mode().equation();
        let notes = self.notes();
        self.view.frame(Some(equation), notes)
    }

    fn redraw_count(&self) -> u64 {
        self.view.redraw_count()
    }
}

#[cfg(test)]
mod tests {
    use labkit_primitives::ToolId;

    use super::*;

    fn view() -> ThermodynamicsView {
        ThermodynamicsView::new(ThermodynamicsController::new(
            ToolId::new("thermodynamics").unwrap(),
        ))
    }

    #[test]
    fn renders_gibbs_energy() {
        let mut v = view();
        v.edit("delta_h", "-50").unwrap();
        v.edit("delta_s", "-100").unwrap();
        v.edit("temperature_c", "26.85").unwrap();

        let frame = v.render();
        assert_eq!(frame.mode, Some("gibbs_free_energy"));
        assert!((frame.row("delta_g").unwrap().value + 20.0).abs() < 1e-9);
        assert!(frame.notes.iter().any(|n| n.starts_with("Temperature range: 200 - 400 K")));
        assert_eq!(v.redraw_count(), 1);
        assert!(!v.needs_redraw());
    }

    #[test]
    fn temperature_mode_reports_zero_entropy() {
        let mut v = view();
        v.select_mode("temperature").unwrap();
        let frame = v.render();
        assert!(frame.status.unwrap().contains("ΔS = 0"));
    }

    #[test]
    fn measurements_and_range_from_text() {
        let mut v = view();
        assert!(v.add_measurement("300", "2").unwrap());
        assert!(v.add_measurement("320", "4").unwrap());
        assert!(v.add_measurement("abc", "4").is_err());
        assert!(v.set_temperature_range("250", "350").unwrap());

        let frame = v.render();
        assert!(frame.notes.iter().any(|n| n.starts_with("van't Hoff (2 points)")));
        assert!(frame.outputs.iter().any(|r| r.name == "vant_hoff_delta_h"));

        v.clear_measurements();
        assert!(v.state().van_t_hoff().is_none());
    }
}
