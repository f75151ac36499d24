use labkit_state::{BeerLambertController, ToolController};

use crate::frame::{Frame, format_value};
use crate::view::{Presentation, ToolView};
use crate::{ViewError, ViewResult};

const TITLE: &str = "Beer-Lambert Calculator";

/// Beer-Lambert calculator with standard-curve entry.
#[derive(Debug)]
pub struct BeerLambertView {
    view: ToolView<BeerLambertController>,
}

impl BeerLambertView {
    /// Binds a view to `controller`.
    #[must_use]
    pub fn new(controller: BeerLambertController) -> Self {
        Self::with_title(controller, TITLE)
    }

    /// Binds a view with a custom title.
    #[must_use]
    pub fn with_title(controller: BeerLambertController, title: impl Into<String>) -> Self {
        Self {
            view: ToolView::new(controller, title),
        }
    }

    /// Typed access to the controller.
    #[must_use]
    pub fn state(&self) -> &BeerLambertController {
        self.view.controller()
    }

    /// Parses and adds a `(concentration, absorbance)` standard.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidNumber`] when either text is not a number.
    /// Negative values are rejected by the controller and show up in the
    /// status line, with `Ok(false)` returned.
    pub fn add_standard(&mut self, concentration: &str, absorbance: &str) -> ViewResult<bool> {
        let parse = |field: &str, text: &str| {
            text.trim()
                .parse::<f64>()
                .map_err(|_| ViewError::InvalidNumber {
                    field: field.to_owned(),
                    text: text.to_owned(),
                })
        };
        let c = parse("concentration", concentration)?;
        let a = parse("absorbance", absorbance)?;
        Ok(self.view.controller_mut().add_data_point(c, a))
    }

    /// Removes the standard at `index`. Returns `false` if there is none.
    pub fn remove_standard(&mut self, index: usize) -> bool {
        self.view.controller_mut().remove_data_point(index).is_some()
    }

    /// Removes every standard.
    pub fn clear_standards(&mut self) {
        self.view.controller_mut().clear_data_points();
    }

    /// Elements changed since the last render.
    #[must_use]
    pub fn dirty_elements(&self) -> Vec<&'static str> {
        self.view.dirty_elements()
    }

    fn notes(&self) -> Vec<String> {
        let state = self.view.controller();
        let mut notes = Vec::new();
        if !state.data_points().is_empty() {
            notes.push(format!("Standards: {}", state.data_points().len()));
        }
        if let Some(fit) = state.regression() {
            notes.push(format!(
                "Standard curve: A = {} · c + {} (R² = {})",
                format_value(fit.fit.slope),
                format_value(fit.fit.intercept),
                format_value(fit.fit.r_squared),
            ));
        }
        for series in state.series() {
            notes.push(format!("Plot: {} ({} points)", series.title, series.len()));
        }
        notes
    }
}

impl Presentation for BeerLambertView {
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

    fn view() -> BeerLambertView {
        BeerLambertView::new(BeerLambertController::new(ToolId::new("beer_lambert").unwrap()))
    }

    #[test]
    fn render_reflects_controller() {
        let mut v = view();
        v.edit("epsilon", "1").unwrap();
        v.edit("path_length", "2").unwrap();
        v.edit("concentration", "0.5").unwrap();

        let frame = v.render();
        assert_eq!(frame.title, "Beer-Lambert Calculator");
        assert_eq!(frame.mode, Some("absorbance"));
        assert_eq!(frame.row("absorbance").unwrap().value, 1.0);
        assert_eq!(frame.inputs.len(), 3);
        assert!(frame.to_string().contains("Absorbance (A): 1"));
    }

    #[test]
    fn mode_switch_moves_derived_row() {
        let mut v = view();
        v.select_mode("concentration").unwrap();
        let frame = v.render();
        assert_eq!(frame.outputs[0].name, "concentration");
        assert!(frame.inputs.iter().any(|r| r.name == "absorbance"));
        assert!(v.edit("concentration", "1").is_err());
    }

    #[test]
    fn standards_show_fit_summary() {
        let mut v = view();
        v.edit("path_length", "1").unwrap();
        assert!(v.add_standard("0", "0").unwrap());
        assert!(v.add_standard("1e-4", "0.5").unwrap());
        assert!(v.dirty_elements().contains(&"standards"));
        assert!(v.add_standard("x", "0.5").is_err());
        assert!(!v.add_standard("-1", "0.5").unwrap());

        let frame = v.render();
        assert!(frame.notes.iter().any(|n| n.starts_with("Standard curve")));
        assert!(frame.status.is_some());
        assert_eq!(v.state().data_points().len(), 2);

        assert!(v.remove_standard(0));
        v.clear_standards();
        assert!(v.state().regression().is_none());
        assert!(v.render().status.is_none());
    }
}
