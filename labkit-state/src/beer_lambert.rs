//! Beer-Lambert calculator state.

use std::fmt;

use labkit_calc::beer_lambert::{
    self, BeerLambertInput, BeerLambertMode, DataPoint, StandardCurveFit,
};
use labkit_calc::{CalcError, CalcResult, Point, Series};
use labkit_primitives::{InstanceId, ToolId};
use tracing::debug;

use crate::controller::{Cycle, FieldValue, ToolController, field_value};
use crate::event::{StateEvent, SubscriptionId};
use crate::field::{Change, Field, SameValue};
use crate::notifier::{Listener, Notifier};
use crate::{StateError, StateResult};

const MODE_NAMES: [&str; 4] = ["absorbance", "concentration", "epsilon", "path_length"];
const CURVE_POINTS: usize = 100;
const DEFAULT_MAX_CONCENTRATION: f64 = 1.0e-4;
const CURVE_HEADROOM: f64 = 1.2;

/// The four quantities of the Beer-Lambert law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeerLambertField {
    /// Molar absorptivity ε.
    Epsilon,
    /// Path length l.
    PathLength,
    /// Concentration c.
    Concentration,
    /// Absorbance A.
    Absorbance,
}

impl BeerLambertField {
    /// All fields in display order.
    pub const ALL: [Self; 4] = [
        Self::Epsilon,
        Self::PathLength,
        Self::Concentration,
        Self::Absorbance,
    ];

    /// Machine-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Epsilon => "epsilon",
            Self::PathLength => "path_length",
            Self::Concentration => "concentration",
            Self::Absorbance => "absorbance",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Epsilon => "Molar absorptivity (ε)",
            Self::PathLength => "Path length (l)",
            Self::Concentration => "Concentration (c)",
            Self::Absorbance => "Absorbance (A)",
        }
    }

    /// Units of the quantity.
    #[must_use]
    pub const fn units(self) -> &'static str {
        match self {
            Self::Epsilon => "M⁻¹cm⁻¹",
            Self::PathLength => "cm",
            Self::Concentration => "M",
            Self::Absorbance => "",
        }
    }

    /// Field derived in `mode`.
    #[must_use]
    pub const fn derived_in(mode: BeerLambertMode) -> Self {
        match mode {
            BeerLambertMode::Absorbance => Self::Absorbance,
            BeerLambertMode::Concentration => Self::Concentration,
            BeerLambertMode::Epsilon => Self::Epsilon,
            BeerLambertMode::PathLength => Self::PathLength,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

/// State for one Beer-Lambert calculator instance.
///
/// Defaults to absorbance mode with every quantity at zero. Standards added
/// with [`add_data_point`](Self::add_data_point) are fitted automatically once
/// two or more are present.
pub struct BeerLambertController {
    tool_id: ToolId,
    instance_id: InstanceId,
    mode: Field<BeerLambertMode>,
    epsilon: Field<f64>,
    path_length: Field<f64>,
    concentration: Field<f64>,
    absorbance: Field<f64>,
    data_points: Vec<DataPoint>,
    fit: Option<StandardCurveFit>,
    last_error: Option<CalcError>,
    notifier: Notifier,
}

impl fmt::Debug for BeerLambertController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeerLambertController")
            .field("tool_id", &self.tool_id)
            .field("instance_id", &self.instance_id)
            .field("mode", &self.mode.get())
            .field("input", &self.input())
            .field("data_points", &self.data_points.len())
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl BeerLambertController {
    /// Creates a controller in its zero state.
    #[must_use]
    pub fn new(tool_id: ToolId) -> Self {
        let mut controller = Self {
            tool_id,
            instance_id: InstanceId::random(),
            mode: Field::new("mode", BeerLambertMode::default()),
            epsilon: Field::new(BeerLambertField::Epsilon.name(), 0.0),
            path_length: Field::new(BeerLambertField::PathLength.name(), 0.0),
            concentration: Field::new(BeerLambertField::Concentration.name(), 0.0),
            absorbance: Field::new(BeerLambertField::Absorbance.name(), 0.0),
            data_points: Vec::new(),
            fit: None,
            last_error: None,
            notifier: Notifier::new(),
        };
        let mut initial = Cycle::new();
        controller.recompute(&mut initial);
        controller
    }

    /// Active calculation mode.
    #[must_use]
    pub fn calculation_mode(&self) -> BeerLambertMode {
        self.mode.get()
    }

    /// Molar absorptivity (M⁻¹cm⁻¹).
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon.get()
    }

    /// Path length (cm).
    #[must_use]
    pub fn path_length(&self) -> f64 {
        self.path_length.get()
    }

    /// Concentration (M).
    #[must_use]
    pub fn concentration(&self) -> f64 {
        self.concentration.get()
    }

    /// Absorbance.
    #[must_use]
    pub fn absorbance(&self) -> f64 {
        self.absorbance.get()
    }

    /// The quantity computed in the active mode.
    #[must_use]
    pub fn derived_field(&self) -> BeerLambertField {
        BeerLambertField::derived_in(self.mode.get())
    }

    /// Collected standards.
    #[must_use]
    pub fn data_points(&self) -> &[DataPoint] {
        &self.data_points
    }

    /// Current standard-curve fit, if at least two standards are present.
    #[must_use]
    pub fn regression(&self) -> Option<&StandardCurveFit> {
        self.fit.as_ref()
    }

    /// Switches which quantity is derived.
    pub fn set_calculation_mode(&mut self, mode: BeerLambertMode) -> Change<BeerLambertMode> {
        let change = self.mode.replace(mode);
        if let Change::Updated { old, new } = change {
            debug!(tool = %self.tool_id, instance = %self.instance_id, ?old, ?new, "calculation mode changed");
            let mut cycle = Cycle::changed("mode");
            cycle.push(StateEvent::ModeChanged { mode: new.as_str() });
            self.recompute(&mut cycle);
            cycle.finish(&self.notifier);
        }
        change
    }

    /// Sets ε.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ReadOnlyField`] in epsilon mode.
    pub fn set_epsilon(&mut self, value: f64) -> StateResult<Change<f64>> {
        self.set(BeerLambertField::Epsilon, value)
    }

    /// Sets the path length.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ReadOnlyField`] in path-length mode.
    pub fn set_path_length(&mut self, value: f64) -> StateResult<Change<f64>> {
        self.set(BeerLambertField::PathLength, value)
    }

    /// Sets the concentration.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ReadOnlyField`] in concentration mode.
    pub fn set_concentration(&mut self, value: f64) -> StateResult<Change<f64>> {
        self.set(BeerLambertField::Concentration, value)
    }

    /// Sets the absorbance.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ReadOnlyField`] in absorbance mode.
    pub fn set_absorbance(&mut self, value: f64) -> StateResult<Change<f64>> {
        self.set(BeerLambertField::Absorbance, value)
    }

    /// Sets any non-derived quantity.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ReadOnlyField`] when `field` is derived in the
    /// active mode.
    pub fn set(&mut self, field: BeerLambertField, value: f64) -> StateResult<Change<f64>> {
        if field == self.derived_field() {
            return Err(StateError::ReadOnlyField {
                field: field.name(),
                mode: self.mode.get().as_str(),
            });
        }

        let change = self.field_mut(field).replace(value);
        if let Change::Updated { old, new } = change {
            debug!(
                tool = %self.tool_id,
                instance = %self.instance_id,
                field = field.name(),
                old,
                new,
                "input changed"
            );
            let mut cycle = Cycle::changed(field.name());
            self.recompute(&mut cycle);
            cycle.finish(&self.notifier);
        }
        Ok(change)
    }

    /// Adds a standard. Returns `false` and surfaces an
    /// [`StateEvent::InvalidInput`] when either value is negative.
    pub fn add_data_point(&mut self, concentration: f64, absorbance: f64) -> bool {
        match DataPoint::new(concentration, absorbance) {
            Ok(point) => {
                self.data_points.push(point);
                debug!(tool = %self.tool_id, instance = %self.instance_id, concentration, absorbance, "standard added");
                self.data_changed();
                true
            }
            Err(err) => {
                let mut cycle = Cycle::new();
                cycle.invalid(&self.tool_id, self.instance_id, &err);
                self.last_error = Some(err);
                cycle.finish(&self.notifier);
                false
            }
        }
    }

    /// Removes the standard at `index`, if present.
    pub fn remove_data_point(&mut self, index: usize) -> Option<DataPoint> {
        if index >= self.data_points.len() {
            return None;
        }
        let removed = self.data_points.remove(index);
        self.data_changed();
        Some(removed)
    }

    /// Removes every standard.
    pub fn clear_data_points(&mut self) {
        if self.data_points.is_empty() {
            return;
        }
        self.data_points.clear();
        self.data_changed();
    }

    /// Theoretical `A` against `c` line for the current ε and path length.
    ///
    /// `max_concentration` defaults to 1.2 × the largest standard, or 1e-4 M
    /// without standards.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidInput`] unless ε, the path length, and the
    /// maximum concentration are positive.
    pub fn theoretical_curve(&self, max_concentration: Option<f64>) -> CalcResult<Series> {
        let max_concentration = max_concentration.unwrap_or_else(|| {
            self.data_points
                .iter()
                .map(|p| p.concentration)
                .reduce(f64::max)
                .filter(|max| *max > 0.0)
                .map_or(DEFAULT_MAX_CONCENTRATION, |max| max * CURVE_HEADROOM)
        });
        let points = beer_lambert::standard_curve(
            self.epsilon.get(),
            self.path_length.get(),
            max_concentration,
            CURVE_POINTS,
        )?;
        Ok(Series::new("Theoretical curve", "Concentration (M)", "Absorbance")
            .with_points(points.into_iter().map(Point::from).collect()))
    }

    /// Fitted line extended 10% beyond the standards on both sides (never below 0).
    #[must_use]
    pub fn regression_line(&self) -> Option<Series> {
        let fit = self.fit.as_ref()?;
        let x_min = self.data_points.iter().map(|p| p.concentration).reduce(f64::min)?;
        let x_max = self.data_points.iter().map(|p| p.concentration).reduce(f64::max)?;
        let span = x_max - x_min;
        let start = (x_min - 0.1 * span).max(0.0);
        let end = x_max + 0.1 * span;
        Some(
            Series::new("Regression line", "Concentration (M)", "Absorbance").with_points(vec![
                Point::new(start, fit.fit.predict(start)),
                Point::new(end, fit.fit.predict(end)),
            ]),
        )
    }

    fn input(&self) -> BeerLambertInput {
        BeerLambertInput {
            epsilon: self.epsilon.get(),
            path_length: self.path_length.get(),
            concentration: self.concentration.get(),
            absorbance: self.absorbance.get(),
        }
    }

    fn field(&self, field: BeerLambertField) -> &Field<f64> {
        match field {
            BeerLambertField::Epsilon => &self.epsilon,
            BeerLambertField::PathLength => &self.path_length,
            BeerLambertField::Concentration => &self.concentration,
            BeerLambertField::Absorbance => &self.absorbance,
        }
    }

    fn field_mut(&mut self, field: BeerLambertField) -> &mut Field<f64> {
        match field {
            BeerLambertField::Epsilon => &mut self.epsilon,
            BeerLambertField::PathLength => &mut self.path_length,
            BeerLambertField::Concentration => &mut self.concentration,
            BeerLambertField::Absorbance => &mut self.absorbance,
        }
    }

    fn data_changed(&mut self) {
        let mut cycle = Cycle::changed("data_points");
        cycle.push(StateEvent::SeriesUpdated { series: "standards" });
        self.recompute(&mut cycle);
        cycle.finish(&self.notifier);
    }

    fn recompute(&mut self, cycle: &mut Cycle) {
        let mode = self.mode.get();
        let derived = BeerLambertField::derived_in(mode);
        let mut error = None;

        match beer_lambert::solve(&self.input(), mode) {
            Ok(value) => cycle.output(self.field_mut(derived), value),
            Err(err) => {
                cycle.invalid(&self.tool_id, self.instance_id, &err);
                error = Some(err);
            }
        }

        if let Err(err) = self.refit(cycle) {
            cycle.invalid(&self.tool_id, self.instance_id, &err);
            error.get_or_insert(err);
        }

        self.last_error = error;
    }

    fn refit(&mut self, cycle: &mut Cycle) -> CalcResult<()> {
        if self.data_points.len() < 2 {
            if self.fit.take().is_some() {
                cycle.push(StateEvent::SeriesUpdated { series: "regression" });
            }
            return Ok(());
        }

        let next = beer_lambert::linear_regression(&self.data_points, Some(self.path_length.get()))?;
        let previous = self.fit.replace(next);
        let mut moved = false;
        for (name, old, new) in fit_outputs(previous.as_ref(), &next) {
            if !old.is_some_and(|old| old.same_value(&new)) {
                moved = true;
                cycle.push(StateEvent::ResultComputed { field: name, value: new });
            }
        }
        if moved || previous.is_none() {
            cycle.push(StateEvent::SeriesUpdated { series: "regression" });
        }
        Ok(())
    }
}

fn fit_values(fit: &StandardCurveFit) -> [(&'static str, Option<f64>); 5] {
    [
        ("slope", Some(fit.fit.slope)),
        ("intercept", Some(fit.fit.intercept)),
        ("r_squared", Some(fit.fit.r_squared)),
        ("slope_std_error", Some(fit.fit.slope_std_error)),
        ("fitted_epsilon", fit.epsilon),
    ]
}

fn fit_outputs(
    previous: Option<&StandardCurveFit>,
    next: &StandardCurveFit,
) -> Vec<(&'static str, Option<f64>, f64)> {
    let before = previous.map(fit_values);
    fit_values(next)
        .into_iter()
        .enumerate()
        .filter_map(|(i, (name, value))| {
            let value = value?;
            let old = before.and_then(|values| values[i].1);
            Some((name, old, value))
        })
        .collect()
}

impl ToolController for BeerLambertController {
    fn tool_id(&self) -> &ToolId {
        &self.tool_id
    }

    fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    fn mode(&self) -> Option<&'static str> {
        Some(self.mode.get().as_str())
    }

    fn modes(&self) -> &'static [&'static str] {
        &MODE_NAMES
    }

    fn set_mode(&mut self, mode: &str) -> StateResult<bool> {
        let mode = mode
            .parse::<BeerLambertMode>()
            .map_err(|_| StateError::UnknownMode {
                tool: self.tool_id.clone(),
                mode: mode.to_owned(),
            })?;
        Ok(self.set_calculation_mode(mode).is_changed())
    }

    fn inputs(&self) -> Vec<FieldValue> {
        let derived = self.derived_field();
        BeerLambertField::ALL
            .into_iter()
            .filter(|field| *field != derived)
            .map(|field| field_value(self.field(field), field.label(), field.units()))
            .collect()
    }

    fn outputs(&self) -> Vec<FieldValue> {
        let derived = self.derived_field();
        let mut outputs = vec![field_value(self.field(derived), derived.label(), derived.units())];
        if let Some(fit) = &self.fit {
            let labels = [
                ("Slope (ε·l)", "M⁻¹"),
                ("Intercept", ""),
                ("R²", ""),
                ("Slope std. error", "M⁻¹"),
                ("Fitted ε", "M⁻¹cm⁻¹"),
            ];
            for ((name, value), (label, units)) in fit_values(fit).into_iter().zip(labels) {
                if let Some(value) = value {
                    outputs.push(FieldValue {
                        name,
                        label,
                        units,
                        value,
                    });
                }
            }
        }
        outputs
    }

    fn set_input(&mut self, field: &str, value: f64) -> StateResult<bool> {
        let Some(field) = BeerLambertField::from_name(field) else {
            return Err(StateError::UnknownField {
                tool: self.tool_id.clone(),
                field: field.to_owned(),
            });
        };
        Ok(self.set(field, value)?.is_changed())
    }

    fn last_error(&self) -> Option<&CalcError> {
        self.last_error.as_ref()
    }

    fn series(&self) -> Vec<Series> {
        let mut series = Vec::new();
        if !self.data_points.is_empty() {
            series.push(
                Series::new("Standards", "Concentration (M)", "Absorbance")
                    .with_points(self.data_points.iter().copied().map(Point::from).collect()),
            );
        }
        series.extend(self.regression_line());
        if let Ok(curve) = self.theoretical_curve(None) {
            series.push(curve);
        }
        series
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        self.notifier.subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventRecorder;

    fn controller() -> BeerLambertController {
        BeerLambertController::new(ToolId::new("beer_lambert").unwrap())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn zero_state_is_well_defined() {
        let c = controller();
        assert_eq!(c.calculation_mode(), BeerLambertMode::Absorbance);
        assert_eq!(c.absorbance(), 0.0);
        assert!(c.last_error().is_none());
        assert_eq!(c.inputs().len(), 3);
        assert_eq!(c.outputs()[0].name, "absorbance");
    }

    #[test]
    fn three_sets_yield_three_notifications() {
        let mut c = controller();
        let recorder = EventRecorder::new();
        c.subscribe(recorder.listener());

        c.set_epsilon(1.0).unwrap();
        assert_eq!(recorder.state_changes(), 1);
        c.set_path_length(2.0).unwrap();
        assert_eq!(recorder.state_changes(), 2);
        c.set_concentration(0.5).unwrap();
        assert_eq!(recorder.state_changes(), 3);

        assert_eq!(c.absorbance(), 1.0);
        assert_eq!(c.epsilon(), 1.0);
        assert_eq!(c.path_length(), 2.0);
        assert_eq!(c.concentration(), 0.5);
        assert!(recorder.events().contains(&StateEvent::ResultComputed {
            field: "absorbance",
            value: 1.0
        }));
    }

    #[test]
    fn same_value_set_is_silent() {
        let mut c = controller();
        c.set_epsilon(3.0).unwrap();
        let recorder = EventRecorder::new();
        c.subscribe(recorder.listener());

        assert_eq!(c.set_epsilon(3.0).unwrap(), Change::Unchanged);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn derived_field_is_read_only() {
        let mut c = controller();
        let err = c.set_absorbance(0.3).unwrap_err();
        assert_eq!(
            err,
            StateError::ReadOnlyField {
                field: "absorbance",
                mode: "absorbance"
            }
        );
        assert!(c.set_input("absorbance", 0.3).is_err());
        assert!(matches!(
            c.set_input("bogus", 1.0),
            Err(StateError::UnknownField { .. })
        ));
    }

    #[test]
    fn invalid_input_keeps_last_output() {
        let mut c = controller();
        c.set_epsilon(2.0).unwrap();
        c.set_path_length(1.0).unwrap();
        c.set_concentration(0.25).unwrap();
        assert_eq!(c.absorbance(), 0.5);

        let recorder = EventRecorder::new();
        c.subscribe(recorder.listener());
        c.set_concentration(-1.0).unwrap();

        assert_eq!(c.absorbance(), 0.5);
        assert_eq!(c.concentration(), -1.0);
        assert!(c.last_error().is_some());
        assert_eq!(recorder.state_changes(), 1);
        assert!(recorder.events().iter().any(StateEvent::is_invalid_input));

        c.set_concentration(0.5).unwrap();
        assert!(c.last_error().is_none());
        assert_eq!(c.absorbance(), 1.0);
    }

    #[test]
    fn switching_mode_solves_for_concentration() {
        let mut c = controller();
        c.set_epsilon(6220.0).unwrap();
        c.set_path_length(1.0).unwrap();
        let recorder = EventRecorder::new();
        c.subscribe(recorder.listener());

        assert!(c.set_mode("concentration").unwrap());
        assert_eq!(c.derived_field(), BeerLambertField::Concentration);
        c.set_absorbance(0.622).unwrap();
        assert!(close(c.concentration(), 1.0e-4));
        assert!(recorder.events().contains(&StateEvent::ModeChanged {
            mode: "concentration"
        }));

        assert!(!c.set_mode("concentration").unwrap());
        assert!(matches!(
            c.set_mode("nope"),
            Err(StateError::UnknownMode { .. })
        ));
    }

    #[test]
    fn standards_are_fitted_automatically() {
        let mut c = controller();
        c.set_path_length(1.0).unwrap();
        assert!(c.add_data_point(0.0, 0.0));
        assert!(c.regression().is_none());
        assert!(c.add_data_point(1.0e-4, 0.5));
        assert!(c.add_data_point(2.0e-4, 1.0));

        let fit = c.regression().unwrap();
        assert!(close(fit.fit.slope, 5000.0));
        assert!(close(fit.epsilon.unwrap(), 5000.0));
        assert!(c.outputs().iter().any(|o| o.name == "fitted_epsilon"));
        assert!(c.regression_line().is_some());

        assert!(!c.add_data_point(-1.0, 0.2));
        assert_eq!(c.data_points().len(), 3);
        assert!(c.last_error().is_some());

        c.remove_data_point(2).unwrap();
        assert!(c.remove_data_point(9).is_none());
        c.clear_data_points();
        assert!(c.regression().is_none());
        assert!(c.data_points().is_empty());
    }

    #[test]
    fn theoretical_curve_defaults_from_standards() {
        let mut c = controller();
        c.set_epsilon(1000.0).unwrap();
        c.set_path_length(1.0).unwrap();
        let curve = c.theoretical_curve(None).unwrap();
        assert_eq!(curve.len(), CURVE_POINTS);
        assert!(close(curve.points.last().unwrap().x, DEFAULT_MAX_CONCENTRATION));

        c.add_data_point(5.0e-4, 0.5);
        let curve = c.theoretical_curve(None).unwrap();
        assert!(close(curve.points.last().unwrap().x, 6.0e-4));
        assert!(c.series().iter().any(|s| s.title == "Standards"));
    }
}
