//! Thermodynamics calculator state.

use std::fmt;

use labkit_calc::thermodynamics::{
    self, DEFAULT_TEMPERATURE_RANGE, SERIES_POINTS, ThermodynamicsInput, ThermodynamicsMode,
    VantHoffFit, celsius_to_kelvin,
};
use labkit_calc::{CalcError, CalcResult, Point, Series};
use labkit_primitives::{InstanceId, ToolId};
use tracing::debug;

use crate::controller::{Cycle, FieldValue, ToolController, field_value};
use crate::event::{StateEvent, SubscriptionId};
use crate::field::{Change, Field, SameValue};
use crate::notifier::{Listener, Notifier};
use crate::{StateError, StateResult};

const MODE_NAMES: [&str; 6] = [
    "gibbs_free_energy",
    "enthalpy",
    "entropy",
    "temperature",
    "equilibrium_constant",
    "gibbs_from_k",
];

/// Standard temperature used as the initial value.
const STANDARD_TEMPERATURE: f64 = 298.15;

/// Quantities handled by the thermodynamics tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThermodynamicsField {
    /// ΔG in kJ/mol.
    DeltaG,
    /// ΔH in kJ/mol.
    DeltaH,
    /// ΔS in J/(mol·K).
    DeltaS,
    /// T in K.
    Temperature,
    /// K, dimensionless.
    EquilibriumConstant,
}

impl ThermodynamicsField {
    /// All fields in display order.
    pub const ALL: [Self; 5] = [
        Self::DeltaG,
        Self::DeltaH,
        Self::DeltaS,
        Self::Temperature,
        Self::EquilibriumConstant,
    ];

    /// Machine-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DeltaG => "delta_g",
            Self::DeltaH => "delta_h",
            Self::DeltaS => "delta_s",
            Self::Temperature => "temperature",
            Self::EquilibriumConstant => "equilibrium_constant",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DeltaG => "Gibbs free energy (ΔG)",
            Self::DeltaH => "Enthalpy (ΔH)",
            Self::DeltaS => "Entropy (ΔS)",
            Self::Temperature => "Temperature (T)",
            Self::EquilibriumConstant => "Equilibrium constant (K)",
        }
    }

    /// Units of the quantity.
    #[must_use]
    pub const fn units(self) -> &'static str {
        match self {
            Self::DeltaG | Self::DeltaH => "kJ/mol",
            Self::DeltaS => "J/mol·K",
            Self::Temperature => "K",
            Self::EquilibriumConstant => "",
        }
    }

    /// Field derived in `mode`.
    #[must_use]
    pub const fn derived_in(mode: ThermodynamicsMode) -> Self {
        match mode {
            ThermodynamicsMode::GibbsFreeEnergy | ThermodynamicsMode::GibbsFromK => Self::DeltaG,
            ThermodynamicsMode::Enthalpy => Self::DeltaH,
            ThermodynamicsMode::Entropy => Self::DeltaS,
            ThermodynamicsMode::Temperature => Self::Temperature,
            ThermodynamicsMode::EquilibriumConstant => Self::EquilibriumConstant,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

/// State for one thermodynamics calculator instance.
///
/// Starts in ΔG mode at 298.15 K with K = 1 and every energy at zero.
/// `(T, K)` measurements added with [`add_measurement`](Self::add_measurement)
/// feed a van't Hoff fit once two or more are present.
pub struct ThermodynamicsController {
    tool_id: ToolId,
    instance_id: InstanceId,
    mode: Field<ThermodynamicsMode>,
    delta_g: Field<f64>,
    delta_h: Field<f64>,
    delta_s: Field<f64>,
    temperature: Field<f64>,
    equilibrium_constant: Field<f64>,
    temperature_range: Field<(f64, f64)>,
    measurements: Vec<(f64, f64)>,
    fit: Option<VantHoffFit>,
    last_error: Option<CalcError>,
    notifier: Notifier,
}

impl fmt::Debug for ThermodynamicsController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThermodynamicsController")
            .field("tool_id", &self.tool_id)
            .field("instance_id", &self.instance_id)
            .field("mode", &self.mode.get())
            .field("input", &self.input())
            .field("measurements", &self.measurements.len())
            .finish_non_exhaustive()
    }
}

impl ThermodynamicsController {
    /// Creates a controller in its initial state.
    #[must_use]
    pub fn new(tool_id: ToolId) -> Self {
        Self::with_temperature_range(tool_id, DEFAULT_TEMPERATURE_RANGE)
    }

    /// Creates a controller whose plots span `range` (K). An invalid range falls
    /// back to the default 200-400 K.
    #[must_use]
    pub fn with_temperature_range(tool_id: ToolId, range: (f64, f64)) -> Self {
        let range = if thermodynamics::validate_temperature_range(range).is_ok() {
            range
        } else {
            DEFAULT_TEMPERATURE_RANGE
        };
        let mut controller = Self {
            tool_id,
            instance_id: InstanceId::random(),
            mode: Field::new("mode", ThermodynamicsMode::default()),
            delta_g: Field::new(ThermodynamicsField::DeltaG.name(), 0.0),
            delta_h: Field::new(ThermodynamicsField::DeltaH.name(), 0.0),
            delta_s: Field::new(ThermodynamicsField::DeltaS.name(), 0.0),
            temperature: Field::new(ThermodynamicsField::Temperature.name(), STANDARD_TEMPERATURE),
            equilibrium_constant: Field::new(ThermodynamicsField::EquilibriumConstant.name(), 1.0),
            temperature_range: Field::new("temperature_range", range),
            measurements: Vec::new(),
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
    pub fn calculation_mode(&self) -> ThermodynamicsMode {
        self.mode.get()
    }

    /// ΔG (kJ/mol).
    #[must_use]
    pub fn delta_g(&self) -> f64 {
        self.delta_g.get()
    }

    /// ΔH (kJ/mol).
    #[must_use]
    pub fn delta_h(&self) -> f64 {
        self.delta_h.get()
    }

    /// ΔS (J/(mol·K)).
    #[must_use]
    pub fn delta_s(&self) -> f64 {
        self.delta_s.get()
    }

    /// T (K).
    #[must_use]
    pub fn temperature(&self) -> f64 {
        self.temperature.get()
    }

    /// K.
    #[must_use]
    pub fn equilibrium_constant(&self) -> f64 {
        self.equilibrium_constant.get()
    }

    /// Plot temperature range (K).
    #[must_use]
    pub fn temperature_range(&self) -> (f64, f64) {
        self.temperature_range.get()
    }

    /// The quantity computed in the active mode.
    #[must_use]
    pub fn derived_field(&self) -> ThermodynamicsField {
        ThermodynamicsField::derived_in(self.mode.get())
    }

    /// Collected `(T, K)` measurements.
    #[must_use]
    pub fn measurements(&self) -> &[(f64, f64)] {
        &self.measurements
    }

    /// Current van't Hoff fit.
    #[must_use]
    pub fn van_t_hoff(&self) -> Option<&VantHoffFit> {
        self.fit.as_ref()
    }

    /// Switches which quantity is derived.
    pub fn set_calculation_mode(&mut self, mode: ThermodynamicsMode) -> Change<ThermodynamicsMode> {
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

    /// Sets ΔG.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ReadOnlyField`] when ΔG is derived.
    pub fn set_delta_g(&mut self, value: f64) -> StateResult<Change<f64>> {
        self.set(ThermodynamicsField::DeltaG, value)
    }

    /// Sets ΔH.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ReadOnlyField`] in enthalpy mode.
    pub fn set_delta_h(&mut self, value: f64) -> StateResult<Change<f64>> {
        self.set(ThermodynamicsField::DeltaH, value)
    }

    /// Sets ΔS.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ReadOnlyField`] in entropy mode.
    pub fn set_delta_s(&mut self, value: f64) -> StateResult<Change<f64>> {
        self.set(ThermodynamicsField::DeltaS, value)
    }

    /// Sets T in Kelvin.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ReadOnlyField`] in temperature mode.
    pub fn set_temperature(&mut self, kelvin: f64) -> StateResult<Change<f64>> {
        self.set(ThermodynamicsField::Temperature, kelvin)
    }

    /// Sets T from a Celsius reading.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ReadOnlyField`] in temperature mode.
    pub fn set_temperature_celsius(&mut self, celsius: f64) -> StateResult<Change<f64>> {
        self.set(ThermodynamicsField::Temperature, celsius_to_kelvin(celsius))
    }

    /// Sets K.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ReadOnlyField`] in equilibrium-constant mode.
    pub fn set_equilibrium_constant(&mut self, value: f64) -> StateResult<Change<f64>> {
        self.set(ThermodynamicsField::EquilibriumConstant, value)
    }

    /// Sets any non-derived quantity.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ReadOnlyField`] when `field` is derived in the
    /// active mode.
    pub fn set(&mut self, field: ThermodynamicsField, value: f64) -> StateResult<Change<f64>> {
        if field == self.derived_field() {
            return Err(StateError::ReadOnlyField {
                field: field.name(),
                mode: self.mode.get().as_str(),
            });
        }

        let before = self.energies();
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
            let after = self.energies();
            if !before.iter().zip(&after).all(|(a, b)| a.same_value(b)) {
                cycle.push(StateEvent::SeriesUpdated { series: "temperature_dependence" });
            }
            cycle.finish(&self.notifier);
        }
        Ok(change)
    }

    /// Changes the plot temperature range. An invalid range is rejected with an
    /// [`StateEvent::InvalidInput`] and leaves the previous range in place.
    pub fn set_temperature_range(&mut self, t_min: f64, t_max: f64) -> Change<(f64, f64)> {
        if let Err(err) = thermodynamics::validate_temperature_range((t_min, t_max)) {
            let mut cycle = Cycle::new();
            cycle.invalid(&self.tool_id, self.instance_id, &err);
            self.last_error = Some(err);
            cycle.finish(&self.notifier);
            return Change::Unchanged;
        }
        let change = self.temperature_range.replace((t_min, t_max));
        let mut cycle = if change.is_changed() {
            let mut cycle = Cycle::changed("temperature_range");
            cycle.push(StateEvent::SeriesUpdated { series: "temperature_dependence" });
            cycle
        } else if self.last_error.is_some() {
            Cycle::new()
        } else {
            return change;
        };
        // Clears a status left behind by a rejected range.
        self.recompute(&mut cycle);
        cycle.finish(&self.notifier);
        change
    }

    /// Adds a `(T, K)` measurement for the van't Hoff fit. Returns `false` and
    /// surfaces an [`StateEvent::InvalidInput`] when either value is not positive.
    pub fn add_measurement(&mut self, temperature: f64, equilibrium_constant: f64) -> bool {
        let valid = [temperature, equilibrium_constant]
            .into_iter()
            .all(|v| v.is_finite() && v > 0.0);
        if !valid {
            let err = CalcError::invalid("temperature and equilibrium constant must be positive");
            let mut cycle = Cycle::new();
            cycle.invalid(&self.tool_id, self.instance_id, &err);
            self.last_error = Some(err);
            cycle.finish(&self.notifier);
            return false;
        }
        self.measurements.push((temperature, equilibrium_constant));
        self.measurements_changed();
        true
    }

    /// Removes the measurement at `index`, if present.
    pub fn remove_measurement(&mut self, index: usize) -> Option<(f64, f64)> {
        if index >= self.measurements.len() {
            return None;
        }
        let removed = self.measurements.remove(index);
        self.measurements_changed();
        Some(removed)
    }

    /// Removes every measurement.
    pub fn clear_measurements(&mut self) {
        if self.measurements.is_empty() {
            return;
        }
        self.measurements.clear();
        self.measurements_changed();
    }

    /// ΔG against T for the current ΔH and ΔS.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidInput`] when ΔH or ΔS is not finite.
    pub fn gibbs_series(&self) -> CalcResult<Series> {
        thermodynamics::gibbs_vs_temperature(
            self.delta_h.get(),
            self.delta_s.get(),
            self.temperature_range.get(),
            SERIES_POINTS,
        )
    }

    /// K against T for the current ΔG.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidInput`] when ΔG is not finite.
    pub fn equilibrium_series(&self) -> CalcResult<Series> {
        thermodynamics::equilibrium_vs_temperature(
            self.delta_g.get(),
            self.temperature_range.get(),
            SERIES_POINTS,
        )
    }

    fn input(&self) -> ThermodynamicsInput {
        ThermodynamicsInput {
            delta_g: self.delta_g.get(),
            delta_h: self.delta_h.get(),
            delta_s: self.delta_s.get(),
            temperature: self.temperature.get(),
            equilibrium_constant: self.equilibrium_constant.get(),
        }
    }

    /// ΔG, ΔH and ΔS: the only inputs of the ΔG(T) and K(T) series.
    fn energies(&self) -> [f64; 3] {
        [self.delta_g.get(), self.delta_h.get(), self.delta_s.get()]
    }

    fn field(&self, field: ThermodynamicsField) -> &Field<f64> {
        match field {
            ThermodynamicsField::DeltaG => &self.delta_g,
            ThermodynamicsField::DeltaH => &self.delta_h,
            ThermodynamicsField::DeltaS => &self.delta_s,
            ThermodynamicsField::Temperature => &self.temperature,
            ThermodynamicsField::EquilibriumConstant => &self.equilibrium_constant,
        }
    }

    fn field_mut(&mut self, field: ThermodynamicsField) -> &mut Field<f64> {
        match field {
            ThermodynamicsField::DeltaG => &mut self.delta_g,
            ThermodynamicsField::DeltaH => &mut self.delta_h,
            ThermodynamicsField::DeltaS => &mut self.delta_s,
            ThermodynamicsField::Temperature => &mut self.temperature,
            ThermodynamicsField::EquilibriumConstant => &mut self.equilibrium_constant,
        }
    }

    fn measurements_changed(&mut self) {
        let mut cycle = Cycle::changed("measurements");
        cycle.push(StateEvent::SeriesUpdated { series: "van_t_hoff" });
        self.recompute(&mut cycle);
        cycle.finish(&self.notifier);
    }

    fn recompute(&mut self, cycle: &mut Cycle) {
        let mode = self.mode.get();
        let derived = ThermodynamicsField::derived_in(mode);
        let mut error = None;

        match thermodynamics::solve(&self.input(), mode) {
            Ok(result) => cycle.output(self.field_mut(derived), result.value),
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
        if self.measurements.len() < 2 {
            self.fit = None;
            return Ok(());
        }
        let next = thermodynamics::van_t_hoff(&self.measurements)?;
        let previous = self.fit.replace(next);
        for (name, old, new) in [
            ("vant_hoff_delta_h", previous.map(|f| f.delta_h), next.delta_h),
            ("vant_hoff_delta_s", previous.map(|f| f.delta_s), next.delta_s),
            ("vant_hoff_r_squared", previous.map(|f| f.fit.r_squared), next.fit.r_squared),
        ] {
            if !old.is_some_and(|old| old.same_value(&new)) {
                cycle.push(StateEvent::ResultComputed { field: name, value: new });
            }
        }
        Ok(())
    }
}

impl ToolController for ThermodynamicsController {
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
            .parse::<ThermodynamicsMode>()
            .map_err(|_| StateError::UnknownMode {
                tool: self.tool_id.clone(),
                mode: mode.to_owned(),
            })?;
        Ok(self.set_calculation_mode(mode).is_changed())
    }

    fn inputs(&self) -> Vec<FieldValue> {
        let derived = self.derived_field();
        ThermodynamicsField::ALL
            .into_iter()
            .filter(|field| *field != derived)
            .map(|field| field_value(self.field(field), field.label(), field.units()))
            .collect()
    }

    fn outputs(&self) -> Vec<FieldValue> {
        let derived = self.derived_field();
        let mut outputs = vec![field_value(self.field(derived), derived.label(), derived.units())];
        if let Some(fit) = &self.fit {
            outputs.extend([
                FieldValue {
                    name: "vant_hoff_delta_h",
                    label: "van't Hoff ΔH",
                    units: "kJ/mol",
                    value: fit.delta_h,
                },
                FieldValue {
                    name: "vant_hoff_delta_s",
                    label: "van't Hoff ΔS",
                    units: "J/mol·K",
                    value: fit.delta_s,
                },
                FieldValue {
                    name: "vant_hoff_r_squared",
                    label: "van't Hoff R²",
                    units: "",
                    value: fit.fit.r_squared,
                },
            ]);
        }
        outputs
    }

    fn set_input(&mut self, field: &str, value: f64) -> StateResult<bool> {
        if field == "temperature_c" {
            return Ok(self.set_temperature_celsius(value)?.is_changed());
        }
        let Some(field) = ThermodynamicsField::from_name(field) else {
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
        let mut series: Vec<Series> = [self.gibbs_series(), self.equilibrium_series()]
            .into_iter()
            .filter_map(Result::ok)
            .collect();
        if let Some(fit) = &self.fit {
            let inverse: Vec<Point> = self
                .measurements
                .iter()
                .map(|&(t, k)| Point::new(1.0 / t, k.ln()))
                .collect();
            let x_min = inverse.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
            let x_max = inverse.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
            series.push(
                Series::new("van't Hoff data", "1/T (K⁻¹)", "ln(K)").with_points(inverse),
            );
            series.push(fit.line(x_min, x_max, SERIES_POINTS));
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
