//! Reaction thermodynamics.
//!
//! Relations used:
//! - Gibbs-Helmholtz: `ΔG = ΔH - TΔS`
//! - Equilibrium: `ΔG = -RT ln K`
//! - van't Hoff: `ln K = -ΔH/R · (1/T) + ΔS/R`
//!
//! Energies are in kJ/mol, entropy in J/(mol·K), temperature in K.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ensure_positive};
use crate::regression::{LinearFit, fit_line};
use crate::series::{Point, Series, linspace};
use crate::{CalcError, CalcResult};

/// Universal gas constant in J/(mol·K).
pub const GAS_CONSTANT: f64 = 8.314;

/// Offset between the Celsius and Kelvin scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Temperature range used for plots when none is configured.
pub const DEFAULT_TEMPERATURE_RANGE: (f64, f64) = (200.0, 400.0);

/// Number of samples in generated temperature series.
pub const SERIES_POINTS: usize = 100;

/// Converts a Celsius temperature to Kelvin.
#[must_use]
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

/// Which quantity is derived from the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermodynamicsMode {
    /// `ΔG = ΔH - TΔS`
    #[default]
    GibbsFreeEnergy,
    /// `ΔH = ΔG + TΔS`
    Enthalpy,
    /// `ΔS = (ΔH - ΔG) / T`
    Entropy,
    /// `T = (ΔH - ΔG) / ΔS`
    Temperature,
    /// `K = exp(-ΔG / RT)`
    EquilibriumConstant,
    /// `ΔG = -RT ln K`
    GibbsFromK,
}

impl ThermodynamicsMode {
    /// All modes in menu order.
    pub const ALL: [Self; 6] = [
        Self::GibbsFreeEnergy,
        Self::Enthalpy,
        Self::Entropy,
        Self::Temperature,
        Self::EquilibriumConstant,
        Self::GibbsFromK,
    ];

    /// Stable machine-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GibbsFreeEnergy => "gibbs_free_energy",
            Self::Enthalpy => "enthalpy",
            Self::Entropy => "entropy",
            Self::Temperature => "temperature",
            Self::EquilibriumConstant => "equilibrium_constant",
            Self::GibbsFromK => "gibbs_from_k",
        }
    }

    /// Equation solved in this mode.
    #[must_use]
    pub const fn equation(self) -> &'static str {
        match self {
            Self::GibbsFreeEnergy => "ΔG = ΔH - TΔS",
            Self::Enthalpy => "ΔH = ΔG + TΔS",
            Self::Entropy => "ΔS = (ΔH - ΔG) / T",
            Self::Temperature => "T = (ΔH - ΔG) / ΔS",
            Self::EquilibriumConstant => "K = exp(-ΔG/RT)",
            Self::GibbsFromK => "ΔG = -RT ln(K)",
        }
    }

    /// Units of the derived quantity.
    #[must_use]
    pub const fn units(self) -> &'static str {
        match self {
            Self::GibbsFreeEnergy | Self::Enthalpy | Self::GibbsFromK => "kJ/mol",
            Self::Entropy => "J/mol·K",
            Self::Temperature => "K",
            Self::EquilibriumConstant => "dimensionless",
        }
    }
}

impl fmt::Display for ThermodynamicsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThermodynamicsMode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| CalcError::invalid(format!("unknown thermodynamics mode `{s}`")))
    }
}

/// Thermodynamic quantities. Fields not used by the selected mode are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThermodynamicsInput {
    /// Gibbs free energy change (kJ/mol).
    pub delta_g: f64,
    /// Enthalpy change (kJ/mol).
    pub delta_h: f64,
    /// Entropy change (J/mol·K).
    pub delta_s: f64,
    /// Temperature (K).
    pub temperature: f64,
    /// Equilibrium constant (dimensionless).
    pub equilibrium_constant: f64,
}

/// Value computed by [`solve`] together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThermodynamicsResult {
    /// Derived value in [`ThermodynamicsResult::units`].
    pub value: f64,
    /// Mode that produced the value.
    pub mode: ThermodynamicsMode,
    /// Units of `value`.
    pub units: &'static str,
    /// Equation applied.
    pub equation: &'static str,
}

/// Solves for the quantity selected by `mode`.
///
/// # Errors
///
/// Returns [`CalcError::InvalidInput`] when a used quantity is not finite, the
/// temperature or equilibrium constant is not positive, `ΔS` is zero while
/// solving for temperature, or the solved temperature is not above 0 K.
pub fn solve(input: &ThermodynamicsInput, mode: ThermodynamicsMode) -> CalcResult<ThermodynamicsResult> {
    let value = match mode {
        ThermodynamicsMode::GibbsFreeEnergy => {
            let h = ensure_finite("ΔH", input.delta_h)?;
            let s = ensure_finite("ΔS", input.delta_s)?;
            let t = ensure_positive("temperature", input.temperature)?;
            h - t * s / 1000.0
        }
        ThermodynamicsMode::Enthalpy => {
            let g = ensure_finite("ΔG", input.delta_g)?;
            let s = ensure_finite("ΔS", input.delta_s)?;
            let t = ensure_positive("temperature", input.temperature)?;
            g + t * s / 1000.0
        }
        ThermodynamicsMode::Entropy => {
            let g = ensure_finite("ΔG", input.delta_g)?;
            let h = ensure_finite("ΔH", input.delta_h)?;
            let t = ensure_positive("temperature", input.temperature)?;
            (h - g) / t * 1000.0
        }
        ThermodynamicsMode::Temperature => {
            let g = ensure_finite("ΔG", input.delta_g)?;
            let h = ensure_finite("ΔH", input.delta_h)?;
            let s = ensure_finite("ΔS", input.delta_s)?;
            if s == 0.0 {
                return Err(CalcError::invalid("cannot calculate temperature when ΔS = 0"));
            }
            let t = (h - g) / (s / 1000.0);
            if t <= 0.0 {
                return Err(CalcError::invalid(
                    "calculated temperature is not physically meaningful (≤ 0 K)",
                ));
            }
            t
        }
        ThermodynamicsMode::EquilibriumConstant => {
            let g = ensure_finite("ΔG", input.delta_g)?;
            let t = ensure_positive("temperature", input.temperature)?;
            equilibrium_constant(g, t)
        }
        ThermodynamicsMode::GibbsFromK => {
            let k = ensure_positive("equilibrium constant", input.equilibrium_constant)?;
            let t = ensure_positive("temperature", input.temperature)?;
            -GAS_CONSTANT * t * k.ln() / 1000.0
        }
    };

    Ok(ThermodynamicsResult {
        value,
        mode,
        units: mode.units(),
        equation: mode.equation(),
    })
}

fn equilibrium_constant(delta_g: f64, temperature: f64) -> f64 {
    (-delta_g * 1000.0 / (GAS_CONSTANT * temperature)).exp()
}

/// Checks that `(t_min, t_max)` is an increasing range of positive temperatures.
///
/// # Errors
///
/// Returns [`CalcError::InvalidInput`] when either bound is not positive or the
/// bounds are not increasing.
pub fn validate_temperature_range((t_min, t_max): (f64, f64)) -> CalcResult<()> {
    ensure_positive("minimum temperature", t_min)?;
    ensure_positive("maximum temperature", t_max)?;
    if t_min >= t_max {
        return Err(CalcError::invalid(
            "minimum temperature must be below maximum temperature",
        ));
    }
    Ok(())
}

/// ΔG as a function of temperature for fixed ΔH and ΔS.
///
/// # Errors
///
/// Returns [`CalcError::InvalidInput`] for non-finite energies or an invalid
/// temperature range.
pub fn gibbs_vs_temperature(
    delta_h: f64,
    delta_s: f64,
    range: (f64, f64),
    count: usize,
) -> CalcResult<Series> {
    ensure_finite("ΔH", delta_h)?;
    ensure_finite("ΔS", delta_s)?;
    validate_temperature_range(range)?;
    let points = linspace(range.0, range.1, count)
        .into_iter()
        .map(|t| Point::new(t, delta_h - t * delta_s / 1000.0))
        .collect();
    Ok(Series::new(
        format!("ΔG vs Temperature (ΔH = {delta_h} kJ/mol, ΔS = {delta_s} J/mol·K)"),
        "Temperature (K)",
        "ΔG (kJ/mol)",
    )
    .with_points(points))
}

/// K as a function of temperature for fixed ΔG, on a logarithmic y axis.
///
/// # Errors
///
/// Returns [`CalcError::InvalidInput`] for a non-finite ΔG or an invalid
/// temperature range.
pub fn equilibrium_vs_temperature(
    delta_g: f64,
    range: (f64, f64),
    count: usize,
) -> CalcResult<Series> {
    ensure_finite("ΔG", delta_g)?;
    validate_temperature_range(range)?;
    let points = linspace(range.0, range.1, count)
        .into_iter()
        .map(|t| Point::new(t, equilibrium_constant(delta_g, t)))
        .collect();
    Ok(Series::new(
        format!("Equilibrium Constant vs Temperature (ΔG = {delta_g} kJ/mol)"),
        "Temperature (K)",
        "Equilibrium Constant (K)",
    )
    .with_log_y()
    .with_points(points))
}

/// Thermodynamic parameters recovered from a van't Hoff plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VantHoffFit {
    /// Fit of `ln K` on `1/T`.
    pub fit: LinearFit,
    /// `-slope · R`, in kJ/mol.
    pub delta_h: f64,
    /// `intercept · R`, in J/(mol·K).
    pub delta_s: f64,
}

impl VantHoffFit {
    /// The `ln K` against `1/T` regression line across `[inv_t_min, inv_t_max]`.
    #[must_use]
    pub fn line(&self, inv_t_min: f64, inv_t_max: f64, count: usize) -> Series {
        let points = linspace(inv_t_min, inv_t_max, count)
            .into_iter()
            .map(|x| Point::new(x, self.fit.predict(x)))
            .collect();
        Series::new("van't Hoff Plot", "1/T (K⁻¹)", "ln(K)").with_points(points)
    }
}

/// Fits `ln K` against `1/T` for `(temperature, K)` measurements.
///
/// # Errors
///
/// Returns [`CalcError::InsufficientData`] for fewer than two measurements and
/// [`CalcError::InvalidInput`] when a temperature or K is not positive, or all
/// temperatures are equal.
pub fn van_t_hoff(measurements: &[(f64, f64)]) -> CalcResult<VantHoffFit> {
    if measurements.len() < 2 {
        return Err(CalcError::InsufficientData {
            required: 2,
            actual: measurements.len(),
        });
    }
    let mut points = Vec::with_capacity(measurements.len());
    for &(t, k) in measurements {
        ensure_positive("temperature", t)?;
        ensure_positive("equilibrium constant", k)?;
        points.push(Point::new(1.0 / t, k.ln()));
    }
    let fit = fit_line(&points)?;
    Ok(VantHoffFit {
        fit,
        delta_h: -fit.slope * GAS_CONSTANT / 1000.0,
        delta_s: fit.intercept * GAS_CONSTANT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    fn input() -> ThermodynamicsInput {
        ThermodynamicsInput {
            delta_g: -20.0,
            delta_h: -50.0,
            delta_s: -100.0,
            temperature: 300.0,
            equilibrium_constant: 1.0,
        }
    }

    #[test]
    fn gibbs_helmholtz_modes_are_consistent() {
        let i = input();
        let g = solve(&i, ThermodynamicsMode::GibbsFreeEnergy).unwrap();
        assert!(close(g.value, -20.0));
        assert_eq!(g.units, "kJ/mol");
        assert_eq!(g.equation, "ΔG = ΔH - TΔS");

        assert!(close(solve(&i, ThermodynamicsMode::Enthalpy).unwrap().value, -50.0));
        assert!(close(solve(&i, ThermodynamicsMode::Entropy).unwrap().value, -100.0));
        assert!(close(solve(&i, ThermodynamicsMode::Temperature).unwrap().value, 300.0));
    }

    #[test]
    fn equilibrium_relations_invert() {
        let mut i = input();
        let k = solve(&i, ThermodynamicsMode::EquilibriumConstant).unwrap().value;
        assert!(k > 1.0);
        i.equilibrium_constant = k;
        let g = solve(&i, ThermodynamicsMode::GibbsFromK).unwrap().value;
        assert!(close(g, -20.0));
    }

    #[test]
    fn k_of_one_means_zero_gibbs() {
        let i = ThermodynamicsInput {
            equilibrium_constant: 1.0,
            temperature: 298.15,
            ..ThermodynamicsInput::default()
        };
        let g = solve(&i, ThermodynamicsMode::GibbsFromK).unwrap().value;
        assert!(close(g, 0.0));
    }

    #[test]
    fn rejects_unphysical_inputs() {
        let mut i = input();
        i.temperature = 0.0;
        assert!(solve(&i, ThermodynamicsMode::GibbsFreeEnergy).is_err());

        let mut i = input();
        i.delta_s = 0.0;
        let err = solve(&i, ThermodynamicsMode::Temperature).unwrap_err();
        assert_eq!(err, CalcError::invalid("cannot calculate temperature when ΔS = 0"));

        let mut i = input();
        i.delta_s = 100.0;
        assert!(solve(&i, ThermodynamicsMode::Temperature).is_err());

        let mut i = input();
        i.equilibrium_constant = -1.0;
        assert!(solve(&i, ThermodynamicsMode::GibbsFromK).is_err());
    }

    #[test]
    fn celsius_conversion() {
        assert!(close(celsius_to_kelvin(25.0), 298.15));
    }

    #[test]
    fn gibbs_series_is_linear_in_temperature() {
        let series = gibbs_vs_temperature(-50.0, -100.0, DEFAULT_TEMPERATURE_RANGE, SERIES_POINTS)
            .unwrap();
        assert_eq!(series.len(), SERIES_POINTS);
        assert!(close(series.points[0].y, -30.0));
        assert!(close(series.points[SERIES_POINTS - 1].y, -10.0));
        assert!(!series.log_y);
    }

    #[test]
    fn equilibrium_series_uses_log_axis() {
        let series = equilibrium_vs_temperature(-10.0, (250.0, 350.0), 3).unwrap();
        assert!(series.log_y);
        assert!(series.points[0].y > series.points[2].y);
        assert!(equilibrium_vs_temperature(-10.0, (350.0, 250.0), 3).is_err());
    }

    #[test]
    fn van_t_hoff_recovers_parameters() {
        let delta_h = -40.0;
        let delta_s = -80.0;
        let measurements: Vec<(f64, f64)> = [280.0, 300.0, 320.0, 340.0]
            .into_iter()
            .map(|t| {
                let g = delta_h - t * delta_s / 1000.0;
                (t, equilibrium_constant(g, t))
            })
            .collect();
        let fit = van_t_hoff(&measurements).unwrap();
        assert!(close(fit.delta_h, delta_h));
        assert!(close(fit.delta_s, delta_s));
        assert!(close(fit.fit.r_squared, 1.0));

        let line = fit.line(1.0 / 340.0, 1.0 / 280.0, 10);
        assert_eq!(line.len(), 10);
    }

    #[test]
    fn van_t_hoff_rejects_bad_data() {
        assert!(matches!(
            van_t_hoff(&[(300.0, 1.0)]),
            Err(CalcError::InsufficientData { .. })
        ));
        assert!(van_t_hoff(&[(300.0, 1.0), (310.0, 0.0)]).is_err());
    }
}
