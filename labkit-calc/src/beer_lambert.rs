//! Beer-Lambert law: `A = ε · l · c`.
//!
//! - `A`: absorbance (unitless)
//! - `ε`: molar absorptivity (M⁻¹ cm⁻¹)
//! - `l`: path length (cm)
//! - `c`: concentration (M)
//!
//! Any one quantity can be solved for from the other three, and a standard
//! curve (absorbance against concentration) can be fitted to recover `ε · l`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive};
use crate::regression::{LinearFit, fit_line};
use crate::series::{Point, linspace};
use crate::{CalcError, CalcResult};

/// Which quantity of the law is derived from the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeerLambertMode {
    /// `A = ε · l · c`
    #[default]
    Absorbance,
    /// `c = A / (ε · l)`
    Concentration,
    /// `ε = A / (l · c)`
    Epsilon,
    /// `l = A / (ε · c)`
    PathLength,
}

impl BeerLambertMode {
    /// All modes in menu order.
    pub const ALL: [Self; 4] = [
        Self::Absorbance,
        Self::Concentration,
        Self::Epsilon,
        Self::PathLength,
    ];

    /// Stable machine-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Absorbance => "absorbance",
            Self::Concentration => "concentration",
            Self::Epsilon => "epsilon",
            Self::PathLength => "path_length",
        }
    }

    /// Equation solved in this mode.
    #[must_use]
    pub const fn equation(self) -> &'static str {
        match self {
            Self::Absorbance => "A = ε · l · c",
            Self::Concentration => "c = A / (ε · l)",
            Self::Epsilon => "ε = A / (l · c)",
            Self::PathLength => "l = A / (ε · c)",
        }
    }
}

impl fmt::Display for BeerLambertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BeerLambertMode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| CalcError::invalid(format!("unknown Beer-Lambert mode `{s}`")))
    }
}

/// The four quantities of the law. The one selected by the mode is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BeerLambertInput {
    /// Molar absorptivity (M⁻¹ cm⁻¹).
    pub epsilon: f64,
    /// Path length (cm).
    pub path_length: f64,
    /// Concentration (M).
    pub concentration: f64,
    /// Absorbance (unitless).
    pub absorbance: f64,
}

/// Computes `A = ε · l · c`.
///
/// # Errors
///
/// Returns [`CalcError::InvalidInput`] when any argument is negative or not
/// finite.
pub fn absorbance(epsilon: f64, path_length: f64, concentration: f64) -> CalcResult<f64> {
    ensure_non_negative("epsilon", epsilon)?;
    ensure_non_negative("path length", path_length)?;
    ensure_non_negative("concentration", concentration)?;
    Ok(epsilon * path_length * concentration)
}

/// Solves for the quantity selected by `mode`.
///
/// # Errors
///
/// Returns [`CalcError::InvalidInput`] when a used quantity is negative or not
/// finite, or when a divisor is zero.
pub fn solve(input: &BeerLambertInput, mode: BeerLambertMode) -> CalcResult<f64> {
    match mode {
        BeerLambertMode::Absorbance => {
            absorbance(input.epsilon, input.path_length, input.concentration)
        }
        BeerLambertMode::Concentration => {
            let a = ensure_non_negative("absorbance", input.absorbance)?;
            let e = ensure_positive("epsilon", input.epsilon)?;
            let l = ensure_positive("path length", input.path_length)?;
            Ok(a / (e * l))
        }
        BeerLambertMode::Epsilon => {
            let a = ensure_non_negative("absorbance", input.absorbance)?;
            let l = ensure_positive("path length", input.path_length)?;
            let c = ensure_positive("concentration", input.concentration)?;
            Ok(a / (l * c))
        }
        BeerLambertMode::PathLength => {
            let a = ensure_non_negative("absorbance", input.absorbance)?;
            let e = ensure_positive("epsilon", input.epsilon)?;
            let c = ensure_positive("concentration", input.concentration)?;
            Ok(a / (e * c))
        }
    }
}

/// One measured standard: a known concentration and its absorbance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Concentration (M).
    pub concentration: f64,
    /// Absorbance (unitless).
    pub absorbance: f64,
}

impl DataPoint {
    /// Creates a validated data point.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::InvalidInput`] when either value is negative or not
    /// finite.
    pub fn new(concentration: f64, absorbance: f64) -> CalcResult<Self> {
        ensure_non_negative("concentration", concentration)?;
        ensure_non_negative("absorbance", absorbance)?;
        Ok(Self {
            concentration,
            absorbance,
        })
    }
}

impl From<DataPoint> for Point {
    fn from(value: DataPoint) -> Self {
        Point::new(value.concentration, value.absorbance)
    }
}

/// Standard curve regression: the slope equals `ε · l`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardCurveFit {
    /// Underlying least-squares fit of absorbance on concentration.
    pub fit: LinearFit,
    /// `slope / l`, present when a positive path length was supplied.
    pub epsilon: Option<f64>,
}

/// Fits absorbance against concentration.
///
/// # Errors
///
/// Returns [`CalcError::InsufficientData`] for fewer than two points and
/// [`CalcError::InvalidInput`] for negative values or a single distinct
/// concentration.
pub fn linear_regression(
    points: &[DataPoint],
    path_length: Option<f64>,
) -> CalcResult<StandardCurveFit> {
    for point in points {
        ensure_non_negative("concentration", point.concentration)?;
        ensure_non_negative("absorbance", point.absorbance)?;
    }
    let samples: Vec<Point> = points.iter().copied().map(Point::from).collect();
    let fit = fit_line(&samples)?;
    let epsilon = path_length
        .filter(|l| l.is_finite() && *l > 0.0)
        .map(|l| fit.slope / l);
    Ok(StandardCurveFit { fit, epsilon })
}

/// Generates `count` theoretical points from zero to `max_concentration`.
///
/// # Errors
///
/// Returns [`CalcError::InvalidInput`] unless `epsilon`, `path_length` and
/// `max_concentration` are positive.
pub fn standard_curve(
    epsilon: f64,
    path_length: f64,
    max_concentration: f64,
    count: usize,
) -> CalcResult<Vec<DataPoint>> {
    ensure_positive("epsilon", epsilon)?;
    ensure_positive("path length", path_length)?;
    ensure_positive("max concentration", max_concentration)?;
    Ok(linspace(0.0, max_concentration, count)
        .into_iter()
        .map(|concentration| DataPoint {
            concentration,
            absorbance: epsilon * path_length * concentration,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1.0)
    }

    fn input(epsilon: f64, path_length: f64, concentration: f64, absorbance: f64) -> BeerLambertInput {
        BeerLambertInput {
            epsilon,
            path_length,
            concentration,
            absorbance,
        }
    }

    #[test]
    fn absorbance_is_product() {
        assert_eq!(absorbance(1.0, 2.0, 0.5), Ok(1.0));
        assert_eq!(absorbance(0.0, 0.0, 0.0), Ok(0.0));
    }

    #[test]
    fn each_mode_inverts_the_law() {
        let i = input(43_824.0, 1.0, 2.0e-5, 0.876_48);
        assert!(close(solve(&i, BeerLambertMode::Absorbance).unwrap(), 0.876_48));
        assert!(close(solve(&i, BeerLambertMode::Concentration).unwrap(), 2.0e-5));
        assert!(close(solve(&i, BeerLambertMode::Epsilon).unwrap(), 43_824.0));
        assert!(close(solve(&i, BeerLambertMode::PathLength).unwrap(), 1.0));
    }

    #[test]
    fn negative_concentration_is_invalid() {
        let err = solve(&input(1.0, 1.0, -0.1, 0.0), BeerLambertMode::Absorbance).unwrap_err();
        assert_eq!(err, CalcError::invalid("concentration cannot be negative"));
    }

    #[test]
    fn zero_divisor_is_invalid() {
        let err = solve(&input(0.0, 1.0, 0.0, 0.5), BeerLambertMode::Concentration).unwrap_err();
        assert_eq!(err, CalcError::invalid("epsilon must be positive"));
    }

    #[test]
    fn mode_names_round_trip() {
        for mode in BeerLambertMode::ALL {
            assert_eq!(mode.as_str().parse::<BeerLambertMode>().unwrap(), mode);
        }
        assert!("bogus".parse::<BeerLambertMode>().is_err());
        assert_eq!(
            serde_json::to_string(&BeerLambertMode::PathLength).unwrap(),
            "\"path_length\""
        );
    }

    #[test]
    fn regression_recovers_epsilon() {
        let points: Vec<DataPoint> = [0.0, 1.0e-5, 2.0e-5, 4.0e-5]
            .into_iter()
            .map(|c| DataPoint::new(c, 6220.0 * 0.5 * c).unwrap())
            .collect();
        let result = linear_regression(&points, Some(0.5)).unwrap();
        assert!(close(result.fit.slope, 3110.0));
        assert!(close(result.epsilon.unwrap(), 6220.0));
        assert!(close(result.fit.r_squared, 1.0));

        let without_path = linear_regression(&points, None).unwrap();
        assert!(without_path.epsilon.is_none());
    }

    #[test]
    fn regression_rejects_negative_points() {
        let points = [
            DataPoint {
                concentration: -1.0,
                absorbance: 0.0,
            },
            DataPoint {
                concentration: 1.0,
                absorbance: 1.0,
            },
        ];
        assert!(linear_regression(&points, None).is_err());
        assert!(DataPoint::new(0.1, -0.2).is_err());
    }

    #[test]
    fn standard_curve_spans_range() {
        let curve = standard_curve(1000.0, 1.0, 1.0e-4, 11).unwrap();
        assert_eq!(curve.len(), 11);
        assert_eq!(curve[0].concentration, 0.0);
        assert_eq!(curve[10].concentration, 1.0e-4);
        assert!(close(curve[10].absorbance, 0.1));
        assert!(standard_curve(0.0, 1.0, 1.0, 3).is_err());
    }
}
