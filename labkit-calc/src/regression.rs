//! Ordinary least-squares line fitting.

use serde::{Deserialize, Serialize};

use crate::series::Point;
use crate::{CalcError, CalcResult};

/// Result of fitting `y = slope * x + intercept`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// Fitted slope.
    pub slope: f64,
    /// Fitted y-intercept.
    pub intercept: f64,
    /// Coefficient of determination; `0.0` when all y values are equal.
    pub r_squared: f64,
    /// Standard error of the slope; `0.0` for exactly two points.
    pub slope_std_error: f64,
}

impl LinearFit {
    /// Evaluates the fitted line at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits a straight line through `points`.
///
/// # Errors
///
/// Returns [`CalcError::InsufficientData`] for fewer than two points and
/// [`CalcError::InvalidInput`] when a coordinate is not finite or every x value
/// is identical.
#[allow(clippy::cast_precision_loss)]
pub fn fit_line(points: &[Point]) -> CalcResult<LinearFit> {
    if points.len() < 2 {
        return Err(CalcError::InsufficientData {
            required: 2,
            actual: points.len(),
        });
    }
    if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(CalcError::invalid("data points must be finite numbers"));
    }

    let n = points.len() as f64;
    let x_mean = points.iter().map(|p| p.x).sum::<f64>() / n;
    let y_mean = points.iter().map(|p| p.y).sum::<f64>() / n;

    let (numerator, denominator) = points.iter().fold((0.0, 0.0), |(num, den), p| {
        let dx = p.x - x_mean;
        (num + dx * (p.y - y_mean), den + dx * dx)
    });

    if denominator == 0.0 {
        return Err(CalcError::invalid(
            "need at least 2 different x values for a regression",
        ));
    }

    let slope = numerator / denominator;
    let intercept = y_mean - slope * x_mean;

    let (ss_res, ss_tot) = points.iter().fold((0.0, 0.0), |(res, tot), p| {
        let residual = p.y - (slope * p.x + intercept);
        let spread = p.y - y_mean;
        (res + residual * residual, tot + spread * spread)
    });

    let r_squared = if ss_tot == 0.0 {
        0.0
    } else {
        1.0 - ss_res / ss_tot
    };

    let slope_std_error = if points.len() > 2 {
        let mse = ss_res / (n - 2.0);
        (mse / denominator).sqrt()
    } else {
        0.0
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_squared,
        slope_std_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn exact_line_has_unit_r_squared() {
        let points: Vec<Point> = [(0.0, 1.0), (1.0, 3.0), (2.0, 5.0), (3.0, 7.0)]
            .into_iter()
            .map(Point::from)
            .collect();
        let fit = fit_line(&points).unwrap();
        assert!(close(fit.slope, 2.0));
        assert!(close(fit.intercept, 1.0));
        assert!(close(fit.r_squared, 1.0));
        assert!(close(fit.slope_std_error, 0.0));
        assert!(close(fit.predict(10.0), 21.0));
    }

    #[test]
    fn noisy_line_reports_spread() {
        let points: Vec<Point> = [(0.0, 0.1), (1.0, 0.9), (2.0, 2.2), (3.0, 2.8)]
            .into_iter()
            .map(Point::from)
            .collect();
        let fit = fit_line(&points).unwrap();
        assert!(fit.r_squared < 1.0 && fit.r_squared > 0.9);
        assert!(fit.slope_std_error > 0.0);
    }

    #[test]
    fn two_points_have_zero_std_error() {
        let fit = fit_line(&[Point::new(0.0, 0.0), Point::new(2.0, 1.0)]).unwrap();
        assert!(close(fit.slope, 0.5));
        assert!(close(fit.slope_std_error, 0.0));
    }

    #[test]
    fn rejects_degenerate_inputs() {
        let err = fit_line(&[Point::new(1.0, 1.0)]).unwrap_err();
        assert_eq!(
            err,
            CalcError::InsufficientData {
                required: 2,
                actual: 1
            }
        );

        let err = fit_line(&[Point::new(1.0, 1.0), Point::new(1.0, 2.0)]).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { .. }));
    }

    #[test]
    fn flat_data_has_zero_r_squared() {
        let fit = fit_line(&[Point::new(0.0, 2.0), Point::new(1.0, 2.0), Point::new(2.0, 2.0)])
            .unwrap();
        assert!(close(fit.slope, 0.0));
        assert!(close(fit.r_squared, 0.0));
    }
}
