//! Plot-ready data series.

use serde::{Deserialize, Serialize};

/// One `(x, y)` sample.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Abscissa.
    pub x: f64,
    /// Ordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A labelled sequence of points handed to a plotting collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Title of the series.
    pub title: String,
    /// Label of the x axis, including units.
    pub x_label: String,
    /// Label of the y axis, including units.
    pub y_label: String,
    /// Whether the y axis should use a logarithmic scale.
    #[serde(default)]
    pub log_y: bool,
    /// Samples in ascending x order.
    pub points: Vec<Point>,
}

impl Series {
    /// Creates an empty series with the given labels.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            log_y: false,
            points: Vec::new(),
        }
    }

    /// Marks the y axis as logarithmic.
    #[must_use]
    pub fn with_log_y(mut self) -> Self {
        self.log_y = true;
        self
    }

    /// Replaces the samples.
    #[must_use]
    pub fn with_points(mut self, points: Vec<Point>) -> Self {
        self.points = points;
        self
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` when the series holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Returns `count` evenly spaced values from `start` to `end` inclusive.
#[must_use]
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            #[allow(clippy::cast_precision_loss)]
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        end
                    } else {
                        #[allow(clippy::cast_precision_loss)]
                        let offset = step * i as f64;
                        start + offset
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_hits_both_ends() {
        let values = linspace(200.0, 400.0, 5);
        assert_eq!(values, vec![200.0, 250.0, 300.0, 350.0, 400.0]);
    }

    #[test]
    fn linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
    }

    #[test]
    fn series_builder() {
        let series = Series::new("K vs T", "T (K)", "K")
            .with_log_y()
            .with_points(vec![Point::new(1.0, 2.0), (3.0, 4.0).into()]);
        assert!(series.log_y);
        assert_eq!(series.len(), 2);
        assert_eq!(series.points[1], Point::new(3.0, 4.0));
    }
}
