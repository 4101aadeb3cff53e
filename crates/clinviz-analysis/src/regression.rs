//! Least-squares regression line for scatter plots
//!
//! Records are filtered pairwise (both fields must coerce), a line is fitted
//! with [`LinearFit`], and the result carries the point cloud together with
//! the two line endpoints at the observed x range.

use clinviz_stats::regression::{LinearFit, LinearFitError};
use serde::Serialize;

use crate::{coerce, error::AnalysisError, point::Point, record::Dataset};

/// Fitted line plus the data it was fitted to.
///
/// Both entries of `line` lie exactly on `y = slope * x + intercept`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionResult {
    pub x_field: String,
    pub y_field: String,
    pub slope: f64,
    pub intercept: f64,
    /// Filtered `(x, y)` pairs in input order.
    pub points: Vec<Point>,
    /// `[(min_x, ŷ(min_x)), (max_x, ŷ(max_x))]`.
    pub line: [Point; 2],
    /// Number of records dropped by pairwise filtering.
    pub dropped: usize,
}

impl RegressionResult {
    /// Evaluates the fitted line at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits `y_field` against `x_field` by ordinary least squares.
///
/// # Errors
///
/// * [`AnalysisError::InsufficientData`] - fewer than two usable pairs
/// * [`AnalysisError::NoXVariance`] - every usable x is the same
/// * [`AnalysisError::NonFiniteFit`] - the values are so large that the
///   slope or intercept is not finite
/// * plus the dataset/field validation errors of [`coerce::require_field`]
///
/// # Examples
///
/// ```
/// use clinviz_analysis::{point::Point, record::{Dataset, Record}, regression};
///
/// let dataset: Dataset = [(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]
///     .into_iter()
///     .map(|(x, y)| Record::new().with("dose", x).with("response", y))
///     .collect();
///
/// let result = regression::fit_line(&dataset, "dose", "response").unwrap();
/// assert_eq!(result.slope, 2.0);
/// assert_eq!(result.intercept, 0.0);
/// assert_eq!(result.line, [Point::new(1.0, 2.0), Point::new(3.0, 6.0)]);
/// ```
pub fn fit_line(
    dataset: &Dataset,
    x_field: &str,
    y_field: &str,
) -> Result<RegressionResult, AnalysisError> {
    let coerce::CoercedPairs { points, dropped } =
        coerce::coerce_pairs(dataset, x_field, y_field)?;

    let fit = LinearFit::from_points(&points).map_err(|e| match e {
        LinearFitError::TooFewPoints { found } => AnalysisError::InsufficientData {
            field: format!("{x_field}, {y_field}"),
            required: 2,
            found,
            dropped,
        },
        LinearFitError::NoXVariance => AnalysisError::NoXVariance {
            x_field: x_field.to_owned(),
            count: points.len(),
        },
        LinearFitError::NonFiniteFit => AnalysisError::NonFiniteFit {
            x_field: x_field.to_owned(),
            y_field: y_field.to_owned(),
        },
    })?;

    let min_x = points.iter().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
    let max_x = points
        .iter()
        .map(|(x, _)| *x)
        .fold(f64::NEG_INFINITY, f64::max);

    Ok(RegressionResult {
        x_field: x_field.to_owned(),
        y_field: y_field.to_owned(),
        slope: fit.slope,
        intercept: fit.intercept,
        line: [
            Point::new(min_x, fit.predict(min_x)),
            Point::new(max_x, fit.predict(max_x)),
        ],
        points: points.into_iter().map(Point::from).collect(),
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn dataset(value: serde_json::Value) -> Dataset {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_perfect_line() {
        let data = dataset(json!([
            {"x": 1, "y": 2},
            {"x": 2, "y": 4},
            {"x": 3, "y": 6}
        ]));
        let result = fit_line(&data, "x", "y").unwrap();
        assert_eq!(result.slope, 2.0);
        assert_eq!(result.intercept, 0.0);
        assert_eq!(result.line, [Point::new(1.0, 2.0), Point::new(3.0, 6.0)]);
        assert_eq!(result.points.len(), 3);
        assert_eq!(result.dropped, 0);
    }

    #[test]
    fn test_endpoints_use_observed_range_and_lie_on_line() {
        let data = dataset(json!([
            {"x": 4.5, "y": 1.2},
            {"x": -1.25, "y": 7.9},
            {"x": 2, "y": 3.3},
            {"x": 0.5, "y": 5.0}
        ]));
        let result = fit_line(&data, "x", "y").unwrap();
        let [start, end] = result.line;
        assert_eq!(start.x, -1.25);
        assert_eq!(end.x, 4.5);
        assert_eq!(start.y, result.slope * start.x + result.intercept);
        assert_eq!(end.y, result.predict(end.x));
        assert!(result.slope < 0.0);
    }

    #[test]
    fn test_points_keep_input_order() {
        let data = dataset(json!([
            {"x": 3, "y": 1},
            {"x": 1, "y": "?"},
            {"x": 2, "y": 5},
            {"y": 4}
        ]));
        let result = fit_line(&data, "x", "y").unwrap();
        assert_eq!(
            result.points,
            vec![Point::new(3.0, 1.0), Point::new(2.0, 5.0)]
        );
        assert_eq!(result.dropped, 2);
    }

    #[test]
    fn test_constant_x_is_degenerate() {
        let data = dataset(json!([{"x": 5, "y": 1}, {"x": 5, "y": 9}]));
        let err = fit_line(&data, "x", "y").unwrap_err();
        assert_eq!(
            err,
            AnalysisError::NoXVariance {
                x_field: "x".into(),
                count: 2
            }
        );
        assert!(err.kind().is_degenerate_computation());
    }

    #[test]
    fn test_overflowing_values_are_degenerate() {
        let data = dataset(json!([{"x": 0, "y": 1e308}, {"x": 1, "y": 1e308}]));
        let err = fit_line(&data, "x", "y").unwrap_err();
        assert_eq!(
            err,
            AnalysisError::NonFiniteFit {
                x_field: "x".into(),
                y_field: "y".into()
            }
        );
        assert!(err.kind().is_degenerate_computation());
    }

    #[test]
    fn test_single_point_is_insufficient() {
        let data = dataset(json!([{"x": 1, "y": 1}, {"x": "a", "y": 2}]));
        let err = fit_line(&data, "x", "y").unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InsufficientData {
                field: "x, y".into(),
                required: 2,
                found: 1,
                dropped: 1,
            }
        );
        assert!(err.kind().is_invalid_input());
    }

    #[test]
    fn test_unknown_field() {
        let data = dataset(json!([{"x": 1, "y": 1}]));
        assert_eq!(
            fit_line(&data, "x", "z"),
            Err(AnalysisError::UnknownField { field: "z".into() })
        );
    }

    #[test]
    fn test_idempotent() {
        let data = dataset(json!([
            {"x": 0.1, "y": 0.3},
            {"x": 0.2, "y": 0.1},
            {"x": 0.7, "y": 0.9}
        ]));
        assert_eq!(fit_line(&data, "x", "y"), fit_line(&data, "x", "y"));
    }
}
