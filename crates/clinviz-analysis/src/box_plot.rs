//! Box-plot statistics per numeric field
//!
//! For each requested field the values are coerced, sorted, and summarized
//! with nearest-rank quartiles and range-clamped fences
//! ([`BoxStats`]). Values strictly outside the fences become
//! [`Outlier`]s tagged with the field they came from.
//!
//! # Examples
//!
//! ```
//! use clinviz_analysis::{box_plot, record::{Dataset, Record}};
//!
//! let dataset: Dataset = [1.0, 2.0, 3.0, 4.0, 100.0]
//!     .into_iter()
//!     .map(|v| Record::new().with("ldl", v))
//!     .collect();
//!
//! let result = box_plot::compute_box_plot(&dataset, "ldl").unwrap();
//! assert_eq!(result.summaries[0].to_array(), [1.0, 2.0, 3.0, 4.0, 7.0]);
//! assert_eq!(result.outliers[0].value, 100.0);
//! ```

use clinviz_stats::{box_plot::BoxStats, percentiles};
use rayon::prelude::*;
use serde::Serialize;

use crate::{coerce, error::AnalysisError, record::Dataset};

/// Five-number summary of one field.
///
/// Invariant: `lower_fence <= q1 <= median <= q3 <= upper_fence`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlotSummary {
    pub field: String,
    pub lower_fence: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_fence: f64,
    /// Number of values the summary was computed from.
    pub count: usize,
    /// Number of records whose value was missing or not numeric.
    pub dropped: usize,
}

impl BoxPlotSummary {
    /// Returns `[lower_fence, q1, median, q3, upper_fence]`.
    #[must_use]
    pub fn to_array(&self) -> [f64; 5] {
        [
            self.lower_fence,
            self.q1,
            self.median,
            self.q3,
            self.upper_fence,
        ]
    }
}

/// A value lying strictly outside its field's fences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outlier {
    /// Position of the originating field in the request.
    pub field_index: usize,
    pub field: String,
    pub value: f64,
}

/// Summaries for every requested field plus all their outliers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlotResult {
    /// One summary per field, in request order.
    pub summaries: Vec<BoxPlotSummary>,
    /// Outliers of all fields, grouped by field in request order and
    /// ascending by value within a field.
    pub outliers: Vec<Outlier>,
}

impl BoxPlotResult {
    /// Total number of dropped values across all fields.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.summaries.iter().map(|s| s.dropped).sum()
    }
}

/// Computes the box plot of a single field.
pub fn compute_box_plot(dataset: &Dataset, field: &str) -> Result<BoxPlotResult, AnalysisError> {
    compute_box_plots(dataset, &[field])
}

/// Computes box plots for several fields independently.
///
/// Fields are summarized in parallel; the result (and the error reported,
/// if several fields fail) follows request order.
pub fn compute_box_plots<S>(dataset: &Dataset, fields: &[S]) -> Result<BoxPlotResult, AnalysisError>
where
    S: AsRef<str> + Sync,
{
    if dataset.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }
    if fields.is_empty() {
        return Err(AnalysisError::EmptyFieldSpec);
    }

    let per_field = fields
        .par_iter()
        .enumerate()
        .map(|(index, field)| summarize_field(dataset, index, field.as_ref()))
        .collect::<Vec<_>>();

    let mut summaries = Vec::with_capacity(fields.len());
    let mut outliers = vec![];
    for result in per_field {
        let (summary, field_outliers) = result?;
        summaries.push(summary);
        outliers.extend(field_outliers);
    }

    Ok(BoxPlotResult {
        summaries,
        outliers,
    })
}

fn summarize_field(
    dataset: &Dataset,
    field_index: usize,
    field: &str,
) -> Result<(BoxPlotSummary, Vec<Outlier>), AnalysisError> {
    let coerce::Coerced {
        values: mut sorted,
        dropped,
    } = coerce::coerce_field(dataset, field)?;
    percentiles::sort_values(&mut sorted);

    let insufficient = || AnalysisError::InsufficientData {
        field: field.to_owned(),
        required: 1,
        found: 0,
        dropped,
    };
    let stats = BoxStats::from_sorted(&sorted).ok_or_else(insufficient)?;

    let outliers = stats
        .outliers(&sorted)
        .map(|value| Outlier {
            field_index,
            field: field.to_owned(),
            value,
        })
        .collect();

    let summary = BoxPlotSummary {
        field: field.to_owned(),
        lower_fence: stats.lower_fence,
        q1: stats.q1,
        median: stats.median,
        q3: stats.q3,
        upper_fence: stats.upper_fence,
        count: sorted.len(),
        dropped,
    };
    Ok((summary, outliers))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn dataset(value: serde_json::Value) -> Dataset {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_single_field_summary() {
        let data = dataset(json!([
            {"v": 7}, {"v": 1}, {"v": 5}, {"v": 3},
            {"v": 8}, {"v": 2}, {"v": 6}, {"v": 4}
        ]));
        let result = compute_box_plot(&data, "v").unwrap();
        let summary = &result.summaries[0];
        assert_eq!(summary.to_array(), [1.0, 3.0, 5.0, 7.0, 8.0]);
        assert_eq!(summary.count, 8);
        assert_eq!(summary.dropped, 0);
        assert!(result.outliers.is_empty());
    }

    #[test]
    fn test_outliers_tagged_with_field() {
        let data = dataset(json!([
            {"a": 1, "b": 10},
            {"a": 2, "b": 11},
            {"a": 3, "b": 12},
            {"a": 4, "b": 13},
            {"a": 5, "b": -80},
            {"a": 6, "b": 14},
            {"a": 7, "b": 15},
            {"a": 2000, "b": 16},
            {"a": -900, "b": 17}
        ]));
        let result = compute_box_plots(&data, &["a", "b"]).unwrap();
        assert_eq!(result.summaries.len(), 2);
        assert_eq!(result.summaries[0].field, "a");
        assert_eq!(result.summaries[1].field, "b");

        let tagged = result
            .outliers
            .iter()
            .map(|o| (o.field_index, o.field.as_str(), o.value))
            .collect::<Vec<_>>();
        assert_eq!(
            tagged,
            vec![(0, "a", -900.0), (0, "a", 2000.0), (1, "b", -80.0)]
        );
    }

    #[test]
    fn test_non_numeric_values_are_dropped() {
        let data = dataset(json!([{"v": 1}, {"v": "x"}, {"v": null}, {"v": 2}]));
        let result = compute_box_plot(&data, "v").unwrap();
        assert_eq!(result.summaries[0].count, 2);
        assert_eq!(result.summaries[0].dropped, 2);
        assert_eq!(result.dropped(), 2);
    }

    #[test]
    fn test_empty_dataset() {
        assert_eq!(
            compute_box_plot(&Dataset::default(), "v"),
            Err(AnalysisError::EmptyDataset)
        );
    }

    #[test]
    fn test_no_fields() {
        let data = dataset(json!([{"v": 1}]));
        let fields: [&str; 0] = [];
        assert_eq!(
            compute_box_plots(&data, &fields),
            Err(AnalysisError::EmptyFieldSpec)
        );
    }

    #[test]
    fn test_unknown_field() {
        let data = dataset(json!([{"v": 1}]));
        let err = compute_box_plots(&data, &["v", "w"]).unwrap_err();
        assert_eq!(err, AnalysisError::UnknownField { field: "w".into() });
        assert!(err.kind().is_invalid_input());
    }

    #[test]
    fn test_all_non_numeric() {
        let data = dataset(json!([{"v": "a"}, {"v": "b"}]));
        assert_eq!(
            compute_box_plot(&data, "v"),
            Err(AnalysisError::InsufficientData {
                field: "v".into(),
                required: 1,
                found: 0,
                dropped: 2,
            })
        );
    }

    #[test]
    fn test_first_failing_field_is_reported() {
        let data = dataset(json!([{"v": "a", "w": "b"}]));
        let err = compute_box_plots(&data, &["missing", "v", "w"]).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::UnknownField {
                field: "missing".into()
            }
        );
    }

    #[test]
    fn test_idempotent() {
        let data = dataset(json!([
            {"v": 0.1}, {"v": 0.7}, {"v": 0.3}, {"v": 12.5}, {"v": 0.2}
        ]));
        let first = compute_box_plot(&data, "v").unwrap();
        let second = compute_box_plot(&data, "v").unwrap();
        assert_eq!(first, second);
    }
}
