//! Assembly of engine results into render-ready charts
//!
//! A [`Chart`] pairs one engine result ([`ChartData`], tagged by `kind`) with
//! presentation metadata ([`ChartMetadata`]). The metadata is built from the
//! caller's [`ChartOptions`]: supplied values are forwarded untouched, and
//! missing ones fall back to per-chart defaults. Nothing in the options is
//! interpreted by the engines.
//!
//! # Examples
//!
//! ```
//! use clinviz_analysis::{chart::{Chart, ChartOptions}, record::Dataset};
//!
//! let dataset: Dataset = serde_json::from_str(
//!     r#"[{"bmi": 21.0, "sbp": 118}, {"bmi": 27.5, "sbp": 131}, {"bmi": 31.0, "sbp": 140}]"#,
//! )
//! .unwrap();
//! let options = ChartOptions {
//!     title: Some("Blood pressure by BMI".into()),
//!     ..ChartOptions::default()
//! };
//!
//! let chart = Chart::regression(&dataset, "bmi", "sbp", &options).unwrap();
//! let json = serde_json::to_value(&chart).unwrap();
//! assert_eq!(json["data"]["kind"], "regression");
//! assert_eq!(json["metadata"]["title"], "Blood pressure by BMI");
//! assert_eq!(json["metadata"]["x_axis_name"], "bmi");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::{
    box_plot::{self, BoxPlotResult},
    error::AnalysisError,
    record::Dataset,
    regression::{self, RegressionResult},
    survival::{self, SurvivalResult},
};

/// Palette used when the caller does not supply one.
pub const DEFAULT_COLORS: [&str; 10] = [
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

pub const DEFAULT_WIDTH: &str = "100%";
pub const DEFAULT_HEIGHT: &str = "400px";
pub const DEFAULT_SYMBOL_SIZE: u32 = 8;

pub const SURVIVAL_X_AXIS_NAME: &str = "Time";
pub const SURVIVAL_Y_AXIS_NAME: &str = "Survival probability";

/// Presentation options supplied by the caller.
///
/// Every field is optional. Keys not listed here are collected into `extra`
/// and forwarded verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_name: Option<String>,
    /// Container width, e.g. `"100%"` or `640`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<JsonValue>,
    /// Container height, e.g. `"400px"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_size: Option<JsonValue>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// Metadata block of an assembled chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_name: Option<String>,
    pub width: JsonValue,
    pub height: JsonValue,
    pub colors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_size: Option<JsonValue>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// Per-chart fallbacks applied when an option is absent.
#[derive(Debug, Clone, Default)]
struct MetadataDefaults {
    x_axis_name: Option<String>,
    y_axis_name: Option<String>,
    symbol_size: Option<JsonValue>,
}

impl ChartMetadata {
    fn from_options(options: &ChartOptions, defaults: MetadataDefaults) -> Self {
        let options = options.clone();
        Self {
            title: options.title,
            subtitle: options.subtitle,
            x_axis_name: options.x_axis_name.or(defaults.x_axis_name),
            y_axis_name: options.y_axis_name.or(defaults.y_axis_name),
            width: options
                .width
                .unwrap_or_else(|| JsonValue::from(DEFAULT_WIDTH)),
            height: options
                .height
                .unwrap_or_else(|| JsonValue::from(DEFAULT_HEIGHT)),
            colors: options
                .colors
                .unwrap_or_else(|| DEFAULT_COLORS.iter().map(|&c| c.to_owned()).collect()),
            symbol_size: options.symbol_size.or(defaults.symbol_size),
            extra: options.extra,
        }
    }
}

/// Engine output, tagged by chart kind.
#[derive(Debug, Clone, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    BoxPlot(BoxPlotResult),
    Regression(RegressionResult),
    Survival(SurvivalResult),
}

impl ChartData {
    /// Number of records or values dropped by coercion.
    #[must_use]
    pub fn dropped(&self) -> usize {
        match self {
            ChartData::BoxPlot(result) => result.dropped(),
            ChartData::Regression(result) => result.dropped,
            ChartData::Survival(result) => result.dropped,
        }
    }
}

/// A render-ready chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub metadata: ChartMetadata,
    pub data: ChartData,
}

impl Chart {
    /// Box plots of `fields`, one box per field.
    pub fn box_plot<S>(
        dataset: &Dataset,
        fields: &[S],
        options: &ChartOptions,
    ) -> Result<Self, AnalysisError>
    where
        S: AsRef<str> + Sync,
    {
        let result = box_plot::compute_box_plots(dataset, fields)?;
        Ok(Self {
            metadata: ChartMetadata::from_options(options, MetadataDefaults::default()),
            data: ChartData::BoxPlot(result),
        })
    }

    /// Scatter plot of `y_field` against `x_field` with its regression line.
    pub fn regression(
        dataset: &Dataset,
        x_field: &str,
        y_field: &str,
        options: &ChartOptions,
    ) -> Result<Self, AnalysisError> {
        let result = regression::fit_line(dataset, x_field, y_field)?;
        let defaults = MetadataDefaults {
            x_axis_name: Some(x_field.to_owned()),
            y_axis_name: Some(y_field.to_owned()),
            symbol_size: Some(JsonValue::from(DEFAULT_SYMBOL_SIZE)),
        };
        Ok(Self {
            metadata: ChartMetadata::from_options(options, defaults),
            data: ChartData::Regression(result),
        })
    }

    /// Kaplan-Meier curves, one per group.
    pub fn survival(
        dataset: &Dataset,
        time_field: &str,
        event_field: &str,
        group_field: Option<&str>,
        options: &ChartOptions,
    ) -> Result<Self, AnalysisError> {
        let result = survival::estimate(dataset, time_field, event_field, group_field)?;
        let defaults = MetadataDefaults {
            x_axis_name: Some(SURVIVAL_X_AXIS_NAME.to_owned()),
            y_axis_name: Some(SURVIVAL_Y_AXIS_NAME.to_owned()),
            symbol_size: None,
        };
        Ok(Self {
            metadata: ChartMetadata::from_options(options, defaults),
            data: ChartData::Survival(result),
        })
    }

    /// See [`ChartData::dropped`].
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.data.dropped()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn dataset(value: JsonValue) -> Dataset {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let data = dataset(json!([{"v": 1}, {"v": 2}]));
        let chart = Chart::box_plot(&data, &["v"], &ChartOptions::default()).unwrap();
        let meta = &chart.metadata;
        assert_eq!(meta.title, None);
        assert_eq!(meta.x_axis_name, None);
        assert_eq!(meta.width, json!("100%"));
        assert_eq!(meta.height, json!("400px"));
        assert_eq!(meta.colors.len(), 10);
        assert_eq!(meta.colors[0], "#4e79a7");
        assert_eq!(meta.symbol_size, None);
        assert!(chart.data.is_box_plot());
    }

    #[test]
    fn test_supplied_options_forwarded_verbatim() {
        let options: ChartOptions = serde_json::from_value(json!({
            "title": "Cholesterol",
            "subtitle": "baseline",
            "x_axis_name": "Age (years)",
            "width": 640,
            "colors": ["red"],
            "symbol_size": 12,
            "legend_position": {"bottom": "5%"},
            "x_axis_label_rotate": 45
        }))
        .unwrap();
        let data = dataset(json!([
            {"age": 40, "chol": 190},
            {"age": 50, "chol": 210}
        ]));
        let chart = Chart::regression(&data, "age", "chol", &options).unwrap();
        let meta = &chart.metadata;
        assert_eq!(meta.title.as_deref(), Some("Cholesterol"));
        assert_eq!(meta.subtitle.as_deref(), Some("baseline"));
        assert_eq!(meta.x_axis_name.as_deref(), Some("Age (years)"));
        assert_eq!(meta.y_axis_name.as_deref(), Some("chol"));
        assert_eq!(meta.width, json!(640));
        assert_eq!(meta.height, json!("400px"));
        assert_eq!(meta.colors, vec!["red".to_owned()]);
        assert_eq!(meta.symbol_size, Some(json!(12)));
        assert_eq!(meta.extra["legend_position"], json!({"bottom": "5%"}));
        assert_eq!(meta.extra["x_axis_label_rotate"], json!(45));
    }

    #[test]
    fn test_regression_symbol_size_default() {
        let data = dataset(json!([{"x": 1, "y": 1}, {"x": 2, "y": 3}]));
        let chart = Chart::regression(&data, "x", "y", &ChartOptions::default()).unwrap();
        assert_eq!(chart.metadata.symbol_size, Some(json!(8)));
    }

    #[test]
    fn test_survival_json_shape() {
        let data = dataset(json!([
            {"t": 1, "e": 1, "g": "a"},
            {"t": 2, "e": 1, "g": "a"}
        ]));
        let chart =
            Chart::survival(&data, "t", "e", Some("g"), &ChartOptions::default()).unwrap();
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["metadata"]["x_axis_name"], "Time");
        assert_eq!(json["metadata"]["y_axis_name"], "Survival probability");
        assert_eq!(json["data"]["kind"], "survival");
        assert_eq!(json["data"]["dropped"], 0);
        assert_eq!(json["data"]["curves"][0]["group"], "a");
        assert_eq!(
            json["data"]["curves"][0]["points"],
            json!([[0.0, 1.0], [1.0, 0.5], [2.0, 0.0]])
        );
    }

    #[test]
    fn test_box_plot_json_shape() {
        let data = dataset(json!([{"v": 1}, {"v": 2}, {"v": 3}, {"v": 4}, {"v": 100}]));
        let chart = Chart::box_plot(&data, &["v"], &ChartOptions::default()).unwrap();
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["data"]["kind"], "box_plot");
        assert_eq!(json["data"]["summaries"][0]["median"], 3.0);
        assert_eq!(
            json["data"]["outliers"],
            json!([{"field_index": 0, "field": "v", "value": 100.0}])
        );
    }

    #[test]
    fn test_engine_errors_propagate() {
        let empty = Dataset::default();
        assert_eq!(
            Chart::box_plot(&empty, &["v"], &ChartOptions::default()),
            Err(AnalysisError::EmptyDataset)
        );

        let data = dataset(json!([{"x": 5, "y": 1}, {"x": 5, "y": 9}]));
        let err = Chart::regression(&data, "x", "y", &ChartOptions::default()).unwrap_err();
        assert!(err.kind().is_degenerate_computation());
    }

    #[test]
    fn test_dropped_reported() {
        let data = dataset(json!([{"v": 1}, {"v": "?"}, {"w": 3}]));
        let chart = Chart::box_plot(&data, &["v"], &ChartOptions::default()).unwrap();
        assert_eq!(chart.dropped(), 2);
    }
}
