//! Chart statistics engines for clinical datasets
//!
//! This crate turns tabular clinical data into render-ready chart data. It
//! performs no rendering and no I/O: every function takes a complete
//! in-memory [`Dataset`](record::Dataset) and returns a serializable result
//! or a typed [`AnalysisError`](error::AnalysisError).
//!
//! # Overview
//!
//! 1. **Input** ([`record`]): records of named scalar values, usually
//!    deserialized from JSON
//! 2. **Coercion** ([`coerce`]): field values are converted to numbers;
//!    missing and non-numeric values are dropped and counted
//! 3. **Engines**:
//!    - [`box_plot`]: nearest-rank quartiles, clamped fences and outliers
//!    - [`regression`]: ordinary least squares line for a scatter plot
//!    - [`survival`]: Kaplan-Meier curves with optional grouping
//! 4. **Assembly** ([`chart`]): engine output plus presentation metadata
//!
//! The engines are independent of each other and stateless: running one
//! twice on the same input yields identical output.
//!
//! # Errors
//!
//! Requests are rejected rather than answered with empty results: an empty
//! dataset, an empty field name, a field no record carries, or a field
//! without enough numeric values are all
//! [`ErrorKind::InvalidInput`](error::ErrorKind::InvalidInput). A regression
//! without x-variance is
//! [`ErrorKind::DegenerateComputation`](error::ErrorKind::DegenerateComputation).
//!
//! # Examples
//!
//! ```
//! use clinviz_analysis::{chart::{Chart, ChartOptions}, record::Dataset};
//!
//! let dataset: Dataset = serde_json::from_str(
//!     r#"[
//!         {"months": 3, "died": true, "arm": "A"},
//!         {"months": 7, "died": false, "arm": "B"},
//!         {"months": 9, "died": true, "arm": "A"}
//!     ]"#,
//! )
//! .unwrap();
//!
//! let chart = Chart::survival(&dataset, "months", "died", Some("arm"), &ChartOptions::default())
//!     .unwrap();
//! println!("{}", serde_json::to_string_pretty(&chart).unwrap());
//! ```

pub mod box_plot;
pub mod chart;
pub mod coerce;
pub mod error;
pub mod point;
pub mod record;
pub mod regression;
pub mod survival;
