//! Numeric kernels behind the clinviz chart engines.
//!
//! This crate works on plain `f64` slices and knows nothing about records,
//! field names or presentation. The `clinviz-analysis` crate feeds it values
//! that have already been coerced and filtered.
//!
//! # Modules
//!
//! - [`percentiles`]: Nearest-rank percentile lookup on sorted data
//! - [`box_plot`]: Quartiles, clamped IQR fences and outlier classification
//! - [`regression`]: Ordinary least squares line through a point cloud
//! - [`survival`]: Kaplan-Meier survival curves for right-censored data
//!
//! # Examples
//!
//! ## Box-plot statistics
//!
//! ```
//! use clinviz_stats::box_plot::BoxStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 100.0];
//! let stats = BoxStats::from_sorted(&values).unwrap();
//! assert_eq!(stats.median, 3.0);
//! assert!(stats.is_outlier(100.0));
//! ```
//!
//! ## Fitting a line
//!
//! ```
//! use clinviz_stats::regression::LinearFit;
//!
//! let fit = LinearFit::from_points(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]).unwrap();
//! assert_eq!(fit.slope, 2.0);
//! assert_eq!(fit.intercept, 0.0);
//! ```
//!
//! ## Analyzing survival data
//!
//! ```
//! use clinviz_stats::survival::KaplanMeierCurve;
//!
//! // Data: (time, event_observed)
//! let data = vec![
//!     (10.0, true),  // Event at time 10
//!     (20.0, false), // Censored at time 20
//!     (30.0, true),  // Event at time 30
//! ];
//! let curve = KaplanMeierCurve::from_observations(data).unwrap();
//! assert_eq!(curve.times, vec![0.0, 10.0, 30.0]);
//! ```

pub mod box_plot;
pub mod percentiles;
pub mod regression;
pub mod survival;
