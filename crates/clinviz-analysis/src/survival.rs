//! Kaplan-Meier survival curves, optionally stratified by a grouping field
//!
//! # Overview
//!
//! Each record is one subject: a time (when the event or censoring happened)
//! and an event flag. Subjects whose event flag is falsy were censored: they
//! leave the risk set without lowering the survival estimate.
//!
//! ```text
//! Event:     |----x     (event observed at t)
//! Censored:  |------->  (followed until t, event not observed)
//! ```
//!
//! # Grouping
//!
//! With a grouping field, records are partitioned by the group value's label
//! and one curve is estimated per group. Groups appear in the order their
//! label first occurs in the dataset. Without one, all records form the
//! single group [`ALL_GROUP`].
//!
//! # Dropped records
//!
//! A record is dropped (and counted) when its time does not coerce to a
//! number or is negative, or, when grouping, when its group value is missing or `null`.
//! A missing or `null` event value is kept and treated as censored.
//!
//! # Examples
//!
//! ```
//! use clinviz_analysis::{point::Point, record::Dataset, survival};
//!
//! let dataset: Dataset = serde_json::from_str(
//!     r#"[
//!         {"months": 1, "died": 1},
//!         {"months": 2, "died": 0},
//!         {"months": 3, "died": 1},
//!         {"months": 4, "died": 1}
//!     ]"#,
//! )
//! .unwrap();
//!
//! let result = survival::estimate(&dataset, "months", "died", None).unwrap();
//! let curve = result.get("all").unwrap();
//! assert_eq!(
//!     curve.points,
//!     vec![
//!         Point::new(0.0, 1.0),
//!         Point::new(1.0, 0.75),
//!         Point::new(3.0, 0.375),
//!         Point::new(4.0, 0.0),
//!     ]
//! );
//! ```

use std::collections::HashMap;

use clinviz_stats::survival::{KaplanMeierCurve, KaplanMeierError};
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    coerce,
    error::AnalysisError,
    point::Point,
    record::{Dataset, Value},
};

/// Label of the implicit group used when no grouping field is given.
pub const ALL_GROUP: &str = "all";

/// Survival curve of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurvivalCurve {
    pub group: String,
    /// `(time, survival)` points starting at `(0, 1)`.
    pub points: Vec<Point>,
    /// Number of subjects in the group.
    pub subjects: usize,
    /// Number of subjects with an observed event.
    pub events: usize,
    /// Number of censored subjects.
    pub censored: usize,
    /// Kaplan-Meier median survival time, if survival drops to 50%.
    pub median_survival: Option<f64>,
}

impl SurvivalCurve {
    fn from_km(group: String, km: &KaplanMeierCurve) -> Self {
        Self {
            group,
            points: km.points().map(Point::from).collect(),
            subjects: km.subjects,
            events: km.events,
            censored: km.censored(),
            median_survival: km.median_survival(),
        }
    }

    /// Returns the survival probability at `time` (step function).
    #[must_use]
    pub fn survival_at(&self, time: f64) -> f64 {
        self.points
            .iter()
            .take_while(|p| p.x <= time)
            .last()
            .map_or(1.0, |p| p.y)
    }
}

/// Survival curves of every group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurvivalResult {
    /// One curve per group, in order of first appearance.
    pub curves: Vec<SurvivalCurve>,
    /// Number of records dropped before estimation.
    pub dropped: usize,
}

impl SurvivalResult {
    /// Looks up the curve of a group by label.
    #[must_use]
    pub fn get(&self, group: &str) -> Option<&SurvivalCurve> {
        self.curves.iter().find(|c| c.group == group)
    }

    /// Group labels in output order.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.curves.iter().map(|c| c.group.as_str())
    }
}

/// Observations of one group: `(time, event)` in input order.
#[derive(Debug)]
struct GroupData {
    label: String,
    observations: Vec<(f64, bool)>,
}

/// Estimates Kaplan-Meier survival curves.
///
/// # Errors
///
/// * [`AnalysisError::InsufficientData`] - no record has a usable time (and group)
/// * [`AnalysisError::RiskSetDepleted`] - a group ran out of subjects at risk
/// * plus the dataset/field validation errors of [`coerce::require_field`]
pub fn estimate(
    dataset: &Dataset,
    time_field: &str,
    event_field: &str,
    group_field: Option<&str>,
) -> Result<SurvivalResult, AnalysisError> {
    coerce::require_field(dataset, time_field)?;
    coerce::require_field(dataset, event_field)?;
    if let Some(group_field) = group_field {
        coerce::require_field(dataset, group_field)?;
    }

    let (groups, dropped) = collect_by_group(dataset, time_field, event_field, group_field);
    if groups.is_empty() {
        return Err(AnalysisError::InsufficientData {
            field: time_field.to_owned(),
            required: 1,
            found: 0,
            dropped,
        });
    }
    if dropped > 0 {
        tracing::debug!(time_field, dropped, "dropped records without usable time or group");
    }

    let curves = groups
        .into_par_iter()
        .map(|group| -> Result<SurvivalCurve, AnalysisError> {
            let km = KaplanMeierCurve::from_observations(group.observations).map_err(|e| {
                match e {
                    KaplanMeierError::NoObservations => AnalysisError::InsufficientData {
                        field: time_field.to_owned(),
                        required: 1,
                        found: 0,
                        dropped,
                    },
                    KaplanMeierError::RiskSetDepleted { remaining } => {
                        AnalysisError::RiskSetDepleted {
                            group: group.label.clone(),
                            remaining,
                        }
                    }
                }
            })?;
            Ok(SurvivalCurve::from_km(group.label, &km))
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SurvivalResult { curves, dropped })
}

/// Partitions usable records by group label, preserving first-appearance order.
fn collect_by_group(
    dataset: &Dataset,
    time_field: &str,
    event_field: &str,
    group_field: Option<&str>,
) -> (Vec<GroupData>, usize) {
    let mut groups: Vec<GroupData> = vec![];
    let mut index_of: HashMap<String, usize> = HashMap::new();
    let mut dropped = 0;

    for record in dataset.records() {
        let Some(time) = coerce::number_of(record, time_field).filter(|t| *t >= 0.0) else {
            tracing::trace!(time_field, value = ?record.get(time_field), "dropping unusable time");
            dropped += 1;
            continue;
        };
        let label = match group_field {
            Some(field) => match record.get(field).and_then(Value::label) {
                Some(label) => label,
                None => {
                    dropped += 1;
                    continue;
                }
            },
            None => ALL_GROUP.to_owned(),
        };
        let event = record.get(event_field).is_some_and(Value::is_event);

        let index = *index_of.entry(label.clone()).or_insert_with(|| {
            groups.push(GroupData {
                label,
                observations: vec![],
            });
            groups.len() - 1
        });
        groups[index].observations.push((time, event));
    }

    (groups, dropped)
}
