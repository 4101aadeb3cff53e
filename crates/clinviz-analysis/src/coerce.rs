//! Numeric coercion and filtering shared by every engine
//!
//! Each engine reads its fields through this module so that the same dataset
//! yields the same usable values everywhere. A value survives when
//! [`Value::as_number`] accepts it; everything else (missing fields, `null`,
//! non-numeric text, non-finite numbers) is dropped and counted.
//!
//! ```
//! use clinviz_analysis::{coerce, record::{Dataset, Record}};
//!
//! let dataset: Dataset = vec![
//!     Record::new().with("sbp", 120),
//!     Record::new().with("sbp", "n/a"),
//!     Record::new().with("sbp", " 135 "),
//!     Record::new(),
//! ]
//! .into();
//!
//! let coerced = coerce::coerce_field(&dataset, "sbp").unwrap();
//! assert_eq!(coerced.values, vec![120.0, 135.0]);
//! assert_eq!(coerced.dropped, 2);
//! ```

use crate::{
    error::AnalysisError,
    record::{Dataset, Record, Value},
};

/// Values of one field that survived coercion, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub values: Vec<f64>,
    /// Number of records whose value was missing or not numeric.
    pub dropped: usize,
}

/// `(x, y)` pairs that survived pairwise coercion, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercedPairs {
    pub points: Vec<(f64, f64)>,
    /// Number of records where either value was missing or not numeric.
    pub dropped: usize,
}

/// Checks that `dataset` is non-empty and that `field` names a field some record carries.
pub fn require_field(dataset: &Dataset, field: &str) -> Result<(), AnalysisError> {
    if dataset.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }
    if field.trim().is_empty() {
        return Err(AnalysisError::EmptyFieldSpec);
    }
    if !dataset.has_field(field) {
        return Err(AnalysisError::UnknownField {
            field: field.to_owned(),
        });
    }
    Ok(())
}

/// Reads `field` from a record as a number.
#[must_use]
pub fn number_of(record: &Record, field: &str) -> Option<f64> {
    record.get(field).and_then(Value::as_number)
}

/// Coerces one field of every record, keeping only valid numbers.
pub fn coerce_field(dataset: &Dataset, field: &str) -> Result<Coerced, AnalysisError> {
    require_field(dataset, field)?;

    let mut values = Vec::with_capacity(dataset.len());
    let mut dropped = 0;
    for (index, record) in dataset.records().iter().enumerate() {
        match number_of(record, field) {
            Some(v) => values.push(v),
            None => {
                tracing::trace!(field, index, value = ?record.get(field), "dropping non-numeric value");
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        tracing::debug!(field, dropped, kept = values.len(), "coerced field");
    }

    Ok(Coerced { values, dropped })
}

/// Coerces two fields together; a record is kept only if both values are numeric.
pub fn coerce_pairs(
    dataset: &Dataset,
    x_field: &str,
    y_field: &str,
) -> Result<CoercedPairs, AnalysisError> {
    require_field(dataset, x_field)?;
    require_field(dataset, y_field)?;

    let mut points = Vec::with_capacity(dataset.len());
    let mut dropped = 0;
    for (index, record) in dataset.records().iter().enumerate() {
        match (number_of(record, x_field), number_of(record, y_field)) {
            (Some(x), Some(y)) => points.push((x, y)),
            _ => {
                tracing::trace!(x_field, y_field, index, "dropping incomplete pair");
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        tracing::debug!(x_field, y_field, dropped, kept = points.len(), "coerced pairs");
    }

    Ok(CoercedPairs { points, dropped })
}
