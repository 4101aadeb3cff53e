//! Tabular input: values, records and datasets
//!
//! A [`Dataset`] is an ordered sequence of [`Record`]s, each mapping field
//! names to scalar [`Value`]s. Records are expected to share a field
//! vocabulary, but this is not enforced: a field missing from one record is
//! simply treated as a missing value by the engines.
//!
//! All three types deserialize from plain JSON:
//!
//! ```
//! use clinviz_analysis::record::{Dataset, Value};
//!
//! let dataset: Dataset = serde_json::from_str(
//!     r#"[
//!         {"age": 61, "arm": "A", "visit": "2024-03-01T00:00:00Z"},
//!         {"age": "57", "arm": "B", "visit": null}
//!     ]"#,
//! )
//! .unwrap();
//!
//! assert_eq!(dataset.len(), 2);
//! assert_eq!(dataset.records()[1].get("age"), Some(&Value::Text("57".into())));
//! assert!(dataset.records()[0].get("visit").unwrap().is_date());
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scalar field value.
///
/// JSON strings that parse as RFC 3339 timestamps become [`Value::Date`];
/// all other strings stay [`Value::Text`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Date(DateTime<Utc>),
    Text(String),
}

impl Value {
    /// Converts the value to a finite number, if it has one.
    ///
    /// | value | result |
    /// |---|---|
    /// | `Number(n)` | `n` when finite |
    /// | `Bool(b)` | `1.0` or `0.0` |
    /// | `Text(s)` | trimmed `s` parsed as `f64` when finite; blank text has no number |
    /// | `Date(d)` | milliseconds since the Unix epoch |
    /// | `Null` | none |
    ///
    /// # Examples
    ///
    /// ```
    /// use clinviz_analysis::record::Value;
    ///
    /// assert_eq!(Value::Number(2.5).as_number(), Some(2.5));
    /// assert_eq!(Value::Text(" 42 ".into()).as_number(), Some(42.0));
    /// assert_eq!(Value::Text("n/a".into()).as_number(), None);
    /// assert_eq!(Value::Bool(true).as_number(), Some(1.0));
    /// assert_eq!(Value::Null.as_number(), None);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Value::Null => return None,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::Date(d) => d.timestamp_millis() as f64,
            Value::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                s.parse::<f64>().ok()?
            }
        };
        n.is_finite().then_some(n)
    }

    /// Returns `true` if the value marks an observed event rather than a censored observation.
    ///
    /// Booleans are taken as-is, numbers (and numeric text) are events when
    /// non-zero, `true`/`yes` and `false`/`no` text is matched case-insensitively,
    /// any other non-blank text and every date count as events, and `Null` is
    /// censored.
    ///
    /// Unlike a plain JavaScript truthiness check, the strings `"0"`,
    /// `"false"` and `"no"` are censored here, not events.
    ///
    /// # Examples
    ///
    /// ```
    /// use clinviz_analysis::record::Value;
    ///
    /// assert!(Value::Number(1.0).is_event());
    /// assert!(!Value::Number(0.0).is_event());
    /// assert!(!Value::Text("0".into()).is_event());
    /// assert!(Value::Text("Yes".into()).is_event());
    /// assert!(!Value::Null.is_event());
    /// ```
    #[must_use]
    pub fn is_event(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Date(_) => true,
            Value::Text(s) => match self.as_number() {
                Some(n) => n != 0.0,
                None => !matches!(
                    s.trim().to_ascii_lowercase().as_str(),
                    "" | "false" | "no"
                ),
            },
        }
    }

    /// Returns the text used to label a group formed by this value.
    ///
    /// `Null` has no label.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Date(d) => Some(d.to_rfc3339()),
            Value::Text(s) => Some(s.clone()),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

/// A single row: field name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    #[must_use]
    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn insert<K, V>(&mut self, field: K, value: V) -> Option<Value>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields.insert(field.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with<K, V>(mut self, field: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.insert(field, value);
        self
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// An ordered sequence of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns `true` if at least one record carries `field`.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.records.iter().any(|r| r.contains_field(field))
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_value_variants() {
        let record: Record = serde_json::from_value(json!({
            "n": 1.5,
            "i": 3,
            "b": false,
            "s": "hello",
            "d": "2020-01-01T00:00:00Z",
            "z": null,
        }))
        .unwrap();

        assert_eq!(record.get("n"), Some(&Value::Number(1.5)));
        assert_eq!(record.get("i"), Some(&Value::Number(3.0)));
        assert_eq!(record.get("b"), Some(&Value::Bool(false)));
        assert_eq!(record.get("s"), Some(&Value::Text("hello".into())));
        assert_eq!(
            record.get("d"),
            Some(&Value::Date(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()))
        );
        assert_eq!(record.get("z"), Some(&Value::Null));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_as_number_rejects_non_finite() {
        assert_eq!(Value::Number(f64::NAN).as_number(), None);
        assert_eq!(Value::Number(f64::INFINITY).as_number(), None);
        assert_eq!(Value::Text("NaN".into()).as_number(), None);
        assert_eq!(Value::Text("inf".into()).as_number(), None);
        assert_eq!(Value::Text("   ".into()).as_number(), None);
        assert_eq!(Value::Text("-1e3".into()).as_number(), Some(-1000.0));
    }

    #[test]
    fn test_date_as_epoch_millis() {
        let date = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 1).unwrap();
        assert_eq!(Value::Date(date).as_number(), Some(1000.0));
    }

    #[test]
    fn test_is_event() {
        assert!(Value::Bool(true).is_event());
        assert!(!Value::Bool(false).is_event());
        assert!(Value::Number(2.0).is_event());
        assert!(!Value::Number(f64::NAN).is_event());
        assert!(Value::Text("1".into()).is_event());
        assert!(!Value::Text(" 0.0 ".into()).is_event());
        assert!(Value::Text("TRUE".into()).is_event());
        assert!(!Value::Text("No".into()).is_event());
        assert!(!Value::Text(String::new()).is_event());
        assert!(Value::Text("death".into()).is_event());
    }

    #[test]
    fn test_label() {
        assert_eq!(Value::Number(1.0).label().as_deref(), Some("1"));
        assert_eq!(Value::Number(2.5).label().as_deref(), Some("2.5"));
        assert_eq!(Value::Bool(true).label().as_deref(), Some("true"));
        assert_eq!(Value::Text("A".into()).label().as_deref(), Some("A"));
        assert_eq!(Value::Null.label(), None);
    }

    #[test]
    fn test_has_field() {
        let dataset: Dataset = vec![
            Record::new().with("a", 1),
            Record::new().with("a", 2).with("b", "x"),
        ]
        .into();
        assert!(dataset.has_field("a"));
        assert!(dataset.has_field("b"));
        assert!(!dataset.has_field("c"));
    }

    #[test]
    fn test_clone_keeps_full_precision() {
        let record = Record::new().with("v", 0.1 + 0.2);
        let copy = record.clone();
        assert_eq!(copy.get("v").and_then(Value::as_number), Some(0.1 + 0.2));
    }
}
