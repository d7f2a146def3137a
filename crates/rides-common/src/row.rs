//! Aggregate rows exchanged between the store and the transformer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column holding the bucket size in every aggregate row.
pub const COUNT_COLUMN: &str = "count";

/// A single grouping value as returned by the store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupValue {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl GroupValue {
    pub fn is_null(&self) -> bool {
        matches!(self, GroupValue::Null)
    }

    /// Render this value as an object key. `None` for null.
    ///
    /// Integral floats render without a fractional part so that a year
    /// extracted as `2020.0` keys the same bucket as `2020`.
    pub fn as_key(&self) -> Option<String> {
        match self {
            GroupValue::Null => None,
            GroupValue::Int(v) => Some(v.to_string()),
            GroupValue::Float(v) if v.fract() == 0.0 && v.is_finite() => {
                Some(format!("{}", *v as i64))
            }
            GroupValue::Float(v) => Some(v.to_string()),
            GroupValue::Text(s) => Some(s.clone()),
        }
    }
}

impl From<i64> for GroupValue {
    fn from(v: i64) -> Self {
        GroupValue::Int(v)
    }
}

impl From<i32> for GroupValue {
    fn from(v: i32) -> Self {
        GroupValue::Int(v as i64)
    }
}

impl From<f64> for GroupValue {
    fn from(v: f64) -> Self {
        GroupValue::Float(v)
    }
}

impl From<&str> for GroupValue {
    fn from(v: &str) -> Self {
        GroupValue::Text(v.to_string())
    }
}

impl From<String> for GroupValue {
    fn from(v: String) -> Self {
        GroupValue::Text(v)
    }
}

impl<T: Into<GroupValue>> From<Option<T>> for GroupValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(GroupValue::Null)
    }
}

/// One row of a grouped count: dimension name -> value, plus `count`.
///
/// An absent column reads as null.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateRow {
    columns: BTreeMap<String, GroupValue>,
}

impl AggregateRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<GroupValue>) -> Self {
        self.set(column, value);
        self
    }

    /// Set the count column.
    pub fn with_count(self, count: impl Into<GroupValue>) -> Self {
        self.with(COUNT_COLUMN, count)
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<GroupValue>) {
        self.columns.insert(column.into(), value.into());
    }

    /// Value of a column, `GroupValue::Null` when absent.
    pub fn get(&self, column: &str) -> &GroupValue {
        static NULL: GroupValue = GroupValue::Null;
        self.columns.get(column).unwrap_or(&NULL)
    }

    pub fn count(&self) -> &GroupValue {
        self.get(COUNT_COLUMN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_rendering() {
        assert_eq!(GroupValue::Int(2020).as_key().as_deref(), Some("2020"));
        assert_eq!(GroupValue::Float(2020.0).as_key().as_deref(), Some("2020"));
        assert_eq!(GroupValue::Float(1.5).as_key().as_deref(), Some("1.5"));
        assert_eq!(GroupValue::from("Annual").as_key().as_deref(), Some("Annual"));
        assert_eq!(GroupValue::Null.as_key(), None);
    }

    #[test]
    fn test_absent_column_is_null() {
        let row = AggregateRow::new().with("year", 2020).with_count("5");
        assert!(row.get("month").is_null());
        assert_eq!(row.count(), &GroupValue::Text("5".into()));
    }

    #[test]
    fn test_option_conversion() {
        let row = AggregateRow::new().with("year", None::<i32>);
        assert!(row.get("year").is_null());
    }

    #[test]
    fn test_deserialize_from_store_json() {
        let row: AggregateRow =
            serde_json::from_str(r#"{"year": 2020, "month": null, "count": "9"}"#).unwrap();
        assert_eq!(row.get("year"), &GroupValue::Int(2020));
        assert!(row.get("month").is_null());
        assert_eq!(row.count(), &GroupValue::Text("9".into()));
    }
}
