//! Cell Values
//!
//! A cell is typed once, when the dataset is loaded. Validation never re-infers
//! the type of a cell; it only asks whether the cell can be converted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Numeric interpretation requested by a coercion check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericKind {
    #[serde(alias = "integer")]
    Int,
    Float,
}

impl NumericKind {
    /// Human-readable name used in default messages
    pub fn label(self) -> &'static str {
        match self {
            NumericKind::Int => "integer",
            NumericKind::Float => "float",
        }
    }
}

/// A single cell of a dataset
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    /// Absence of a value; never equal to zero, an empty string or NaN
    Missing,
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Textual rendering of a present value, `None` for missing
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Integer(i) => Some(Cow::Owned(i.to_string())),
            Value::Float(f) => Some(Cow::Owned(f.to_string())),
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Date(d) => Some(Cow::Owned(d.to_string())),
            Value::Missing => None,
        }
    }

    /// Whether the value can be read as the given numeric kind.
    ///
    /// Missing values are reported as coercible: missing-ness is checked
    /// separately. A finite float reads as an integer by truncation, while
    /// text must follow the integer grammar exactly.
    pub fn is_coercible_to(&self, kind: NumericKind) -> bool {
        match (self, kind) {
            (Value::Missing, _) => true,
            (Value::Integer(_), _) => true,
            (Value::Float(_), NumericKind::Float) => true,
            (Value::Float(f), NumericKind::Int) => f.is_finite(),
            (Value::String(s), NumericKind::Int) => s.trim().parse::<i64>().is_ok(),
            (Value::String(s), NumericKind::Float) => s.trim().parse::<f64>().is_ok(),
            (Value::Date(_), _) => false,
        }
    }

    /// Numeric reading of the value, when it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Date(_) | Value::Missing => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Missing)
    }
}
