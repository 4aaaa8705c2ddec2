//! Cell Validators
//!
//! A validator is a pure predicate over one cell plus a fixed message. The
//! message is chosen when the validator is built and never depends on the
//! failing value.

use crate::dataset::{NumericKind, Value};
use chrono::format::{parse, Item, Numeric, Pad, Parsed, StrftimeItems};
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Default message of the not-missing check
pub const NOT_MISSING_MESSAGE: &str = "cannot be empty";

/// Problems detected while constructing a validator
#[derive(Debug, Error, PartialEq)]
pub enum RuleError {
    #[error("invalid date format pattern '{0}'")]
    InvalidDatePattern(String),

    #[error("invalid regular expression '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("range minimum {min} exceeds maximum {max}")]
    InvertedRange { min: f64, max: f64 },

    #[error("range needs at least one bound")]
    EmptyRange,

    #[error("allowed value list is empty")]
    EmptyValueList,
}

/// A single rule over one cell value.
///
/// `check` must be total: it returns a boolean for every value, including
/// `Value::Missing`, and never panics.
pub trait Validator: fmt::Debug + Send + Sync {
    fn check(&self, value: &Value) -> bool;

    fn message(&self) -> &str;
}

/// Shared handle to a validator, cheap to clone across rule sets and threads
pub type SharedValidator = Arc<dyn Validator>;

/// Fails iff the value is missing
#[derive(Debug, Clone)]
pub struct NotMissing {
    message: String,
}

impl NotMissing {
    pub fn new() -> Self {
        Self::with_message(NOT_MISSING_MESSAGE)
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for NotMissing {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for NotMissing {
    fn check(&self, value: &Value) -> bool {
        !value.is_missing()
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Fails iff a present value cannot be read as the given numeric kind
#[derive(Debug, Clone)]
pub struct NumericCoercible {
    kind: NumericKind,
    message: String,
}

impl NumericCoercible {
    pub fn new(kind: NumericKind) -> Self {
        Self::with_message(kind, format!("is not {} value", kind.label()))
    }

    pub fn with_message(kind: NumericKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> NumericKind {
        self.kind
    }
}

impl Validator for NumericCoercible {
    fn check(&self, value: &Value) -> bool {
        value.is_coercible_to(self.kind)
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Fails iff the textual rendering of a present value does not match a
/// strftime-style pattern in full.
///
/// Numeric fields must also have `strptime` widths: `%Y` takes exactly four
/// digits, `%y` two, and the other fields at most their zero-padded width.
#[derive(Debug, Clone)]
pub struct DateFormat {
    pattern: String,
    shape: Regex,
    message: String,
}

impl DateFormat {
    pub fn new(pattern: impl Into<String>) -> Result<Self, RuleError> {
        let pattern = pattern.into();
        let message = format!("does not match the date format string \"{}\"", pattern);
        Self::with_message(pattern, message)
    }

    pub fn with_message(
        pattern: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, RuleError> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(RuleError::InvalidDatePattern(pattern));
        }
        let shape = field_shape(&pattern)?;

        Ok(Self {
            pattern,
            shape,
            message: message.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl Validator for DateFormat {
    fn check(&self, value: &Value) -> bool {
        let Some(text) = value.as_text() else {
            return true;
        };
        if !self.shape.is_match(&text) {
            return false;
        }
        let mut parsed = Parsed::default();
        parse(&mut parsed, &text, StrftimeItems::new(&self.pattern)).is_ok()
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Anchored regex giving the digit count allowed for each field of `pattern`
fn field_shape(pattern: &str) -> Result<Regex, RuleError> {
    let invalid = || RuleError::InvalidDatePattern(pattern.to_string());

    let mut shape = String::from("^");
    for item in StrftimeItems::new(pattern) {
        match item {
            Item::Literal(text) => shape.push_str(&regex::escape(text)),
            Item::OwnedLiteral(text) => shape.push_str(&regex::escape(&text)),
            Item::Space(_) | Item::OwnedSpace(_) => shape.push_str(r"\s+"),
            Item::Numeric(numeric, pad) => shape.push_str(&numeric_shape(&numeric, pad)),
            // Names, offsets and fractions are left to the chrono parser
            Item::Fixed(_) => shape.push_str(".*?"),
            Item::Error => return Err(invalid()),
        }
    }
    shape.push('$');

    Regex::new(&shape).map_err(|_| invalid())
}

fn numeric_shape(numeric: &Numeric, pad: Pad) -> String {
    let (width, exact) = match numeric {
        Numeric::Year | Numeric::IsoYear => (4, true),
        Numeric::YearDiv100
        | Numeric::YearMod100
        | Numeric::IsoYearDiv100
        | Numeric::IsoYearMod100 => (2, true),
        Numeric::Quarter | Numeric::NumDaysFromSun | Numeric::WeekdayFromMon => (1, true),
        Numeric::Ordinal => (3, false),
        Numeric::Month
        | Numeric::Day
        | Numeric::WeekFromSun
        | Numeric::WeekFromMon
        | Numeric::IsoWeek
        | Numeric::Hour
        | Numeric::Hour12
        | Numeric::Minute
        | Numeric::Second => (2, false),
        Numeric::Timestamp => return "-?[0-9]+".to_string(),
        _ => return "[0-9]+".to_string(),
    };

    match pad {
        Pad::Zero if exact => format!("[0-9]{{{}}}", width),
        Pad::Space => format!(" *[0-9]{{1,{}}}", width),
        _ => format!("[0-9]{{1,{}}}", width),
    }
}

/// Fails iff a numeric reading of the value lies outside inclusive bounds.
///
/// Values without a numeric reading pass; type checks belong to
/// `NumericCoercible`.
#[derive(Debug, Clone)]
pub struct InRange {
    min: Option<f64>,
    max: Option<f64>,
    message: String,
}

impl InRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Result<Self, RuleError> {
        let message = match (min, max) {
            (Some(min), Some(max)) => format!("is not between {} and {}", min, max),
            (Some(min), None) => format!("is below minimum {}", min),
            (None, Some(max)) => format!("exceeds maximum {}", max),
            (None, None) => return Err(RuleError::EmptyRange),
        };
        Self::with_message(min, max, message)
    }

    pub fn with_message(
        min: Option<f64>,
        max: Option<f64>,
        message: impl Into<String>,
    ) -> Result<Self, RuleError> {
        match (min, max) {
            (None, None) => return Err(RuleError::EmptyRange),
            (Some(min), Some(max)) if min > max => {
                return Err(RuleError::InvertedRange { min, max });
            }
            _ => {}
        }

        Ok(Self {
            min,
            max,
            message: message.into(),
        })
    }
}

impl Validator for InRange {
    fn check(&self, value: &Value) -> bool {
        let Some(number) = value.as_f64() else {
            return true;
        };
        if number.is_nan() {
            return true;
        }
        self.min.is_none_or(|min| number >= min) && self.max.is_none_or(|max| number <= max)
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Fails iff the textual rendering of a present value is not one of the
/// allowed strings
#[derive(Debug, Clone)]
pub struct OneOf {
    values: Vec<String>,
    message: String,
}

impl OneOf {
    pub fn new(values: Vec<String>) -> Result<Self, RuleError> {
        let message = format!("is not one of: {}", values.join(", "));
        Self::with_message(values, message)
    }

    pub fn with_message(values: Vec<String>, message: impl Into<String>) -> Result<Self, RuleError> {
        if values.is_empty() {
            return Err(RuleError::EmptyValueList);
        }
        Ok(Self {
            values,
            message: message.into(),
        })
    }
}

impl Validator for OneOf {
    fn check(&self, value: &Value) -> bool {
        match value.as_text() {
            Some(text) => self.values.iter().any(|v| *v == *text),
            None => true,
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Fails iff the textual rendering of a present value does not match a
/// regular expression
#[derive(Debug, Clone)]
pub struct MatchesPattern {
    regex: Regex,
    message: String,
}

impl MatchesPattern {
    pub fn new(pattern: &str) -> Result<Self, RuleError> {
        Self::with_message(pattern, format!("does not match pattern '{}'", pattern))
    }

    pub fn with_message(pattern: &str, message: impl Into<String>) -> Result<Self, RuleError> {
        let regex = Regex::new(pattern).map_err(|e| RuleError::InvalidRegex {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            regex,
            message: message.into(),
        })
    }
}

impl Validator for MatchesPattern {
    fn check(&self, value: &Value) -> bool {
        match value.as_text() {
            Some(text) => self.regex.is_match(&text),
            None => true,
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator backed by a caller-supplied predicate
pub struct FnValidator<F> {
    predicate: F,
    message: String,
}

impl<F> FnValidator<F>
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    pub fn new(message: impl Into<String>, predicate: F) -> Self {
        Self {
            predicate,
            message: message.into(),
        }
    }
}

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl<F> Validator for FnValidator<F>
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn check(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Shorthand constructors returning shared validators
pub fn not_missing() -> SharedValidator {
    Arc::new(NotMissing::new())
}

pub fn numeric(kind: NumericKind) -> SharedValidator {
    Arc::new(NumericCoercible::new(kind))
}

pub fn date_format(pattern: &str) -> Result<SharedValidator, RuleError> {
    Ok(Arc::new(DateFormat::new(pattern)?))
}

pub fn custom<F>(message: impl Into<String>, predicate: F) -> SharedValidator
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Arc::new(FnValidator::new(message, predicate))
}
