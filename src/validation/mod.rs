//! Validation Engine
//!
//! Validators, column rule sets, schemas and the error report they produce.

pub mod concurrent;
pub mod engine;
pub mod report;
pub mod rules;
pub mod validator;

pub use concurrent::validate_concurrently;
pub use engine::{clean, validate, Schema};
pub use report::{ConfigurationError, EngineError, ErrorRecord, ErrorReport, ValidationError};
pub use rules::ColumnRuleSet;
pub use validator::{
    DateFormat, FnValidator, InRange, MatchesPattern, NotMissing, NumericCoercible, OneOf,
    RuleError, SharedValidator, Validator,
};
