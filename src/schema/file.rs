//! Schema File Types
//!
//! Serde types mirroring `*.schema.toml` files, and their conversion into a
//! runnable [`Schema`].

use crate::dataset::NumericKind;
use crate::validation::validator::{
    DateFormat, InRange, MatchesPattern, NotMissing, NumericCoercible, OneOf, RuleError,
    SharedValidator,
};
use crate::validation::{ColumnRuleSet, Schema};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while reading or compiling schema definitions
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to parse schema TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read schema file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("schema '{schema}', column '{column}', rule {index}: {source}")]
    InvalidRule {
        schema: String,
        column: String,
        index: usize,
        #[source]
        source: RuleError,
    },

    #[error("schema '{0}' not found")]
    NotFound(String),
}

/// Root schema file structure (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SchemaFile {
    pub schema: SchemaMeta,
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
}

/// Schema metadata
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SchemaMeta {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// Rules declared for one column
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<RuleDef>,
}

/// A single declared rule; `message` overrides the default failure message
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleDef {
    NotMissing {
        message: Option<String>,
    },
    Numeric {
        #[serde(rename = "type")]
        kind: NumericKind,
        message: Option<String>,
    },
    DateFormat {
        pattern: String,
        message: Option<String>,
    },
    Range {
        min: Option<f64>,
        max: Option<f64>,
        message: Option<String>,
    },
    OneOf {
        values: Vec<String>,
        message: Option<String>,
    },
    Pattern {
        regex: String,
        message: Option<String>,
    },
}

impl RuleDef {
    /// Build the validator this rule declares
    pub fn to_validator(&self) -> Result<SharedValidator, RuleError> {
        let validator: SharedValidator = match self {
            RuleDef::NotMissing { message } => Arc::new(match message {
                Some(m) => NotMissing::with_message(m.as_str()),
                None => NotMissing::new(),
            }),
            RuleDef::Numeric { kind, message } => Arc::new(match message {
                Some(m) => NumericCoercible::with_message(*kind, m.as_str()),
                None => NumericCoercible::new(*kind),
            }),
            RuleDef::DateFormat { pattern, message } => Arc::new(match message {
                Some(m) => DateFormat::with_message(pattern.as_str(), m.as_str())?,
                None => DateFormat::new(pattern.as_str())?,
            }),
            RuleDef::Range { min, max, message } => Arc::new(match message {
                Some(m) => InRange::with_message(*min, *max, m.as_str())?,
                None => InRange::new(*min, *max)?,
            }),
            RuleDef::OneOf { values, message } => Arc::new(match message {
                Some(m) => OneOf::with_message(values.clone(), m.as_str())?,
                None => OneOf::new(values.clone())?,
            }),
            RuleDef::Pattern { regex, message } => Arc::new(match message {
                Some(m) => MatchesPattern::with_message(regex, m.as_str())?,
                None => MatchesPattern::new(regex)?,
            }),
        };
        Ok(validator)
    }
}

impl SchemaFile {
    pub fn from_toml_str(content: &str) -> Result<Self, SchemaError> {
        Ok(toml::from_str(content)?)
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }
}

impl TryFrom<&SchemaFile> for Schema {
    type Error = SchemaError;

    fn try_from(file: &SchemaFile) -> Result<Self, Self::Error> {
        let mut rule_sets = Vec::with_capacity(file.columns.len());
        for column in &file.columns {
            let validators = column
                .rules
                .iter()
                .enumerate()
                .map(|(index, rule)| {
                    rule.to_validator().map_err(|source| SchemaError::InvalidRule {
                        schema: file.schema.name.clone(),
                        column: column.name.clone(),
                        index,
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rule_sets.push(ColumnRuleSet::new(column.name.as_str(), validators));
        }

        Ok(Schema::new(rule_sets).with_name(file.schema.name.as_str()))
    }
}

impl TryFrom<SchemaFile> for Schema {
    type Error = SchemaError;

    fn try_from(file: SchemaFile) -> Result<Self, Self::Error> {
        Schema::try_from(&file)
    }
}
