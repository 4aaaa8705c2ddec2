//! Tabular Validator
//!
//! Declarative validation and cleaning of in-memory tabular datasets.
//!
//! This library provides:
//! - Typed cells and row-identified datasets, with CSV loading and export
//! - Validators, column rule sets and schemas
//! - Error reports and row cleaning driven by them
//! - TOML schema definitions and a schema registry
//! - Configuration management for the `tabval` binary

pub mod config;
pub mod dataset;
pub mod runner;
pub mod schema;
pub mod validation;

// Re-exports for clean public API
pub use config::Config;
pub use dataset::{CsvLoader, Dataset, NumericKind, RowId, Value};
pub use schema::{SchemaFile, SchemaRegistry};
pub use validation::{
    clean, validate, ColumnRuleSet, ErrorReport, Schema, ValidationError, Validator,
};
