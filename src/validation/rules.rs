//! Column Rule Sets

use super::report::{ConfigurationError, ValidationError};
use super::validator::{SharedValidator, Validator};
use crate::dataset::Dataset;
use std::sync::Arc;

/// Ordered validators bound to one named column
#[derive(Debug, Clone)]
pub struct ColumnRuleSet {
    column: String,
    validators: Vec<SharedValidator>,
}

impl ColumnRuleSet {
    pub fn new(column: impl Into<String>, validators: Vec<SharedValidator>) -> Self {
        Self {
            column: column.into(),
            validators,
        }
    }

    /// Append a validator; evaluation follows insertion order
    pub fn with(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn validators(&self) -> &[SharedValidator] {
        &self.validators
    }

    /// Apply every validator to every row.
    ///
    /// Failures are not short-circuited: a cell failing two validators yields
    /// two errors, ordered by row and then by validator. A column absent from
    /// the dataset yields a single configuration error and no row errors.
    pub fn evaluate(&self, dataset: &Dataset) -> Result<Vec<ValidationError>, ConfigurationError> {
        let index = dataset
            .column_index(&self.column)
            .ok_or_else(|| ConfigurationError {
                column: self.column.clone(),
            })?;

        let mut errors = Vec::new();
        for row in dataset.rows() {
            // Every row holds one cell per column
            let value = &row.cells()[index];
            for validator in &self.validators {
                if !validator.check(value) {
                    errors.push(ValidationError {
                        row: row.id,
                        column: self.column.clone(),
                        message: validator.message().to_string(),
                    });
                }
            }
        }

        log::debug!(
            "Column '{}': {} validators, {} errors",
            self.column,
            self.validators.len(),
            errors.len()
        );
        Ok(errors)
    }
}
