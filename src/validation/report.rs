//! Error Report
//!
//! Data errors and configuration errors are kept apart: the former drive row
//! cleaning, the latter mean the schema does not fit the dataset at all.

use crate::dataset::{DatasetError, RowId};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::io::Write;
use thiserror::Error;

/// A cell that failed one validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub row: RowId,
    pub column: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{row: {}, column: \"{}\"}}: {}",
            self.row, self.column, self.message
        )
    }
}

/// A column rule set that names a column the dataset does not have
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("column \"{column}\" not found in dataset")]
pub struct ConfigurationError {
    pub column: String,
}

/// Fail-fast form of configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("schema references columns missing from the dataset: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Serialization-ready line of an exported report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    /// Absent for dataset-level (configuration) errors
    pub row: Option<RowId>,
    pub error: String,
}

/// Everything one validation run found, in schema-declaration then row order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorReport {
    errors: Vec<ValidationError>,
    configuration_errors: Vec<ConfigurationError>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn extend_errors(&mut self, errors: impl IntoIterator<Item = ValidationError>) {
        self.errors.extend(errors);
    }

    pub(crate) fn add_configuration_error(&mut self, error: ConfigurationError) {
        self.configuration_errors.push(error);
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn configuration_errors(&self) -> &[ConfigurationError] {
        &self.configuration_errors
    }

    /// No data errors and no configuration errors
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.configuration_errors.is_empty()
    }

    pub fn has_configuration_errors(&self) -> bool {
        !self.configuration_errors.is_empty()
    }

    /// Distinct rows referenced by data errors, in ascending order
    pub fn failed_rows(&self) -> BTreeSet<RowId> {
        self.errors.iter().map(|e| e.row).collect()
    }

    /// Turn configuration errors into a hard failure
    pub fn ensure_configured(&self) -> Result<(), EngineError> {
        if self.configuration_errors.is_empty() {
            return Ok(());
        }
        Err(EngineError::MissingColumns(
            self.configuration_errors
                .iter()
                .map(|e| e.column.clone())
                .collect(),
        ))
    }

    /// Report lines: configuration errors first, then data errors in order
    pub fn records(&self) -> Vec<ErrorRecord> {
        let configuration = self.configuration_errors.iter().map(|e| ErrorRecord {
            row: None,
            error: e.to_string(),
        });
        let data = self.errors.iter().map(|e| ErrorRecord {
            row: Some(e.row),
            error: e.to_string(),
        });
        configuration.chain(data).collect()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), DatasetError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(["row", "error"])?;
        for record in self.records() {
            let row = record.row.map(|r| r.to_string()).unwrap_or_default();
            writer.write_record([row.as_str(), record.error.as_str()])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, &self.records())
    }
}
