//! Validation Engine
//!
//! Runs a schema against a dataset and removes the rows it reports.

use super::report::{EngineError, ErrorReport};
use super::rules::ColumnRuleSet;
use crate::dataset::Dataset;

/// Ordered column rule sets, at most one per column
#[derive(Debug, Clone, Default)]
pub struct Schema {
    name: Option<String>,
    rule_sets: Vec<ColumnRuleSet>,
}

impl Schema {
    /// Build a schema; when a column is declared twice the last declaration
    /// wins and takes the position of that last declaration
    pub fn new(rule_sets: Vec<ColumnRuleSet>) -> Self {
        let mut kept: Vec<ColumnRuleSet> = Vec::with_capacity(rule_sets.len());
        for rule_set in rule_sets {
            if let Some(pos) = kept.iter().position(|r| r.column() == rule_set.column()) {
                log::warn!(
                    "Column '{}' declared more than once; using the last declaration",
                    rule_set.column()
                );
                kept.remove(pos);
            }
            kept.push(rule_set);
        }

        Self {
            name: None,
            rule_sets: kept,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn rule_sets(&self) -> &[ColumnRuleSet] {
        &self.rule_sets
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.rule_sets.iter().map(|r| r.column())
    }

    /// Validate every column rule set against every row
    pub fn validate(&self, dataset: &Dataset) -> ErrorReport {
        let mut report = ErrorReport::new();
        for rule_set in &self.rule_sets {
            match rule_set.evaluate(dataset) {
                Ok(errors) => report.extend_errors(errors),
                Err(config_error) => {
                    log::warn!("{}", config_error);
                    report.add_configuration_error(config_error);
                }
            }
        }

        log::info!(
            "Validated {} rows against {} columns: {} errors in {} rows",
            dataset.len(),
            self.rule_sets.len(),
            report.errors().len(),
            report.failed_rows().len()
        );
        report
    }

    /// Validate, failing if any rule set names a column the dataset lacks
    pub fn validate_strict(&self, dataset: &Dataset) -> Result<ErrorReport, EngineError> {
        let missing: Vec<String> = self
            .columns()
            .filter(|c| !dataset.has_column(c))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(EngineError::MissingColumns(missing));
        }
        Ok(self.validate(dataset))
    }
}

/// Validate `dataset` against `schema`
pub fn validate(dataset: &Dataset, schema: &Schema) -> ErrorReport {
    schema.validate(dataset)
}

/// Drop every row referenced by a data error.
///
/// Surviving rows keep their order and identifiers. Configuration errors never
/// drop rows.
pub fn clean(dataset: &Dataset, report: &ErrorReport) -> Dataset {
    let failed = report.failed_rows();
    let cleaned = dataset.retain_rows(|row| !failed.contains(&row.id));
    log::info!(
        "Dropped {} of {} rows",
        dataset.len() - cleaned.len(),
        dataset.len()
    );
    cleaned
}
