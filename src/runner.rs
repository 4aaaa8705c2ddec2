//! Validation run: load, validate, clean, export.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;

use crate::config::{Config, ReportFormat, SchemaSource};
use crate::dataset::{write_dataset_file, Dataset};
use crate::schema::{load_schema_file, SchemaRegistry};
use crate::validation::{clean, validate_concurrently, ErrorReport, Schema};

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub rows: usize,
    pub errors: usize,
    pub dropped: usize,
    pub kept: usize,
}

/// Resolve the configured schema from the registry or a schema file
pub fn resolve_schema(config: &Config) -> Result<Schema> {
    match &config.schema {
        SchemaSource::Named(name) => {
            let registry = SchemaRegistry::load(&config.schema_dirs)?;
            registry.build(name).with_context(|| {
                format!(
                    "Available schemas: {}",
                    registry.list_schemas().join(", ")
                )
            })
        }
        SchemaSource::File(path) => {
            let file = load_schema_file(path)?;
            Schema::try_from(file)
                .with_context(|| format!("Invalid schema file: {}", path.display()))
        }
    }
}

/// Validate `dataset` sequentially or on parallel tasks
pub async fn validate_dataset(
    schema: Schema,
    dataset: Arc<Dataset>,
    parallel: bool,
) -> Result<ErrorReport> {
    if parallel {
        validate_concurrently(Arc::new(schema), dataset).await
    } else {
        Ok(schema.validate(&dataset))
    }
}

/// Run the whole pipeline described by `config`.
///
/// Configuration errors abort the run before any artifact is written.
pub async fn run(config: &Config) -> Result<RunSummary> {
    let schema = resolve_schema(config)?;
    log::info!(
        "Using schema '{}' with {} columns",
        schema.name().unwrap_or("unnamed"),
        schema.rule_sets().len()
    );

    let dataset = config
        .loader()
        .load_file(&config.input)
        .with_context(|| format!("Failed to load dataset: {}", config.input.display()))?;
    let dataset = Arc::new(dataset);

    let report = validate_dataset(schema, Arc::clone(&dataset), config.parallel).await?;
    report
        .ensure_configured()
        .context("Schema does not match the dataset")?;

    let cleaned = clean(&dataset, &report);

    write_report(&report, config)?;
    write_dataset_file(&cleaned, config.id_header(), &config.cleaned_path).with_context(|| {
        format!(
            "Failed to write cleaned dataset: {}",
            config.cleaned_path.display()
        )
    })?;

    let summary = RunSummary {
        rows: dataset.len(),
        errors: report.errors().len(),
        dropped: dataset.len() - cleaned.len(),
        kept: cleaned.len(),
    };
    log::info!(
        "{} rows, {} errors, {} rows dropped, {} rows kept",
        summary.rows,
        summary.errors,
        summary.dropped,
        summary.kept
    );
    Ok(summary)
}

fn write_report(report: &ErrorReport, config: &Config) -> Result<()> {
    let path = &config.errors_path;
    let file = File::create(path)
        .with_context(|| format!("Failed to create error report: {}", path.display()))?;
    let writer = BufWriter::new(file);

    match config.error_format {
        ReportFormat::Csv => report.write_csv(writer)?,
        ReportFormat::Json => report.write_json(writer)?,
    }
    log::debug!("Wrote error report to {}", path.display());
    Ok(())
}
