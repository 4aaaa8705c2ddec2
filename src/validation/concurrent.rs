//! Column-parallel validation
//!
//! Column rule sets share no state, so each one can run on its own blocking
//! task. Results are reassembled by declaration index, which makes the report
//! identical to the one `Schema::validate` produces.

use super::engine::Schema;
use super::report::ErrorReport;
use crate::dataset::Dataset;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Validate each column rule set on a separate blocking task
pub async fn validate_concurrently(schema: Arc<Schema>, dataset: Arc<Dataset>) -> Result<ErrorReport> {
    let mut tasks = JoinSet::new();
    for index in 0..schema.rule_sets().len() {
        let schema = Arc::clone(&schema);
        let dataset = Arc::clone(&dataset);
        tasks.spawn_blocking(move || (index, schema.rule_sets()[index].evaluate(&dataset)));
    }

    let mut outcomes = Vec::with_capacity(schema.rule_sets().len());
    while let Some(joined) = tasks.join_next().await {
        outcomes.push(joined.context("column validation task failed")?);
    }
    outcomes.sort_by_key(|(index, _)| *index);

    let mut report = ErrorReport::new();
    for (_, outcome) in outcomes {
        match outcome {
            Ok(errors) => report.extend_errors(errors),
            Err(config_error) => {
                log::warn!("{}", config_error);
                report.add_configuration_error(config_error);
            }
        }
    }

    log::info!(
        "Validated {} rows against {} columns on parallel tasks: {} errors",
        dataset.len(),
        schema.rule_sets().len(),
        report.errors().len()
    );
    Ok(report)
}
