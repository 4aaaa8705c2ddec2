//! Full runs of the validation pipeline against files on disk
use std::fs;
use std::path::Path;

use clap::Parser;
use tabular_validator::config::{Args, Config};
use tabular_validator::runner::{run, RunSummary};

const DRUG_SPENDING: &str = "\
LOCATION,INDICATOR,SUBJECT,MEASURE,FREQUENCY,TIME,PC_HEALTHXP,PC_GDP,USD_CAP,FLAG_CODES,TOTAL_SPEND
AUS,PHARMAREV,TOT,PC_HEALTHXP,A,1971,15.992,0.726,33.99,,462.11
AUS,PHARMAREV,TOT,PC_HEALTHXP,A,1972,15.091,0.685,34.184,,475.11
Aus,PHARMAREV,TOT,PC_HEALTHXP,A,1973,15.117,0.681,36.138,,valid?
AUS,PHARMAREV,TOT,PC_HEALTHXP,A,19x4,14.771,0.754,39.234,,
";

fn config_for(dir: &Path, extra: &[&str]) -> Config {
    let input = dir.join("pharmaceutical-drug-spending.csv");
    fs::write(&input, DRUG_SPENDING).expect("write input");

    let cleaned = dir.join("cleaned_data.csv");
    let errors = dir.join("errors.csv");
    let mut argv = vec![
        "tabval".to_string(),
        input.display().to_string(),
        "--cleaned".to_string(),
        cleaned.display().to_string(),
        "--errors".to_string(),
        errors.display().to_string(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));

    Config::from_args(Args::try_parse_from(argv).expect("parse args")).expect("create config")
}

#[tokio::test]
async fn test_run_writes_cleaned_data_and_errors() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = config_for(dir.path(), &["--schema", "pharmaceutical-drug-spending"]);

    let summary = run(&config).await.expect("run");
    assert_eq!(
        summary,
        RunSummary {
            rows: 4,
            errors: 4,
            dropped: 2,
            kept: 2,
        }
    );

    let cleaned = fs::read_to_string(&config.cleaned_path).expect("read cleaned");
    let cleaned_ids: Vec<&str> = cleaned
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap_or(""))
        .collect();
    assert_eq!(cleaned_ids, vec!["0", "1"]);
    assert!(cleaned.starts_with("row,LOCATION,INDICATOR"));

    let errors = fs::read_to_string(&config.errors_path).expect("read errors");
    let lines: Vec<&str> = errors.lines().collect();
    assert_eq!(lines[0], "row,error");
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("2,"));
    assert!(lines[1].contains("is not an alpha-3 country code"));
    assert!(lines[2].starts_with("3,"));
    assert!(lines[2].contains("TIME"));
    assert!(lines[3].contains("TOTAL_SPEND") && lines[3].contains("is not integer value"));
    assert!(lines[4].starts_with("3,") && lines[4].contains("cannot be empty"));
}

#[tokio::test]
async fn test_parallel_run_matches_sequential() {
    let sequential_dir = tempfile::tempdir().expect("create temp dir");
    let parallel_dir = tempfile::tempdir().expect("create temp dir");

    let sequential = config_for(
        sequential_dir.path(),
        &["--schema", "pharmaceutical-drug-spending"],
    );
    let parallel = config_for(
        parallel_dir.path(),
        &["--schema", "pharmaceutical-drug-spending", "--parallel"],
    );

    let a = run(&sequential).await.expect("sequential run");
    let b = run(&parallel).await.expect("parallel run");
    assert_eq!(a, b);

    for (x, y) in [
        (&sequential.errors_path, &parallel.errors_path),
        (&sequential.cleaned_path, &parallel.cleaned_path),
    ] {
        assert_eq!(
            fs::read(x).expect("read sequential"),
            fs::read(y).expect("read parallel")
        );
    }
}

#[tokio::test]
async fn test_configuration_error_aborts_before_writing() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let schema_path = dir.path().join("prices.schema.toml");
    fs::write(
        &schema_path,
        "[schema]\nname = \"prices\"\n\n[[columns]]\nname = \"Price\"\nrules = [{ kind = \"not_missing\" }]\n",
    )
    .expect("write schema");

    let schema_arg = schema_path.display().to_string();
    let config = config_for(dir.path(), &["--schema-file", &schema_arg]);

    let err = run(&config).await.expect_err("missing column must fail");
    let chain = format!("{:#}", err);
    assert!(chain.contains("Price"), "unexpected error: {chain}");
    assert!(!config.errors_path.exists());
    assert!(!config.cleaned_path.exists());
}

#[tokio::test]
async fn test_json_report_and_missing_tokens() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = config_for(
        dir.path(),
        &[
            "--schema",
            "pharmaceutical-drug-spending",
            "--missing-token",
            "valid?",
            "--error-format",
            "json",
        ],
    );

    run(&config).await.expect("run");

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config.errors_path).expect("read errors"))
            .expect("parse json");
    let messages: Vec<&str> = report
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|r| r["error"].as_str())
        .collect();
    assert!(messages.iter().all(|m| !m.contains("is not integer value")));
    assert_eq!(
        messages
            .iter()
            .filter(|m| m.contains("TOTAL_SPEND") && m.contains("cannot be empty"))
            .count(),
        2
    );
}

#[tokio::test]
async fn test_unknown_schema_name() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = config_for(dir.path(), &["--schema", "no-such-schema"]);

    let err = run(&config).await.expect_err("unknown schema must fail");
    assert!(format!("{:#}", err).contains("no-such-schema"));
}
