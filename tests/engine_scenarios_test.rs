//! End-to-end behaviour of validation and cleaning on in-memory datasets
use std::collections::BTreeSet;

use tabular_validator::validation::validator::{custom, date_format, not_missing, numeric};
use tabular_validator::{
    clean, validate, ColumnRuleSet, Dataset, NumericKind, RowId, Schema, Value,
};

fn totals_dataset(values: Vec<Value>) -> Dataset {
    let mut dataset = Dataset::new(["Total"]).expect("create dataset");
    for value in values {
        dataset.push_row(vec![value]).expect("push row");
    }
    dataset
}

fn total_schema() -> Schema {
    Schema::new(vec![ColumnRuleSet::new(
        "Total",
        vec![not_missing(), numeric(NumericKind::Int)],
    )])
}

fn emissions_dataset() -> Dataset {
    let mut dataset = Dataset::new(["Year", "Country", "Total", "Cement"]).expect("create dataset");
    let rows: Vec<Vec<Value>> = vec![
        vec![Value::Integer(1990), "POLAND".into(), "120".into(), "4".into()],
        vec![Value::Integer(1991), Value::Missing, "NaN".into(), "5".into()],
        vec!["199x".into(), "PERU".into(), Value::Missing, Value::Missing],
        vec![Value::Integer(1993), "CHILE".into(), "77".into(), "1.5".into()],
        vec![Value::Integer(1994), "CUBA".into(), "15".into(), "0".into()],
    ];
    for row in rows {
        dataset.push_row(row).expect("push row");
    }
    dataset
}

fn emissions_schema() -> Schema {
    Schema::new(vec![
        ColumnRuleSet::new("Year", vec![date_format("%Y").expect("valid pattern")]),
        ColumnRuleSet::new("Total", vec![not_missing(), numeric(NumericKind::Int)]),
        ColumnRuleSet::new("Country", vec![not_missing()]),
        ColumnRuleSet::new("Cement", vec![not_missing(), numeric(NumericKind::Int)]),
    ])
}

#[test]
fn test_total_column_scenario() {
    let dataset = totals_dataset(vec!["120".into(), "NaN".into(), Value::Missing]);

    let report = validate(&dataset, &total_schema());
    let errors: Vec<_> = report
        .errors()
        .iter()
        .map(|e| (e.row, e.column.as_str(), e.message.as_str()))
        .collect();
    assert_eq!(
        errors,
        vec![
            (RowId(1), "Total", "is not integer value"),
            (RowId(2), "Total", "cannot be empty"),
        ]
    );

    let cleaned = clean(&dataset, &report);
    assert_eq!(cleaned.row_ids().collect::<Vec<_>>(), vec![RowId(0)]);
    assert_eq!(
        cleaned.value(RowId(0), "Total"),
        Some(&Value::String("120".to_string()))
    );
}

#[test]
fn test_missing_column_scenario() {
    let dataset = totals_dataset(vec!["1".into(), "x".into(), Value::Missing]);
    let schema = Schema::new(vec![ColumnRuleSet::new(
        "Price",
        vec![not_missing(), numeric(NumericKind::Float)],
    )]);

    let report = validate(&dataset, &schema);
    assert_eq!(report.configuration_errors().len(), 1);
    assert_eq!(report.configuration_errors()[0].column, "Price");
    assert!(report.errors().is_empty());
    assert!(report.ensure_configured().is_err());

    let cleaned = clean(&dataset, &report);
    assert_eq!(cleaned, dataset);
}

#[test]
fn test_clean_dataset_scenario() {
    let dataset = totals_dataset((1..=5).map(|i| Value::Integer(i * 10)).collect());

    let report = validate(&dataset, &total_schema());
    assert!(report.is_clean());

    let cleaned = clean(&dataset, &report);
    assert_eq!(cleaned, dataset);
}

#[test]
fn test_validation_is_deterministic() {
    let dataset = emissions_dataset();
    let schema = emissions_schema();

    let first = validate(&dataset, &schema);
    let second = validate(&dataset, &schema);
    assert_eq!(first, second);

    let mut a = Vec::new();
    let mut b = Vec::new();
    first.write_csv(&mut a).expect("write report");
    second.write_csv(&mut b).expect("write report");
    assert_eq!(a, b);
}

#[test]
fn test_report_order_is_schema_then_rows() {
    let report = validate(&emissions_dataset(), &emissions_schema());
    let order: Vec<_> = report
        .errors()
        .iter()
        .map(|e| (e.column.as_str(), e.row.0))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Year", 2),
            ("Total", 1),
            ("Total", 2),
            ("Country", 1),
            ("Cement", 2),
            ("Cement", 3),
        ]
    );
}

#[test]
fn test_cleaning_removes_exactly_the_reported_rows() {
    let dataset = emissions_dataset();
    let report = validate(&dataset, &emissions_schema());
    let cleaned = clean(&dataset, &report);

    let original: BTreeSet<RowId> = dataset.row_ids().collect();
    let reported: BTreeSet<RowId> = report.errors().iter().map(|e| e.row).collect();
    let remaining: BTreeSet<RowId> = cleaned.row_ids().collect();
    assert_eq!(
        remaining,
        original.difference(&reported).copied().collect::<BTreeSet<_>>()
    );

    // Surviving rows are the original rows, unrenumbered
    for row in cleaned.rows() {
        assert_eq!(dataset.row(row.id), Some(row));
    }
    assert_eq!(
        cleaned.row_ids().collect::<Vec<_>>(),
        vec![RowId(0), RowId(4)]
    );
}

#[test]
fn test_cleaning_is_idempotent() {
    let schema = emissions_schema();
    let cleaned = clean(&emissions_dataset(), &validate(&emissions_dataset(), &schema));

    let report = validate(&cleaned, &schema);
    assert!(report.is_clean());
    assert_eq!(clean(&cleaned, &report), cleaned);
}

#[test]
fn test_independent_failures_are_all_reported() {
    let schema = Schema::new(vec![ColumnRuleSet::new(
        "Total",
        vec![
            numeric(NumericKind::Float),
            custom("must be upper case", |v: &Value| {
                v.as_text()
                    .is_none_or(|t| t.chars().all(|c| !c.is_lowercase()))
            }),
        ],
    )]);
    let dataset = totals_dataset(vec!["abc".into(), "ABC".into()]);

    let report = validate(&dataset, &schema);
    let messages: Vec<_> = report
        .errors()
        .iter()
        .map(|e| (e.row.0, e.message.as_str()))
        .collect();
    assert_eq!(
        messages,
        vec![
            (0, "is not float value"),
            (0, "must be upper case"),
            (1, "is not float value"),
        ]
    );
    // A row with several errors is dropped once
    assert!(clean(&dataset, &report).is_empty());
}
