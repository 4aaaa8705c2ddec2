use std::fs;

use tabular_validator::schema::{SchemaPriority, SchemaRegistry};
use tabular_validator::{validate, CsvLoader, RowId};

const CUSTOM_POPULATION: &str = r#"
[schema]
name = "population"
description = "workspace override"

[[columns]]
name = "Value"
rules = [{ kind = "not_missing" }]
"#;

#[test]
fn test_directory_schema_overrides_built_in() {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(dir.path().join("population.schema.toml"), CUSTOM_POPULATION).expect("write schema");
    // Ignored: wrong suffix
    fs::write(dir.path().join("notes.toml"), "not a schema").expect("write file");

    let registry =
        SchemaRegistry::load(&[dir.path().join("absent"), dir.path().to_path_buf()]).expect("load");

    let loaded = registry.get("population").expect("population schema");
    assert_eq!(loaded.priority, SchemaPriority::Explicit);
    assert_eq!(
        loaded.file.schema.description.as_deref(),
        Some("workspace override")
    );
    assert_eq!(
        loaded.source_path.as_deref(),
        Some(dir.path().join("population.schema.toml").as_path())
    );

    let schema = registry.build("population").expect("compile schema");
    assert_eq!(schema.columns().collect::<Vec<_>>(), vec!["Value"]);
}

#[test]
fn test_invalid_schema_file_is_skipped() {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(dir.path().join("broken.schema.toml"), "[schema\nname=").expect("write schema");
    fs::write(
        dir.path().join("extra.schema.toml"),
        "[schema]\nname = \"extra\"\n",
    )
    .expect("write schema");

    let mut registry = SchemaRegistry::new();
    let loaded = registry
        .load_directory(dir.path(), SchemaPriority::UserGlobal)
        .expect("load directory");

    assert_eq!(loaded, 1);
    assert_eq!(registry.list_schemas(), vec!["extra"]);
}

#[test]
fn test_built_in_emissions_schema_on_csv() {
    let content = "\
Year,Country,Total,Solid Fuel,Liquid Fuel,Gas Fuel,Cement,Gas Flaring,Per Capita,Bunker fuels (Not in Total)
1751,UNITED KINGDOM,2552,2552,0,0,0,0,,0
1752,UNITED KINGDOM,2553,2553,0,0,0,0,,0
1753,,2553,2553,0,0,0,0,,0
175x,FRANCE,n/a,10,0,0,0,0,,0
";
    let dataset = CsvLoader::new().load_str(content).expect("load csv");
    let schema = SchemaRegistry::with_built_ins()
        .build("fossil-fuel-co2-emissions")
        .expect("built-in schema");

    let report = validate(&dataset, &schema);
    assert!(report.configuration_errors().is_empty());

    let rendered: Vec<String> = report.errors().iter().map(|e| e.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "{row: 3, column: \"Year\"}: does not match the date format string \"%Y\"",
            "{row: 2, column: \"Country\"}: cannot be empty",
            "{row: 3, column: \"Total\"}: is not integer value",
        ]
    );
    assert_eq!(
        report.failed_rows().into_iter().collect::<Vec<_>>(),
        vec![RowId(2), RowId(3)]
    );
}

#[test]
fn test_built_in_drug_spending_years_and_totals() {
    let content = "\
LOCATION,TIME,TOTAL_SPEND
AUS,1971,2467.8
AUS,91,462.11
AUS,1990,12
AUS,1993,2467.8x
";
    let dataset = CsvLoader::new().load_str(content).expect("load csv");
    let schema = SchemaRegistry::with_built_ins()
        .build("pharmaceutical-drug-spending")
        .expect("built-in schema");

    let report = validate(&dataset, &schema);
    let errors: Vec<_> = report
        .errors()
        .iter()
        .map(|e| (e.row.0, e.column.as_str(), e.message.as_str()))
        .collect();
    assert_eq!(
        errors,
        vec![
            (1, "TIME", "does not match the date format string \"%Y\""),
            (3, "TOTAL_SPEND", "is not integer value"),
        ]
    );
}
