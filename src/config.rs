//! Configuration management for the tabular validator.
//!
//! Handles:
//! - Command-line argument parsing
//! - Schema directory resolution
//! - Loader and output settings

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::dataset::csv_io::DEFAULT_DATE_FORMAT;
use crate::dataset::CsvLoader;

/// Output encoding of the exported error report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

/// Command-line arguments for the tabular validator
#[derive(Debug, Parser)]
#[command(name = "tabval")]
#[command(about = "Validate a CSV dataset against a column schema and drop invalid rows")]
#[command(version)]
pub struct Args {
    /// CSV file to validate
    pub input: PathBuf,

    /// Name of a built-in or registered schema
    #[arg(long, conflicts_with = "schema_file")]
    pub schema: Option<String>,

    /// Path to a schema TOML file
    #[arg(long)]
    pub schema_file: Option<PathBuf>,

    /// Additional directory containing *.schema.toml files
    #[arg(long)]
    pub schema_dir: Option<PathBuf>,

    /// Where to write the cleaned dataset
    #[arg(long, default_value = "cleaned_data.csv")]
    pub cleaned: PathBuf,

    /// Where to write the error report
    #[arg(long, default_value = "errors.csv")]
    pub errors: PathBuf,

    /// Encoding of the error report
    #[arg(long, value_enum, default_value_t = ReportFormat::Csv)]
    pub error_format: ReportFormat,

    /// Column holding row identifiers (rows are numbered from 0 otherwise)
    #[arg(long)]
    pub id_column: Option<String>,

    /// Cell text treated as missing, in addition to blank cells
    #[arg(long = "missing-token")]
    pub missing_tokens: Vec<String>,

    /// Column parsed as dates when loading
    #[arg(long = "parse-dates")]
    pub date_columns: Vec<String>,

    /// Format of date columns
    #[arg(long, default_value = DEFAULT_DATE_FORMAT)]
    pub date_format: String,

    /// Validate columns on parallel tasks
    #[arg(long)]
    pub parallel: bool,

    /// Log level for the validator
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// How the schema to run is selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    Named(String),
    File(PathBuf),
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub schema: SchemaSource,
    /// Schema directories, lowest priority first
    pub schema_dirs: Vec<PathBuf>,
    pub cleaned_path: PathBuf,
    pub errors_path: PathBuf,
    pub error_format: ReportFormat,
    pub id_column: Option<String>,
    pub missing_tokens: Vec<String>,
    pub date_columns: Vec<String>,
    pub date_format: String,
    pub parallel: bool,
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let schema = match (args.schema, args.schema_file) {
            (Some(name), None) => SchemaSource::Named(name),
            (None, Some(path)) => SchemaSource::File(path),
            (Some(_), Some(_)) => bail!("--schema and --schema-file are mutually exclusive"),
            (None, None) => bail!("one of --schema or --schema-file is required"),
        };

        let mut schema_dirs = Vec::new();

        // Default user config directory
        if let Some(config_dir) = dirs::config_dir() {
            schema_dirs.push(config_dir.join("tabval").join("schemas"));
        }

        // User-specified directory takes priority
        if let Some(custom_dir) = args.schema_dir {
            schema_dirs.push(custom_dir);
        }

        Ok(Config {
            input: args.input,
            schema,
            schema_dirs,
            cleaned_path: args.cleaned,
            errors_path: args.errors,
            error_format: args.error_format,
            id_column: args.id_column,
            missing_tokens: args.missing_tokens,
            date_columns: args.date_columns,
            date_format: args.date_format,
            parallel: args.parallel,
            log_level: args.log_level,
        })
    }

    /// CSV loader matching the configured typing rules
    pub fn loader(&self) -> CsvLoader {
        let mut loader = CsvLoader::new().with_date_format(self.date_format.as_str());
        for token in &self.missing_tokens {
            loader = loader.with_missing_token(token.as_str());
        }
        for column in &self.date_columns {
            loader = loader.with_date_column(column.as_str());
        }
        if let Some(id_column) = &self.id_column {
            loader = loader.with_id_column(id_column.as_str());
        }
        loader
    }

    /// Header of the identifier column in the cleaned dataset
    pub fn id_header(&self) -> &str {
        self.id_column.as_deref().unwrap_or("row")
    }
}
