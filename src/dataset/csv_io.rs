//! CSV Loading and Export
//!
//! Cells are typed here, once: blank cells and configured missing tokens
//! become `Value::Missing`, integers and finite floats become numbers, columns
//! listed as date columns become dates when they parse, anything else is text.

use super::table::{Dataset, DatasetError, RowId};
use super::value::Value;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::io::{Read, Write};
use std::path::Path;

/// Default date format for date columns
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// CSV loader with configurable missing-value and typing rules
#[derive(Debug, Clone)]
pub struct CsvLoader {
    delimiter: u8,
    missing_tokens: Vec<String>,
    id_column: Option<String>,
    date_columns: Vec<String>,
    date_format: String,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            missing_tokens: Vec::new(),
            id_column: None,
            date_columns: Vec::new(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl CsvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Treat cells equal to `token` (after trimming) as missing
    pub fn with_missing_token(mut self, token: impl Into<String>) -> Self {
        self.missing_tokens.push(token.into());
        self
    }

    /// Read row identifiers from `column` instead of numbering rows
    pub fn with_id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = Some(column.into());
        self
    }

    pub fn with_date_column(mut self, column: impl Into<String>) -> Self {
        self.date_columns.push(column.into());
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn load_file(&self, path: &Path) -> Result<Dataset, DatasetError> {
        let file = std::fs::File::open(path)?;
        self.load_reader(file)
    }

    pub fn load_str(&self, content: &str) -> Result<Dataset, DatasetError> {
        self.load_reader(content.as_bytes())
    }

    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Dataset, DatasetError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::None)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let id_index = match &self.id_column {
            Some(name) => Some(
                headers
                    .iter()
                    .position(|h| h == name)
                    .ok_or_else(|| DatasetError::UnknownIdColumn(name.clone()))?,
            ),
            None => None,
        };

        let columns: Vec<&str> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != id_index)
            .map(|(_, h)| h)
            .collect();
        let is_date: Vec<bool> = columns
            .iter()
            .map(|c| self.date_columns.iter().any(|d| d == c))
            .collect();

        let mut dataset = Dataset::new(columns.iter().copied())?;

        for record in reader.records() {
            let record = record?;
            let id = match id_index {
                Some(index) => Some(parse_row_id(&record, index)?),
                None => None,
            };
            let source: Vec<String> = record
                .iter()
                .enumerate()
                .filter(|(i, _)| Some(*i) != id_index)
                .map(|(_, raw)| raw.to_string())
                .collect();
            let cells = source
                .iter()
                .zip(&is_date)
                .map(|(raw, &date)| self.parse_cell(raw, date))
                .collect();
            dataset.push_source_row(id, cells, source)?;
        }

        log::debug!(
            "Loaded {} rows across {} columns",
            dataset.len(),
            dataset.columns().len()
        );
        Ok(dataset)
    }

    fn parse_cell(&self, raw: &str, date: bool) -> Value {
        let trimmed = raw.trim();
        if trimmed.is_empty() || self.missing_tokens.iter().any(|t| t == trimmed) {
            return Value::Missing;
        }

        if date {
            if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, &self.date_format) {
                return Value::Date(parsed);
            }
            return Value::String(raw.to_string());
        }

        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Integer(i);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Value::Float(f),
            _ => Value::String(raw.to_string()),
        }
    }
}

fn parse_row_id(record: &StringRecord, index: usize) -> Result<RowId, DatasetError> {
    let raw = record.get(index).unwrap_or("");
    raw.trim()
        .parse::<usize>()
        .map(RowId)
        .map_err(|_| DatasetError::InvalidRowId {
            value: raw.to_string(),
            line: record.position().map(|p| p.line()).unwrap_or(0),
        })
}

/// Write `dataset` as CSV with the row identifier as the first column.
///
/// Cells read from a file are written with their original text; other cells
/// use the value's textual rendering.
pub fn write_dataset<W: Write>(
    dataset: &Dataset,
    id_header: &str,
    writer: W,
) -> Result<(), DatasetError> {
    let mut writer = WriterBuilder::new().from_writer(writer);

    let mut header = vec![id_header];
    header.extend(dataset.columns().iter().map(String::as_str));
    writer.write_record(&header)?;

    for row in dataset.rows() {
        let mut record = vec![row.id.to_string()];
        record.extend(row.cells().iter().enumerate().map(|(i, value)| {
            row.source_text(i)
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string())
        }));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_dataset_file(
    dataset: &Dataset,
    id_header: &str,
    path: &Path,
) -> Result<(), DatasetError> {
    let file = std::fs::File::create(path)?;
    write_dataset(dataset, id_header, file)
}
