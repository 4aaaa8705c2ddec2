//! In-memory Table
//!
//! Rows keep the identifier they were given when loaded. Filtering produces a
//! new dataset whose identifiers are a subset of the original ones.

use super::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Stable, zero-based row identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub usize);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised while building or loading a dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("row {row} has {actual} cells, expected {expected}")]
    RowWidth {
        row: RowId,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate row identifier {0}")]
    DuplicateRowId(RowId),

    #[error("duplicate column '{0}' in header")]
    DuplicateColumn(String),

    #[error("id column '{0}' not found in header")]
    UnknownIdColumn(String),

    #[error("invalid row identifier '{value}' on line {line}")]
    InvalidRowId { value: String, line: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// A single row: its identifier and one value per dataset column.
///
/// Rows read from a file also keep the text each cell was read from, so
/// they can be written back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: RowId,
    cells: Vec<Value>,
    source: Option<Vec<String>>,
}

impl Row {
    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Value> {
        self.cells.get(index)
    }

    /// Text the cell at `index` was read from, if the row came from a file
    pub fn source_text(&self, index: usize) -> Option<&str> {
        self.source.as_ref()?.get(index).map(String::as_str)
    }
}

/// Ordered rows sharing one column header
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
    ids: HashSet<RowId>,
}

impl Dataset {
    /// Create an empty dataset with the given header
    pub fn new<I, S>(columns: I) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(DatasetError::DuplicateColumn(column.clone()));
            }
        }

        Ok(Self {
            columns,
            rows: Vec::new(),
            ids: HashSet::new(),
        })
    }

    fn next_id(&self) -> RowId {
        let id = RowId(self.rows.last().map(|r| r.id.0 + 1).unwrap_or(0));
        // The last id is not necessarily the largest when ids were supplied
        if self.ids.contains(&id) {
            RowId(self.ids.iter().map(|r| r.0).max().unwrap_or(0) + 1)
        } else {
            id
        }
    }

    /// Append a row, assigning the next free identifier
    pub fn push_row(&mut self, cells: Vec<Value>) -> Result<RowId, DatasetError> {
        let id = self.next_id();
        self.insert_row(id, cells, None)?;
        Ok(id)
    }

    /// Append a row under an explicit identifier
    pub fn push_row_with_id(&mut self, id: RowId, cells: Vec<Value>) -> Result<(), DatasetError> {
        self.insert_row(id, cells, None)
    }

    /// Append a row together with the text of each cell. Without an explicit
    /// identifier the next free one is assigned.
    pub fn push_source_row(
        &mut self,
        id: Option<RowId>,
        cells: Vec<Value>,
        source: Vec<String>,
    ) -> Result<RowId, DatasetError> {
        let id = id.unwrap_or_else(|| self.next_id());
        self.insert_row(id, cells, Some(source))?;
        Ok(id)
    }

    fn insert_row(
        &mut self,
        id: RowId,
        cells: Vec<Value>,
        source: Option<Vec<String>>,
    ) -> Result<(), DatasetError> {
        let actual = match &source {
            Some(text) if text.len() != cells.len() => text.len(),
            _ => cells.len(),
        };
        if actual != self.columns.len() {
            return Err(DatasetError::RowWidth {
                row: id,
                expected: self.columns.len(),
                actual,
            });
        }
        if !self.ids.insert(id) {
            return Err(DatasetError::DuplicateRowId(id));
        }
        self.rows.push(Row { id, cells, source });
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row identifiers in row order
    pub fn row_ids(&self) -> impl Iterator<Item = RowId> + '_ {
        self.rows.iter().map(|r| r.id)
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        if !self.ids.contains(&id) {
            return None;
        }
        self.rows.iter().find(|r| r.id == id)
    }

    /// Value of `column` in row `id`
    pub fn value(&self, id: RowId, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.row(id)?.cell(index)
    }

    /// New dataset holding the rows accepted by `keep`, in their original
    /// order and with their identifiers unchanged
    pub fn retain_rows<F>(&self, mut keep: F) -> Dataset
    where
        F: FnMut(&Row) -> bool,
    {
        let rows: Vec<Row> = self.rows.iter().filter(|r| keep(r)).cloned().collect();
        let ids = rows.iter().map(|r| r.id).collect();
        Dataset {
            columns: self.columns.clone(),
            rows,
            ids,
        }
    }
}
