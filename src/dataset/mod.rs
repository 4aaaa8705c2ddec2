//! Tabular Data
//!
//! Typed cells, row-identified tables and CSV plumbing.

pub mod csv_io;
pub mod table;
pub mod value;

pub use csv_io::{write_dataset, write_dataset_file, CsvLoader};
pub use table::{Dataset, DatasetError, Row, RowId};
pub use value::{NumericKind, Value};
