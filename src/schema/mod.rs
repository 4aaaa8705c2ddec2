//! Declarative Schemas
//!
//! TOML schema definitions and the registry that finds them.

pub mod file;
pub mod registry;

pub use file::{ColumnDef, RuleDef, SchemaError, SchemaFile, SchemaMeta};
pub use registry::{load_schema_file, LoadedSchema, SchemaPriority, SchemaRegistry};
