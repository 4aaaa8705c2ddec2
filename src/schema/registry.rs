//! Schema Registry
//!
//! Named schema definitions from three sources, in increasing priority:
//! built-in (embedded in the binary), the user config directory, and
//! directories given on the command line.

use super::file::{SchemaError, SchemaFile};
use crate::validation::Schema;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File suffix of schema definitions inside schema directories
pub const SCHEMA_FILE_SUFFIX: &str = ".schema.toml";

const BUILT_IN_SCHEMAS: &[(&str, &str)] = &[
    (
        "fossil-fuel-co2-emissions",
        include_str!("../../resources/schemas/fossil-fuel-co2-emissions.schema.toml"),
    ),
    (
        "population",
        include_str!("../../resources/schemas/population.schema.toml"),
    ),
    (
        "pharmaceutical-drug-spending",
        include_str!("../../resources/schemas/pharmaceutical-drug-spending.schema.toml"),
    ),
    (
        "natural-gas-price-monthly",
        include_str!("../../resources/schemas/natural-gas-price-monthly.schema.toml"),
    ),
];

/// Where a schema definition came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SchemaPriority {
    BuiltIn = 0,
    UserGlobal = 1,
    Explicit = 2,
}

/// A schema definition together with its origin
#[derive(Debug, Clone)]
pub struct LoadedSchema {
    pub file: SchemaFile,
    pub priority: SchemaPriority,
    pub source_path: Option<PathBuf>,
}

/// In-memory registry of schema definitions, keyed by name
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, LoadedSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in schemas
    pub fn with_built_ins() -> Self {
        let mut registry = Self::new();
        registry.add_built_in_schemas();
        registry
    }

    /// Registry holding the built-ins plus every schema found in `dirs`.
    ///
    /// The first directory is the user-global one; later ones take priority.
    pub fn load(dirs: &[PathBuf]) -> Result<Self> {
        let mut registry = Self::with_built_ins();
        for (i, dir) in dirs.iter().enumerate() {
            let priority = if i == 0 {
                SchemaPriority::UserGlobal
            } else {
                SchemaPriority::Explicit
            };
            registry.load_directory(dir, priority)?;
        }
        log::info!("Loaded {} schemas", registry.schemas.len());
        Ok(registry)
    }

    pub fn add_built_in_schemas(&mut self) {
        for (name, content) in BUILT_IN_SCHEMAS {
            match SchemaFile::from_toml_str(content) {
                Ok(file) => self.insert(file, SchemaPriority::BuiltIn, None),
                Err(e) => log::error!("Failed to parse built-in schema '{}': {}", name, e),
            }
        }
    }

    /// Add a schema definition; equal or higher priority replaces an existing
    /// definition of the same name
    pub fn insert(&mut self, file: SchemaFile, priority: SchemaPriority, source_path: Option<PathBuf>) {
        let name = file.name().to_string();
        if let Some(existing) = self.schemas.get(&name) {
            if priority < existing.priority {
                log::debug!(
                    "Keeping higher-priority schema '{}' ({:?})",
                    name,
                    existing.priority
                );
                return;
            }
            log::info!(
                "Schema '{}' from {} replaces {:?} definition",
                name,
                source_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "memory".to_string()),
                existing.priority
            );
        }

        self.schemas.insert(
            name,
            LoadedSchema {
                file,
                priority,
                source_path,
            },
        );
    }

    /// Load every `*.schema.toml` file in `dir`. A missing directory is not
    /// an error; an unreadable or invalid file is logged and skipped.
    pub fn load_directory(&mut self, dir: &Path, priority: SchemaPriority) -> Result<usize> {
        if !dir.exists() {
            log::debug!("Schema directory {} does not exist", dir.display());
            return Ok(0);
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read schema directory: {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(SCHEMA_FILE_SUFFIX))
            })
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            match load_schema_file(&path) {
                Ok(file) => {
                    self.insert(file, priority, Some(path));
                    loaded += 1;
                }
                Err(e) => log::error!("Failed to load schema file {}: {}", path.display(), e),
            }
        }
        Ok(loaded)
    }

    pub fn get(&self, name: &str) -> Option<&LoadedSchema> {
        self.schemas.get(name)
    }

    /// Compile the named schema
    pub fn build(&self, name: &str) -> Result<Schema, SchemaError> {
        let loaded = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;
        Schema::try_from(&loaded.file)
    }

    /// Schema names in sorted order
    pub fn list_schemas(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }
}

/// Read and parse a single schema file
pub fn load_schema_file(path: &Path) -> Result<SchemaFile, SchemaError> {
    let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    SchemaFile::from_toml_str(&content)
}
