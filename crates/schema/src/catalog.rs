// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schema Catalog
//!
//! Loads a Spider/SParC `tables.json` file and derives, across all databases:
//!
//! - **Surface forms**: how schema items appear in output SQL tokens
//! - **Embedder inputs**: tokenized natural-language names fed to the encoder
//!
//! ## Surface Form Styles
//!
//! | style       | column             | table           |
//! |-------------|--------------------|-----------------|
//! | `Plain`     | `name`             | `table`         |
//! | `Qualified` | `table.name`       | `table.*`       |
//!
//! Surface forms are lower-cased. Columns come first, then tables, database by
//! database in file order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{SchemaError, SchemaResult};
use crate::metadata::DatabaseSchema;

/// How schema items are written in output SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceFormStyle {
    /// Bare column and table names
    #[default]
    Plain,
    /// Table-qualified columns and `table.*` entries
    Qualified,
}

impl SurfaceFormStyle {
    /// Style used by a processed-data directory
    ///
    /// Directories of the `removefrom` preprocessing use qualified names.
    pub fn for_data_directory(dir: impl AsRef<Path>) -> Self {
        if dir.as_ref().to_string_lossy().contains("removefrom") {
            SurfaceFormStyle::Qualified
        } else {
            SurfaceFormStyle::Plain
        }
    }
}

/// All databases of a schema file plus their derived surface forms
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    style: SurfaceFormStyle,
    databases: BTreeMap<String, DatabaseSchema>,
    surface_forms: Vec<String>,
    embedder_inputs: Vec<Vec<String>>,
}

impl SchemaCatalog {
    /// Build a catalog from parsed databases
    ///
    /// A database id seen twice keeps its last schema, but surface forms of
    /// both entries are kept.
    pub fn from_databases(
        databases: Vec<DatabaseSchema>,
        style: SurfaceFormStyle,
    ) -> SchemaResult<Self> {
        let mut catalog = Self {
            style,
            ..Self::default()
        };
        for schema in databases {
            schema.validate()?;
            catalog.add_surface_forms(&schema);
            catalog.databases.insert(schema.db_id.clone(), schema);
        }
        tracing::debug!(
            databases = catalog.databases.len(),
            surface_forms = catalog.surface_forms.len(),
            ?style,
            "loaded schema catalog"
        );
        Ok(catalog)
    }

    /// Parse a `tables.json` document
    pub fn from_json_str(json: &str, style: SurfaceFormStyle) -> SchemaResult<Self> {
        let databases: Vec<DatabaseSchema> =
            serde_json::from_str(json).map_err(|e| SchemaError::SerializationError(e.to_string()))?;
        Self::from_databases(databases, style)
    }

    /// Load a `tables.json` file
    pub fn from_file(path: impl AsRef<Path>, style: SurfaceFormStyle) -> SchemaResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| SchemaError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&json, style)
    }

    fn add_surface_forms(&mut self, schema: &DatabaseSchema) {
        match self.style {
            SurfaceFormStyle::Plain => {
                for (_, column) in &schema.column_names_original {
                    self.surface_forms.push(column.to_lowercase());
                }
                for table in &schema.table_names_original {
                    self.surface_forms.push(table.to_lowercase());
                }
                for (_, column) in &schema.column_names {
                    self.embedder_inputs.push(tokens(column));
                }
                for table in &schema.table_names {
                    self.embedder_inputs.push(tokens(table));
                }
            }
            SurfaceFormStyle::Qualified => {
                for (table_id, column) in &schema.column_names_original {
                    let form = match schema.original_table(*table_id) {
                        Some(table) => format!("{}.{}", table, column),
                        None => column.clone(),
                    };
                    self.surface_forms.push(form.to_lowercase());
                }
                for table in &schema.table_names_original {
                    self.surface_forms.push(format!("{}.*", table.to_lowercase()));
                }
                for (table_id, column) in &schema.column_names {
                    let input = match schema.table(*table_id) {
                        Some(table) => format!("{} . {}", table, column),
                        None => column.clone(),
                    };
                    self.embedder_inputs.push(tokens(&input));
                }
                for table in &schema.table_names {
                    self.embedder_inputs.push(tokens(&format!("{} . *", table)));
                }
            }
        }
    }

    pub fn style(&self) -> SurfaceFormStyle {
        self.style
    }

    /// Schema of `db_id`
    pub fn database(&self, db_id: &str) -> SchemaResult<&DatabaseSchema> {
        self.databases
            .get(db_id)
            .ok_or_else(|| SchemaError::DatabaseNotFound(db_id.to_string()))
    }

    /// Database ids in sorted order
    pub fn database_ids(&self) -> impl Iterator<Item = &str> {
        self.databases.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.databases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }

    /// Lower-cased surface forms of every column and table
    pub fn surface_forms(&self) -> &[String] {
        &self.surface_forms
    }

    /// Whitespace-tokenized natural-language names of every column and table
    pub fn embedder_inputs(&self) -> &[Vec<String>] {
        &self.embedder_inputs
    }
}

fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stadium() -> DatabaseSchema {
        DatabaseSchema::new("concert_singer")
            .with_table("stadium", "Stadium")
            .with_column(0, "stadium id", "Stadium_ID", "number")
            .with_column(0, "name", "Name", "text")
    }

    #[test]
    fn test_style_for_data_directory() {
        assert_eq!(
            SurfaceFormStyle::for_data_directory("processed_data_sparc_removefrom"),
            SurfaceFormStyle::Qualified
        );
        assert_eq!(
            SurfaceFormStyle::for_data_directory("processed_data_sparc"),
            SurfaceFormStyle::Plain
        );
    }

    #[test]
    fn test_plain_surface_forms() {
        let catalog = SchemaCatalog::from_databases(vec![stadium()], SurfaceFormStyle::Plain).unwrap();
        assert_eq!(catalog.surface_forms(), &["*", "stadium_id", "name", "stadium"]);
        assert_eq!(
            catalog.embedder_inputs(),
            &[vec!["*"], vec!["stadium", "id"], vec!["name"], vec!["stadium"]]
        );
    }

    #[test]
    fn test_qualified_surface_forms() {
        let catalog =
            SchemaCatalog::from_databases(vec![stadium()], SurfaceFormStyle::Qualified).unwrap();
        assert_eq!(
            catalog.surface_forms(),
            &["*", "stadium.stadium_id", "stadium.name", "stadium.*"]
        );
        assert_eq!(
            catalog.embedder_inputs(),
            &[
                vec!["*"],
                vec!["stadium", ".", "stadium", "id"],
                vec!["stadium", ".", "name"],
                vec!["stadium", ".", "*"],
            ]
        );
    }

    #[test]
    fn test_database_lookup() {
        let catalog = SchemaCatalog::from_databases(vec![stadium()], SurfaceFormStyle::Plain).unwrap();
        assert_eq!(catalog.database("concert_singer").unwrap().table_names, vec!["stadium"]);
        assert!(matches!(
            catalog.database("missing"),
            Err(SchemaError::DatabaseNotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_db_id_keeps_last_schema() {
        let first = stadium();
        let second = DatabaseSchema::new("concert_singer").with_table("singer", "Singer");
        let catalog =
            SchemaCatalog::from_databases(vec![first, second], SurfaceFormStyle::Plain).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.database("concert_singer").unwrap().table_names, vec!["singer"]);
        assert_eq!(catalog.surface_forms().len(), 6);
    }
}
