// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schema metadata
//!
//! One entry of a Spider/SParC `tables.json` file. Columns are stored as
//! `(table_id, name)` pairs, where `table_id` indexes `table_names` and `-1`
//! marks the special `*` column.

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};

/// Table id of columns that belong to no table (`*`)
pub const NO_TABLE: i64 = -1;

/// Schema of one database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSchema {
    pub db_id: String,
    /// Natural-language table names
    pub table_names: Vec<String>,
    /// Table names as they appear in SQL
    pub table_names_original: Vec<String>,
    /// Natural-language column names with their table ids
    pub column_names: Vec<(i64, String)>,
    /// Column names as they appear in SQL with their table ids
    pub column_names_original: Vec<(i64, String)>,
    #[serde(default)]
    pub column_types: Vec<String>,
    #[serde(default)]
    pub primary_keys: Vec<usize>,
    #[serde(default)]
    pub foreign_keys: Vec<(usize, usize)>,
}

impl DatabaseSchema {
    /// Create an empty schema holding only the `*` column
    pub fn new(db_id: impl Into<String>) -> Self {
        Self {
            db_id: db_id.into(),
            table_names: Vec::new(),
            table_names_original: Vec::new(),
            column_names: vec![(NO_TABLE, "*".to_string())],
            column_names_original: vec![(NO_TABLE, "*".to_string())],
            column_types: vec!["text".to_string()],
            primary_keys: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Builder method: add a table
    pub fn with_table(mut self, name: impl Into<String>, original: impl Into<String>) -> Self {
        self.table_names.push(name.into());
        self.table_names_original.push(original.into());
        self
    }

    /// Builder method: add a column to the table at `table_id`
    pub fn with_column(
        mut self,
        table_id: i64,
        name: impl Into<String>,
        original: impl Into<String>,
        column_type: impl Into<String>,
    ) -> Self {
        self.column_names.push((table_id, name.into()));
        self.column_names_original.push((table_id, original.into()));
        self.column_types.push(column_type.into());
        self
    }

    /// Builder method: mark the column at `column` as a primary key
    pub fn with_primary_key(mut self, column: usize) -> Self {
        self.primary_keys.push(column);
        self
    }

    /// Builder method: add a foreign key from `column` to `referenced`
    pub fn with_foreign_key(mut self, column: usize, referenced: usize) -> Self {
        self.foreign_keys.push((column, referenced));
        self
    }

    /// Original table name for a column's table id
    pub fn original_table(&self, table_id: i64) -> Option<&str> {
        usize::try_from(table_id)
            .ok()
            .and_then(|i| self.table_names_original.get(i))
            .map(String::as_str)
    }

    /// Natural-language table name for a column's table id
    pub fn table(&self, table_id: i64) -> Option<&str> {
        usize::try_from(table_id)
            .ok()
            .and_then(|i| self.table_names.get(i))
            .map(String::as_str)
    }

    /// Original names of the columns of the table at `table_id`
    pub fn columns_of(&self, table_id: i64) -> Vec<&str> {
        self.column_names_original
            .iter()
            .filter(|(t, _)| *t == table_id)
            .map(|(_, name)| name.as_str())
            .collect()
    }

    /// Check that every column refers to an existing table
    pub fn validate(&self) -> SchemaResult<()> {
        let columns = self.column_names.iter().chain(&self.column_names_original);
        for (table_id, column) in columns {
            let known = *table_id == NO_TABLE
                || (self.table(*table_id).is_some() && self.original_table(*table_id).is_some());
            if !known {
                return Err(SchemaError::InvalidTableReference {
                    db_id: self.db_id.clone(),
                    column: column.clone(),
                    table_id: *table_id,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pets() -> DatabaseSchema {
        DatabaseSchema::new("pets_1")
            .with_table("pets", "Pets")
            .with_column(0, "pet id", "PetID", "number")
            .with_column(0, "weight", "weight", "number")
            .with_primary_key(1)
    }

    #[test]
    fn test_builder() {
        let schema = pets();
        assert_eq!(schema.column_names.len(), 3);
        assert_eq!(schema.column_names_original[1], (0, "PetID".to_string()));
        assert_eq!(schema.primary_keys, vec![1]);
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_foreign_key_serializes_as_pair() {
        let schema = pets()
            .with_table("owners", "Owners")
            .with_column(1, "owner id", "OwnerID", "number")
            .with_column(0, "owner", "OwnerID", "number")
            .with_foreign_key(4, 3);
        assert_eq!(schema.foreign_keys, vec![(4, 3)]);
        assert!(schema.validate().is_ok());

        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["foreign_keys"], serde_json::json!([[4, 3]]));
        let back: DatabaseSchema = serde_json::from_value(value).unwrap();
        assert_eq!(back, schema);
    }

    #[test]
    fn test_table_lookup() {
        let schema = pets();
        assert_eq!(schema.original_table(0), Some("Pets"));
        assert_eq!(schema.table(0), Some("pets"));
        assert_eq!(schema.original_table(NO_TABLE), None);
        assert_eq!(schema.columns_of(0), vec!["PetID", "weight"]);
        assert_eq!(schema.columns_of(NO_TABLE), vec!["*"]);
    }

    #[test]
    fn test_validate_missing_table() {
        let schema = pets().with_column(4, "owner", "Owner", "text");
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::InvalidTableReference { table_id: 4, .. })
        ));
    }
}
