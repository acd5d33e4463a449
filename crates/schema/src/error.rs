// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for schema loading
//!
//! This module defines the error types used throughout the schema layer.

use serde::Serialize;
use thiserror::Error;

/// Result type alias for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while loading database schemas
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum SchemaError {
    /// Failed to read the schema file
    #[error("Failed to read schema file {path}: {message}")]
    Io { path: String, message: String },

    /// Failed to deserialize schema data
    #[error("Failed to deserialize schema data: {0}")]
    SerializationError(String),

    /// A column refers to a table index that does not exist
    #[error("Column '{column}' in database '{db_id}' refers to missing table {table_id}")]
    InvalidTableReference {
        db_id: String,
        column: String,
        table_id: i64,
    },

    /// Requested database was not found
    #[error("Database '{0}' not found")]
    DatabaseNotFound(String),
}
