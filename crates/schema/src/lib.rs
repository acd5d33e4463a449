// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # MISP SQL - Schema Layer
//!
//! This crate loads the database schemas of Spider/SParC-style corpora and
//! derives what the SQL decoder's vocabularies need from them:
//!
//! - [`DatabaseSchema`]: one `tables.json` entry
//! - [`SchemaCatalog`]: all databases with their surface forms and embedder inputs
//! - [`keywords`]: the output SQL keyword list and skip-token computation
//!
//! ## Usage
//!
//! ```rust
//! use misp_sql_schema::{output_skip_tokens, DatabaseSchema, SchemaCatalog, SurfaceFormStyle};
//!
//! let schema = DatabaseSchema::new("pets_1")
//!     .with_table("pets", "Pets")
//!     .with_column(0, "pet id", "PetID", "number");
//! let catalog = SchemaCatalog::from_databases(vec![schema], SurfaceFormStyle::Qualified).unwrap();
//! assert_eq!(catalog.surface_forms(), &["*", "pets.petid", "pets.*"]);
//! assert_eq!(output_skip_tokens(catalog.surface_forms()).len(), 3);
//! ```

pub mod catalog;
pub mod error;
pub mod keywords;
pub mod metadata;

// Re-exports
pub use catalog::{SchemaCatalog, SurfaceFormStyle};
pub use error::{SchemaError, SchemaResult};
pub use keywords::{is_sql_keyword, output_skip_tokens, SQL_KEYWORDS};
pub use metadata::{DatabaseSchema, NO_TABLE};
