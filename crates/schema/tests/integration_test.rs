// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Integration tests for the schema crate

use std::fs;

use misp_sql_schema::{
    output_skip_tokens, SchemaCatalog, SchemaError, SurfaceFormStyle, NO_TABLE,
};
use misp_sql_test_utils::SchemaFixtures;

#[test]
fn test_load_tables_json_plain() {
    let catalog =
        SchemaCatalog::from_json_str(SchemaFixtures::tables_json(), SurfaceFormStyle::Plain).unwrap();

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.database_ids().collect::<Vec<_>>(), vec!["concert_singer", "pets_1"]);
    assert_eq!(
        catalog.surface_forms(),
        &[
            "*", "stadium_id", "name", "singer_id", "name", "stadium", "singer", "*", "petid",
            "weight", "pets",
        ]
    );
    assert_eq!(catalog.embedder_inputs().len(), catalog.surface_forms().len());
}

#[test]
fn test_load_tables_json_qualified() {
    let catalog =
        SchemaCatalog::from_json_str(SchemaFixtures::tables_json(), SurfaceFormStyle::Qualified)
            .unwrap();

    let forms = catalog.surface_forms();
    assert!(forms.contains(&"singer.singer_id".to_string()));
    assert!(forms.contains(&"stadium.*".to_string()));
    assert!(forms.contains(&"pets.weight".to_string()));
    assert_eq!(catalog.embedder_inputs()[1], vec!["stadium", ".", "stadium", "id"]);
}

#[test]
fn test_schema_details_survive_loading() {
    let catalog =
        SchemaCatalog::from_json_str(SchemaFixtures::tables_json(), SurfaceFormStyle::Plain).unwrap();
    let schema = catalog.database("concert_singer").unwrap();

    assert_eq!(schema.primary_keys, vec![1, 3]);
    assert_eq!(schema.column_types[1], "number");
    assert_eq!(schema.columns_of(1), vec!["Singer_ID", "Name"]);
    assert_eq!(schema.columns_of(NO_TABLE), vec!["*"]);
    assert_eq!(
        SchemaFixtures::tables_value()[0]["db_id"].as_str(),
        Some(schema.db_id.as_str())
    );
}

#[test]
fn test_skip_tokens_from_catalog() {
    let catalog =
        SchemaCatalog::from_json_str(SchemaFixtures::tables_json(), SurfaceFormStyle::Plain).unwrap();
    let skip = output_skip_tokens(catalog.surface_forms());

    assert_eq!(
        skip,
        vec!["*", "name", "petid", "pets", "singer", "singer_id", "stadium", "stadium_id", "weight"]
    );
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tables.json");
    fs::write(&path, SchemaFixtures::tables_json()).unwrap();

    let style = SurfaceFormStyle::for_data_directory("processed_data_sparc_removefrom");
    let catalog = SchemaCatalog::from_file(&path, style).unwrap();
    assert_eq!(catalog.style(), SurfaceFormStyle::Qualified);
    assert_eq!(catalog.len(), 2);
}

#[test]
fn test_load_errors() {
    assert!(matches!(
        SchemaCatalog::from_file("/nonexistent/tables.json", SurfaceFormStyle::Plain),
        Err(SchemaError::Io { .. })
    ));
    assert!(matches!(
        SchemaCatalog::from_json_str("{\"db_id\": 1}", SurfaceFormStyle::Plain),
        Err(SchemaError::SerializationError(_))
    ));

    let dangling = r#"[{
        "db_id": "broken",
        "table_names": [],
        "table_names_original": [],
        "column_names": [[0, "id"]],
        "column_names_original": [[0, "ID"]]
    }]"#;
    assert!(matches!(
        SchemaCatalog::from_json_str(dangling, SurfaceFormStyle::Plain),
        Err(SchemaError::InvalidTableReference { table_id: 0, .. })
    ));
}
