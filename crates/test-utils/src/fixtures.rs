// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Test fixtures and sample data

use misp_sql_ir::{DecisionRecord, SemanticTag};

use crate::sequence_builder::DecisionSequenceBuilder;

/// Sample decision sequences
pub struct DecisionFixtures;

impl DecisionFixtures {
    /// SELECT flight_id FROM flight WHERE origin = 'boston' ORDER BY departure_time
    ///
    /// Pointers of the semantic units: 0, 2, 3, 4, 6. The WHERE operator (3)
    /// and the ORDER BY column (6) have low probability.
    pub fn flight_query() -> Vec<DecisionRecord> {
        DecisionSequenceBuilder::new()
            .column(SemanticTag::SelectCol, "flight", "flight_id", 0, 0.97)
            .filler()
            .column(SemanticTag::WhereCol, "flight", "origin", 4, 0.88)
            .where_op("flight", "origin", 4, "=", 0.42)
            .unit(SemanticTag::WhereVal, 0.91)
            .filler()
            .column(SemanticTag::OrderCol, "flight", "departure_time", 7, 0.35)
            .build()
    }

    /// Ground truth for [`DecisionFixtures::flight_query`]: the WHERE value is wrong
    pub fn flight_query_eval() -> Vec<bool> {
        vec![true, true, true, true, false, true, true]
    }

    /// Nested query with dropout samples
    ///
    /// Pointers of the semantic units: 0, 1, 2, 4. Only the nested WHERE
    /// column (2) has a wide sample spread.
    pub fn nested_sampled_query() -> Vec<DecisionRecord> {
        DecisionSequenceBuilder::new()
            .sampled(SemanticTag::SelectCol, &[0.92, 0.95, 0.93])
            .sampled(SemanticTag::WhereCol, &[0.81, 0.80, 0.82])
            .sampled(SemanticTag::WhereCol, &[0.90, 0.20, 0.55])
            .end_nested()
            .sampled(SemanticTag::GroupCol, &[0.70, 0.72, 0.71])
            .build()
    }

    /// Tags a learned detector is usually trained with, in column order
    pub fn learned_tags() -> Vec<&'static str> {
        vec![
            "SELECT_COL",
            "SELECT_AGG",
            "WHERE_COL",
            "WHERE_OP",
            "WHERE_VAL",
            "GROUP_COL",
            "ORDER_COL",
        ]
    }
}

/// Sample Spider-style schema documents
pub struct SchemaFixtures;

impl SchemaFixtures {
    /// A `tables.json` document with two databases
    pub const fn tables_json() -> &'static str {
        r#"[
  {
    "db_id": "concert_singer",
    "table_names": ["stadium", "singer"],
    "table_names_original": ["Stadium", "Singer"],
    "column_names": [[-1, "*"], [0, "stadium id"], [0, "name"], [1, "singer id"], [1, "name"]],
    "column_names_original": [[-1, "*"], [0, "Stadium_ID"], [0, "Name"], [1, "Singer_ID"], [1, "Name"]],
    "column_types": ["text", "number", "text", "number", "text"],
    "primary_keys": [1, 3],
    "foreign_keys": []
  },
  {
    "db_id": "pets_1",
    "table_names": ["pets"],
    "table_names_original": ["Pets"],
    "column_names": [[-1, "*"], [0, "pet id"], [0, "weight"]],
    "column_names_original": [[-1, "*"], [0, "PetID"], [0, "weight"]],
    "column_types": ["text", "number", "number"],
    "primary_keys": [1],
    "foreign_keys": []
  }
]"#
    }

    /// Parsed form of [`SchemaFixtures::tables_json`]
    pub fn tables_value() -> serde_json::Value {
        serde_json::from_str(Self::tables_json()).unwrap_or(serde_json::Value::Null)
    }
}
