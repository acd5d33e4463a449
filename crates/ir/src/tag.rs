// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Semantic Tags
//!
//! Every decision the interactive SQL parser makes is tagged with the kind of
//! choice it represents. The tag set mirrors the clauses of a SQL query:
//!
//! - **SELECT**: `SELECT_COL`, `SELECT_AGG`, `SELECT_AGG_v2`
//! - **WHERE**: `WHERE_COL`, `WHERE_OP`, `WHERE_VAL`, `WHERE_ROOT_TERM`, `ANDOR`
//! - **GROUP BY / HAVING**: `GROUP_COL`, `GROUP_NHAV`, `HAV_COL`, `HAV_AGG`,
//!   `HAV_AGG_v2`, `HAV_OP`, `HAV_OP_v2`, `HAV_ROOT_TERM`
//! - **ORDER BY**: `ORDER_COL`, `ORDER_AGG`, `ORDER_AGG_v2`, `ORDER_DESC_ASC`,
//!   `ORDER_LIMIT`, `ORDER_DESC_ASC_LIMIT`
//! - **Set operations**: `IUEN`, `IUEN_v2`
//!
//! Two structural tags never form a semantic unit: `O` (a filler decision
//! outside any semantic unit) and `##END_NESTED##` (closes a nested query).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of choice a decision record represents
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SemanticTag {
    SelectCol,
    SelectAgg,
    SelectAggV2,
    WhereCol,
    WhereOp,
    WhereVal,
    WhereRootTerm,
    AndOr,
    GroupCol,
    GroupNhav,
    HavCol,
    HavAgg,
    HavAggV2,
    HavOp,
    HavOpV2,
    HavRootTerm,
    OrderCol,
    OrderAgg,
    OrderAggV2,
    OrderDescAsc,
    OrderLimit,
    OrderDescAscLimit,
    Iuen,
    IuenV2,
    /// Filler decision outside any semantic unit (`O`)
    Outside,
    /// End of a nested sub-query (`##END_NESTED##`)
    EndNested,
    /// Tag emitted by a custom parser
    Other(String),
}

impl SemanticTag {
    /// Every built-in tag that forms a semantic unit, in clause order
    pub const SEMANTIC: [SemanticTag; 24] = [
        SemanticTag::SelectCol,
        SemanticTag::SelectAgg,
        SemanticTag::SelectAggV2,
        SemanticTag::WhereCol,
        SemanticTag::WhereOp,
        SemanticTag::WhereVal,
        SemanticTag::WhereRootTerm,
        SemanticTag::AndOr,
        SemanticTag::GroupCol,
        SemanticTag::GroupNhav,
        SemanticTag::HavCol,
        SemanticTag::HavAgg,
        SemanticTag::HavAggV2,
        SemanticTag::HavOp,
        SemanticTag::HavOpV2,
        SemanticTag::HavRootTerm,
        SemanticTag::OrderCol,
        SemanticTag::OrderAgg,
        SemanticTag::OrderAggV2,
        SemanticTag::OrderDescAsc,
        SemanticTag::OrderLimit,
        SemanticTag::OrderDescAscLimit,
        SemanticTag::Iuen,
        SemanticTag::IuenV2,
    ];

    /// The wire name of this tag as emitted by the parser
    pub fn as_str(&self) -> &str {
        match self {
            SemanticTag::SelectCol => "SELECT_COL",
            SemanticTag::SelectAgg => "SELECT_AGG",
            SemanticTag::SelectAggV2 => "SELECT_AGG_v2",
            SemanticTag::WhereCol => "WHERE_COL",
            SemanticTag::WhereOp => "WHERE_OP",
            SemanticTag::WhereVal => "WHERE_VAL",
            SemanticTag::WhereRootTerm => "WHERE_ROOT_TERM",
            SemanticTag::AndOr => "ANDOR",
            SemanticTag::GroupCol => "GROUP_COL",
            SemanticTag::GroupNhav => "GROUP_NHAV",
            SemanticTag::HavCol => "HAV_COL",
            SemanticTag::HavAgg => "HAV_AGG",
            SemanticTag::HavAggV2 => "HAV_AGG_v2",
            SemanticTag::HavOp => "HAV_OP",
            SemanticTag::HavOpV2 => "HAV_OP_v2",
            SemanticTag::HavRootTerm => "HAV_ROOT_TERM",
            SemanticTag::OrderCol => "ORDER_COL",
            SemanticTag::OrderAgg => "ORDER_AGG",
            SemanticTag::OrderAggV2 => "ORDER_AGG_v2",
            SemanticTag::OrderDescAsc => "ORDER_DESC_ASC",
            SemanticTag::OrderLimit => "ORDER_LIMIT",
            SemanticTag::OrderDescAscLimit => "ORDER_DESC_ASC_LIMIT",
            SemanticTag::Iuen => "IUEN",
            SemanticTag::IuenV2 => "IUEN_v2",
            SemanticTag::Outside => "O",
            SemanticTag::EndNested => "##END_NESTED##",
            SemanticTag::Other(name) => name,
        }
    }

    /// Whether records with this tag become semantic units
    pub fn is_semantic(&self) -> bool {
        !matches!(self, SemanticTag::Outside | SemanticTag::EndNested)
    }
}

impl From<&str> for SemanticTag {
    fn from(name: &str) -> Self {
        match name {
            "SELECT_COL" => SemanticTag::SelectCol,
            "SELECT_AGG" => SemanticTag::SelectAgg,
            "SELECT_AGG_v2" => SemanticTag::SelectAggV2,
            "WHERE_COL" => SemanticTag::WhereCol,
            "WHERE_OP" => SemanticTag::WhereOp,
            "WHERE_VAL" => SemanticTag::WhereVal,
            "WHERE_ROOT_TERM" => SemanticTag::WhereRootTerm,
            "ANDOR" => SemanticTag::AndOr,
            "GROUP_COL" => SemanticTag::GroupCol,
            "GROUP_NHAV" => SemanticTag::GroupNhav,
            "HAV_COL" => SemanticTag::HavCol,
            "HAV_AGG" => SemanticTag::HavAgg,
            "HAV_AGG_v2" => SemanticTag::HavAggV2,
            "HAV_OP" => SemanticTag::HavOp,
            "HAV_OP_v2" => SemanticTag::HavOpV2,
            "HAV_ROOT_TERM" => SemanticTag::HavRootTerm,
            "ORDER_COL" => SemanticTag::OrderCol,
            "ORDER_AGG" => SemanticTag::OrderAgg,
            "ORDER_AGG_v2" => SemanticTag::OrderAggV2,
            "ORDER_DESC_ASC" => SemanticTag::OrderDescAsc,
            "ORDER_LIMIT" => SemanticTag::OrderLimit,
            "ORDER_DESC_ASC_LIMIT" => SemanticTag::OrderDescAscLimit,
            "IUEN" => SemanticTag::Iuen,
            "IUEN_v2" => SemanticTag::IuenV2,
            "O" => SemanticTag::Outside,
            "##END_NESTED##" => SemanticTag::EndNested,
            other => SemanticTag::Other(other.to_string()),
        }
    }
}

impl From<String> for SemanticTag {
    fn from(name: String) -> Self {
        SemanticTag::from(name.as_str())
    }
}

impl From<SemanticTag> for String {
    fn from(tag: SemanticTag) -> Self {
        match tag {
            SemanticTag::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for SemanticTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SemanticTag::from(s))
    }
}

impl fmt::Display for SemanticTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_parse_to_builtin_tags() {
        for tag in SemanticTag::SEMANTIC.iter() {
            assert_eq!(&SemanticTag::from(tag.as_str()), tag);
        }
        assert_eq!(SemanticTag::from("O"), SemanticTag::Outside);
        assert_eq!(SemanticTag::from("##END_NESTED##"), SemanticTag::EndNested);
    }

    #[test]
    fn test_unknown_name_is_kept_verbatim() {
        let tag: SemanticTag = "LIMIT_VALUE".parse().unwrap();
        assert_eq!(tag, SemanticTag::Other("LIMIT_VALUE".to_string()));
        assert_eq!(tag.to_string(), "LIMIT_VALUE");
        assert!(tag.is_semantic());
    }

    #[test]
    fn test_structural_tags_are_not_semantic() {
        assert!(!SemanticTag::Outside.is_semantic());
        assert!(!SemanticTag::EndNested.is_semantic());
        assert!(SemanticTag::SEMANTIC.iter().all(SemanticTag::is_semantic));
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&SemanticTag::HavAggV2).unwrap();
        assert_eq!(json, "\"HAV_AGG_v2\"");
        let tag: SemanticTag = serde_json::from_str("\"ORDER_DESC_ASC_LIMIT\"").unwrap();
        assert_eq!(tag, SemanticTag::OrderDescAscLimit);
    }
}
