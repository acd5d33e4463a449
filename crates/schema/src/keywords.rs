// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Output Vocabulary
//!
//! SQL tokens the decoder can emit as keywords. Schema surface forms that
//! collide with none of these are left out of the output vocabulary, since
//! the decoder copies schema items through a separate schema vocabulary.

use std::collections::BTreeSet;

/// Keywords and punctuation of the output SQL vocabulary
pub const SQL_KEYWORDS: [&str; 51] = [
    ".", "t1", "t2", "=", "select", "as", "join", "on", ")", "(", "where", "t3", "by", ",",
    "group", "distinct", "t4", "and", "limit", "desc", ">", "avg", "having", "max", "in", "<",
    "sum", "t5", "intersect", "not", "min", "except", "or", "asc", "like", "!", "union",
    "between", "t6", "-", "t7", "+", "/", "count", "from", "value", "order", "group_by",
    "order_by", "limit_value", "!=",
];

/// Fixed output vocabulary of the `removefrom` test split, in index order
pub const REMOVEFROM_OUTPUT_ORDER: [&str; 33] = [
    "select", "value", ")", "(", "where", "=", ",", "count", "group_by", "order_by",
    "limit_value", "desc", ">", "distinct", "avg", "and", "having", "<", "in", "max", "sum",
    "asc", "like", "not", "or", "min", "intersect", "except", "!=", "union", "between", "-", "+",
];

/// Whether `token` is an output SQL keyword
pub fn is_sql_keyword(token: &str) -> bool {
    SQL_KEYWORDS.contains(&token)
}

/// Surface forms to leave out of the output vocabulary
///
/// Every distinct surface form that is not a SQL keyword, sorted.
pub fn output_skip_tokens<S: AsRef<str>>(surface_forms: &[S]) -> Vec<String> {
    surface_forms
        .iter()
        .map(|form| form.as_ref())
        .filter(|form| !is_sql_keyword(form))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Token sequences that register [`REMOVEFROM_OUTPUT_ORDER`] in order
///
/// Sequence `i` holds the first `i + 1` tokens, so a frequency-ordered
/// vocabulary built from them reproduces the fixed order.
pub fn removefrom_output_sequences() -> Vec<Vec<&'static str>> {
    (1..=REMOVEFROM_OUTPUT_ORDER.len())
        .map(|n| REMOVEFROM_OUTPUT_ORDER[..n].to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert!(is_sql_keyword("select"));
        assert!(is_sql_keyword("group_by"));
        assert!(is_sql_keyword("!="));
        assert!(!is_sql_keyword("SELECT"));
        assert!(!is_sql_keyword("stadium_id"));
    }

    #[test]
    fn test_skip_tokens_keep_keywords_out() {
        let forms = ["*", "name", "count", "name", "singer.*", "order"];
        assert_eq!(output_skip_tokens(&forms), vec!["*", "name", "singer.*"]);
    }

    #[test]
    fn test_removefrom_sequences_are_prefixes() {
        let seqs = removefrom_output_sequences();
        assert_eq!(seqs.len(), REMOVEFROM_OUTPUT_ORDER.len());
        assert_eq!(seqs[0], vec!["select"]);
        assert_eq!(seqs[2], vec!["select", "value", ")"]);
        assert_eq!(seqs.last().map(Vec::len), Some(33));
    }

    #[test]
    fn test_removefrom_order_is_in_keywords() {
        assert!(REMOVEFROM_OUTPUT_ORDER.iter().all(|t| is_sql_keyword(t)));
    }
}
