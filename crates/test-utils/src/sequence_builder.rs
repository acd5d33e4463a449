// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Fluent builder for decision sequences
//!
//! Records get their position as decoding index, mirroring a decoder that
//! emits one decision per step.

use misp_sql_ir::{ColumnRef, Confidence, DecisionArg, DecisionRecord, SemanticTag};

/// Builder for decision sequences with a fluent API
#[derive(Debug, Clone, Default)]
pub struct DecisionSequenceBuilder {
    records: Vec<DecisionRecord>,
}

impl DecisionSequenceBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, record: DecisionRecord) -> Self {
        let step = self.records.len();
        self.records.push(record.with_decoding_index(step));
        self
    }

    /// Add a decision with a scalar probability
    pub fn unit(self, tag: SemanticTag, prob: f64) -> Self {
        self.push(DecisionRecord::new(tag, Confidence::Scalar(prob)))
    }

    /// Add a decision with dropout samples
    pub fn sampled(self, tag: SemanticTag, samples: &[f64]) -> Self {
        self.push(DecisionRecord::new(tag, Confidence::Samples(samples.to_vec())))
    }

    /// Add a decision selecting `table.column`
    pub fn column(self, tag: SemanticTag, table: &str, column: &str, index: usize, prob: f64) -> Self {
        self.push(
            DecisionRecord::new(tag, Confidence::Scalar(prob))
                .with_column(ColumnRef::new(Some(table), column, index)),
        )
    }

    /// Add a WHERE operator decision on `table.column`
    pub fn where_op(self, table: &str, column: &str, index: usize, op: &str, prob: f64) -> Self {
        self.push(
            DecisionRecord::new(SemanticTag::WhereOp, Confidence::Scalar(prob))
                .with_column(ColumnRef::new(Some(table), column, index))
                .with_arg(DecisionArg::Operator(op.to_string())),
        )
    }

    /// Add a filler decision outside any semantic unit
    pub fn filler(self) -> Self {
        self.push(DecisionRecord::new(SemanticTag::Outside, Confidence::Scalar(1.0)))
    }

    /// Add an end-of-nested-query marker
    pub fn end_nested(self) -> Self {
        self.push(DecisionRecord::new(SemanticTag::EndNested, Confidence::Scalar(1.0)))
    }

    /// Build the sequence
    pub fn build(self) -> Vec<DecisionRecord> {
        self.records
    }
}
