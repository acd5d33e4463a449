// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Decision Records
//!
//! A decision sequence is the ordered list of choices the SQL decoder made
//! while building one query. Order is significant: the index of a record in
//! the sequence is the pointer that error detectors report back.
//!
//! Each record carries:
//!
//! - a [`SemanticTag`] naming the kind of choice
//! - [`DecisionArg`]s holding the context needed to reconstruct the choice
//!   (column, operator, aggregator, value, ...)
//! - a [`Confidence`] signal, either one probability or the probabilities from
//!   several stochastic (dropout) forward passes
//! - the decoder step that produced it, when known

use serde::{Deserialize, Serialize};

use crate::tag::SemanticTag;

/// Confidence recorded for a decision
///
/// Probability-based detectors read [`Confidence::Scalar`], dropout-based
/// detectors read [`Confidence::Samples`]. Serialized untagged, so a JSON
/// number or a JSON array both deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Confidence {
    /// Probability of the chosen decision
    Scalar(f64),
    /// Probabilities of the same decision across repeated stochastic passes
    Samples(Vec<f64>),
}

impl Confidence {
    /// Short name of the shape, used in error messages
    pub fn shape(&self) -> &'static str {
        match self {
            Confidence::Scalar(_) => "scalar",
            Confidence::Samples(_) => "samples",
        }
    }

    /// The probability, if this is a scalar confidence
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Confidence::Scalar(p) => Some(*p),
            Confidence::Samples(_) => None,
        }
    }

    /// The sample collection, if this is a sampled confidence
    pub fn as_samples(&self) -> Option<&[f64]> {
        match self {
            Confidence::Scalar(_) => None,
            Confidence::Samples(samples) => Some(samples),
        }
    }

    /// Population standard deviation of the samples
    ///
    /// Returns `None` for a scalar confidence or an empty sample collection.
    pub fn std_dev(&self) -> Option<f64> {
        let samples = self.as_samples()?;
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        Some(variance.sqrt())
    }
}

impl From<f64> for Confidence {
    fn from(p: f64) -> Self {
        Confidence::Scalar(p)
    }
}

impl From<Vec<f64>> for Confidence {
    fn from(samples: Vec<f64>) -> Self {
        Confidence::Samples(samples)
    }
}

/// Column chosen by a decision
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Table the column belongs to (`None` for `*`)
    pub table: Option<String>,
    /// Column name
    pub column: String,
    /// Column index in the schema
    pub index: usize,
}

impl ColumnRef {
    /// Create a new column reference
    pub fn new(table: Option<&str>, column: impl Into<String>, index: usize) -> Self {
        Self {
            table: table.map(str::to_string),
            column: column.into(),
            index,
        }
    }
}

/// Context attached to a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DecisionArg {
    Column(ColumnRef),
    Aggregator(String),
    Operator(String),
    Value(String),
    Keyword(String),
    Index(usize),
}

/// One incremental choice made by the SQL decoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// Kind of choice
    pub tag: SemanticTag,
    /// Context needed to reconstruct the choice
    #[serde(default)]
    pub args: Vec<DecisionArg>,
    /// Confidence of the decoder in this choice
    pub confidence: Confidence,
    /// Decoder step that produced the choice
    #[serde(default)]
    pub decoding_index: Option<usize>,
}

impl DecisionRecord {
    /// Create a record with no context
    pub fn new(tag: SemanticTag, confidence: impl Into<Confidence>) -> Self {
        Self {
            tag,
            args: Vec::new(),
            confidence: confidence.into(),
            decoding_index: None,
        }
    }

    /// Builder method: attach a context argument
    pub fn with_arg(mut self, arg: DecisionArg) -> Self {
        self.args.push(arg);
        self
    }

    /// Builder method: attach the chosen column
    pub fn with_column(self, column: ColumnRef) -> Self {
        self.with_arg(DecisionArg::Column(column))
    }

    /// Builder method: set the decoder step
    pub fn with_decoding_index(mut self, index: usize) -> Self {
        self.decoding_index = Some(index);
        self
    }
}

/// Segmented, typed view of one decision
///
/// Units are created fresh for every detection call and are not persisted.
/// They carry everything a human-in-the-loop correction needs to rebuild the
/// original decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticUnit {
    /// Kind of choice
    pub tag: SemanticTag,
    /// Context of the choice
    pub args: Vec<DecisionArg>,
    /// Confidence signal
    pub confidence: Confidence,
    /// Decoder step that produced the choice
    pub decoding_index: Option<usize>,
}

impl SemanticUnit {
    /// Wire name of the unit's tag
    pub fn tag_name(&self) -> &str {
        self.tag.as_str()
    }

    /// The chosen column, if the unit has one
    pub fn column(&self) -> Option<&ColumnRef> {
        self.args.iter().find_map(|arg| match arg {
            DecisionArg::Column(col) => Some(col),
            _ => None,
        })
    }
}

impl From<&DecisionRecord> for SemanticUnit {
    fn from(record: &DecisionRecord) -> Self {
        Self {
            tag: record.tag.clone(),
            args: record.args.clone(),
            confidence: record.confidence.clone(),
            decoding_index: record.decoding_index,
        }
    }
}
