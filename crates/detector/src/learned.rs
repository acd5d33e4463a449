// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Learned Error Detection
//!
//! The learned policy scores each semantic unit with a trained binary
//! classifier. The model is injected through [`ModelInfo`], which bundles:
//!
//! - a [`TagIndexer`] mapping tag names to feature columns
//! - a [`Classifier`] returning the probability that a decision is correct
//!
//! ## Features
//!
//! For an indexer of size `n` the feature vector has `n + 1` slots:
//!
//! ```text
//! [ one-hot tag (n slots) | recorded probability ]
//! ```
//!
//! A unit is flagged when the classifier scores it strictly below `0.5`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use misp_sql_ir::SemanticUnit;

use crate::error::{ClassifierError, DetectorError, DetectorResult};

/// Classifier scores below this are treated as erroneous
pub const CORRECTNESS_CUTOFF: f64 = 0.5;

/// Mapping from tag name to feature column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagIndexer {
    columns: BTreeMap<String, usize>,
}

impl TagIndexer {
    /// Create an empty indexer
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign consecutive columns to tags in iteration order
    ///
    /// Duplicate tags keep their first column.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns = BTreeMap::new();
        for tag in tags {
            let next = columns.len();
            columns.entry(tag.into()).or_insert(next);
        }
        Self { columns }
    }

    /// Builder method: map `tag` to `column`
    pub fn with_column(mut self, tag: impl Into<String>, column: usize) -> Self {
        self.columns.insert(tag.into(), column);
        self
    }

    /// Column of `tag`, if known
    pub fn get(&self, tag: &str) -> Option<usize> {
        self.columns.get(tag).copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Width of feature vectors built with this indexer
    pub fn input_size(&self) -> usize {
        self.columns.len() + 1
    }

    /// Check that every tag has a distinct column inside the one-hot block
    ///
    /// The last slot is reserved for the probability, so columns must be
    /// strictly less than the number of tags.
    pub fn validate(&self) -> DetectorResult<()> {
        let mut seen = HashSet::new();
        for (tag, &column) in &self.columns {
            if column >= self.columns.len() {
                return Err(DetectorError::InvalidIndexer(format!(
                    "tag '{}' maps to column {} but only {} one-hot columns exist",
                    tag,
                    column,
                    self.columns.len()
                )));
            }
            if !seen.insert(column) {
                return Err(DetectorError::InvalidIndexer(format!(
                    "column {} is assigned to more than one tag",
                    column
                )));
            }
        }
        Ok(())
    }
}

/// Trained binary classifier over fixed-width feature vectors
///
/// Returns the probability, in `[0, 1]`, that the scored decision is correct.
/// Implementations must be safe for concurrent reads.
pub trait Classifier: Send + Sync {
    /// Score one feature vector
    fn predict(&self, features: &[f64]) -> Result<f64, ClassifierError>;
}

impl<F> Classifier for F
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn predict(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        Ok(self(features))
    }
}

/// Source of a trained model and its indexer
pub trait ModelInfo {
    /// Tag-to-column mapping the model was trained with
    fn indexer(&self) -> &TagIndexer;

    /// The trained classifier
    fn model(&self) -> Arc<dyn Classifier>;
}

/// Learned policy state, fixed at construction
#[derive(Clone)]
pub struct LearnedPolicy {
    indexer: TagIndexer,
    model: Arc<dyn Classifier>,
}

impl LearnedPolicy {
    /// Bind to a model, validating its indexer
    pub fn from_model_info(mi: &dyn ModelInfo) -> DetectorResult<Self> {
        let indexer = mi.indexer().clone();
        indexer.validate()?;
        Ok(Self {
            indexer,
            model: mi.model(),
        })
    }

    pub fn indexer(&self) -> &TagIndexer {
        &self.indexer
    }

    pub fn input_size(&self) -> usize {
        self.indexer.input_size()
    }

    /// Build the feature vector for a unit
    ///
    /// # Errors
    ///
    /// Returns `DetectorError::UnknownTag` if the unit's tag is not indexed and
    /// `DetectorError::ConfidenceShape` if the unit has no scalar probability.
    pub fn features(&self, unit: &SemanticUnit, pointer: usize) -> DetectorResult<Vec<f64>> {
        let prob = unit
            .confidence
            .as_scalar()
            .ok_or(DetectorError::ConfidenceShape {
                detector: "learned",
                expected: "scalar",
                found: unit.confidence.shape(),
                pointer,
            })?;
        let column = self
            .indexer
            .get(unit.tag_name())
            .ok_or_else(|| DetectorError::UnknownTag(unit.tag_name().to_string()))?;

        let mut x = vec![0.0; self.input_size()];
        x[column] = 1.0;
        if let Some(last) = x.last_mut() {
            *last = prob;
        }
        Ok(x)
    }

    /// Score a unit; `true` when it should be questioned
    pub(crate) fn is_error(&self, unit: &SemanticUnit, pointer: usize) -> DetectorResult<bool> {
        let x = self.features(unit, pointer)?;
        let y = self.model.predict(&x)?;
        if !y.is_finite() {
            return Err(ClassifierError::NonFiniteScore(y).into());
        }
        if !(0.0..=1.0).contains(&y) {
            tracing::warn!(tag = unit.tag_name(), pointer, score = y, "classifier score outside [0, 1]");
        }
        tracing::trace!(tag = unit.tag_name(), pointer, score = y, "scored semantic unit");
        Ok(y < CORRECTNESS_CUTOFF)
    }
}

impl fmt::Debug for LearnedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LearnedPolicy")
            .field("indexer", &self.indexer)
            .field("input_size", &self.input_size())
            .finish_non_exhaustive()
    }
}
