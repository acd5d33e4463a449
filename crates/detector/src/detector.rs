// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error Detector
//!
//! An [`ErrorDetector`] decides which decisions of an incremental SQL parse
//! should be questioned. It pairs a [`DetectionPolicy`] (the error predicate)
//! with a [`Segmenter`] (how decisions group into semantic units).
//!
//! ## Detection
//!
//! Every policy shares the same procedure:
//!
//! 1. If `start_pos` is at or past the end of the sequence, return nothing.
//! 2. Segment the sequence into units and pointers.
//! 3. Walk the units in order, skipping those before `start_pos`.
//! 4. Flag each unit the policy predicate rejects, stopping after the first
//!    one when `return_first_only` is set.
//!
//! Results are in segmentation order, so pointers never decrease.

use std::fmt;
use std::sync::Arc;

use misp_sql_ir::{DecisionRecord, Segmenter, SemanticUnit, TagSegmenter};

use crate::error::{DetectorError, DetectorResult};
use crate::learned::{LearnedPolicy, ModelInfo};

/// A decision judged erroneous, with its position in the decision sequence
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorPosition {
    pub unit: SemanticUnit,
    pub pointer: usize,
}

/// Per-call context supplied by the interactive loop
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectionContext<'a> {
    /// Ground-truth correctness of each decision, indexed by pointer
    pub eval_tf: Option<&'a [bool]>,
}

impl<'a> DetectionContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context carrying ground truth for the simulated detector
    pub fn with_ground_truth(eval_tf: &'a [bool]) -> Self {
        Self {
            eval_tf: Some(eval_tf),
        }
    }
}

/// Error predicate applied to each semantic unit
#[derive(Debug, Clone)]
pub enum DetectionPolicy {
    /// Oracle: flags exactly the decisions the ground truth marks wrong
    Simulated,
    /// Flags decisions whose probability is below the threshold
    Probability { prob_threshold: f64 },
    /// Flags decisions whose dropout samples spread more than the threshold
    BayesDropout { stddev_threshold: f64 },
    /// Flags decisions a trained classifier scores below 0.5
    Learned(LearnedPolicy),
}

impl DetectionPolicy {
    /// Short name used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            DetectionPolicy::Simulated => "simulated",
            DetectionPolicy::Probability { .. } => "probability",
            DetectionPolicy::BayesDropout { .. } => "dropout",
            DetectionPolicy::Learned(_) => "learned",
        }
    }

    fn is_error(
        &self,
        unit: &SemanticUnit,
        pointer: usize,
        ctx: &DetectionContext<'_>,
    ) -> DetectorResult<bool> {
        match self {
            DetectionPolicy::Simulated => {
                let eval_tf = ctx.eval_tf.ok_or(DetectorError::MissingGroundTruth)?;
                let correct = eval_tf.get(pointer).copied().ok_or(
                    DetectorError::GroundTruthMisaligned {
                        pointer,
                        len: eval_tf.len(),
                    },
                )?;
                Ok(!correct)
            }
            DetectionPolicy::Probability { prob_threshold } => {
                let prob = unit
                    .confidence
                    .as_scalar()
                    .ok_or_else(|| self.shape_error(unit, pointer, "scalar"))?;
                Ok(prob < *prob_threshold)
            }
            DetectionPolicy::BayesDropout { stddev_threshold } => {
                if unit.confidence.as_samples().is_none() {
                    return Err(self.shape_error(unit, pointer, "samples"));
                }
                let stddev = unit
                    .confidence
                    .std_dev()
                    .ok_or(DetectorError::EmptySamples { pointer })?;
                Ok(stddev > *stddev_threshold)
            }
            DetectionPolicy::Learned(policy) => policy.is_error(unit, pointer),
        }
    }

    /// Check that the policy's threshold is finite and non-negative
    pub fn validate(&self) -> DetectorResult<()> {
        let threshold = match self {
            DetectionPolicy::Probability { prob_threshold } => *prob_threshold,
            DetectionPolicy::BayesDropout { stddev_threshold } => *stddev_threshold,
            DetectionPolicy::Simulated | DetectionPolicy::Learned(_) => return Ok(()),
        };
        if threshold.is_finite() && threshold >= 0.0 {
            Ok(())
        } else {
            Err(DetectorError::InvalidThreshold {
                detector: self.name(),
                value: threshold,
            })
        }
    }

    fn shape_error(&self, unit: &SemanticUnit, pointer: usize, expected: &'static str) -> DetectorError {
        DetectorError::ConfidenceShape {
            detector: self.name(),
            expected,
            found: unit.confidence.shape(),
            pointer,
        }
    }
}

/// Error detector: a policy plus the segmenter it runs over
///
/// Detectors are immutable after construction and hold no per-call state, so
/// a shared reference can serve concurrent callers.
#[derive(Clone)]
pub struct ErrorDetector {
    policy: DetectionPolicy,
    segmenter: Arc<dyn Segmenter>,
}

impl ErrorDetector {
    /// Create a detector with the default tag segmenter
    ///
    /// # Errors
    ///
    /// Returns `DetectorError::InvalidThreshold` if the policy's threshold is
    /// negative or not finite.
    pub fn new(policy: DetectionPolicy) -> DetectorResult<Self> {
        policy.validate()?;
        Ok(Self::with_policy(policy))
    }

    fn with_policy(policy: DetectionPolicy) -> Self {
        Self {
            policy,
            segmenter: Arc::new(TagSegmenter),
        }
    }

    /// Oracle detector driven by ground truth in the [`DetectionContext`]
    pub fn simulated() -> Self {
        Self::with_policy(DetectionPolicy::Simulated)
    }

    /// Probability-threshold detector
    pub fn probability(prob_threshold: f64) -> DetectorResult<Self> {
        Self::new(DetectionPolicy::Probability { prob_threshold })
    }

    /// Bayesian-dropout uncertainty detector
    pub fn bayes_dropout(stddev_threshold: f64) -> DetectorResult<Self> {
        Self::new(DetectionPolicy::BayesDropout { stddev_threshold })
    }

    /// Learned-classifier detector bound to `mi`
    ///
    /// # Errors
    ///
    /// Returns `DetectorError::InvalidIndexer` if the model's indexer cannot
    /// produce a valid one-hot encoding.
    pub fn learned(mi: &dyn ModelInfo) -> DetectorResult<Self> {
        Ok(Self::with_policy(DetectionPolicy::Learned(
            LearnedPolicy::from_model_info(mi)?,
        )))
    }

    /// Builder method: replace the segmenter
    pub fn with_segmenter(mut self, segmenter: impl Segmenter + 'static) -> Self {
        self.segmenter = Arc::new(segmenter);
        self
    }

    pub fn policy(&self) -> &DetectionPolicy {
        &self.policy
    }

    /// Find the decisions to question
    ///
    /// # Arguments
    ///
    /// * `seq` - Decision sequence in generation order
    /// * `start_pos` - First pointer to examine
    /// * `return_first_only` - Stop after the first erroneous unit
    /// * `ctx` - Per-call context (ground truth for the simulated policy)
    ///
    /// # Returns
    ///
    /// Erroneous units with their pointers, in non-decreasing pointer order.
    /// Every pointer is at least `start_pos`.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the policy predicate; see [`DetectorError`].
    pub fn detection(
        &self,
        seq: &[DecisionRecord],
        start_pos: usize,
        return_first_only: bool,
        ctx: &DetectionContext<'_>,
    ) -> DetectorResult<Vec<ErrorPosition>> {
        if start_pos >= seq.len() {
            return Ok(Vec::new());
        }
        tracing::trace!(
            detector = self.policy.name(),
            start_pos,
            len = seq.len(),
            "running error detection"
        );

        let mut errors = Vec::new();
        for (unit, pointer) in self.segmenter.segment(seq) {
            if pointer < start_pos {
                continue;
            }
            if self.policy.is_error(&unit, pointer, ctx)? {
                tracing::debug!(
                    detector = self.policy.name(),
                    tag = unit.tag_name(),
                    pointer,
                    "flagged semantic unit"
                );
                errors.push(ErrorPosition { unit, pointer });
                if return_first_only {
                    break;
                }
            }
        }
        Ok(errors)
    }

    /// First erroneous unit at or after `start_pos`, if any
    pub fn first_error(
        &self,
        seq: &[DecisionRecord],
        start_pos: usize,
        ctx: &DetectionContext<'_>,
    ) -> DetectorResult<Option<ErrorPosition>> {
        Ok(self.detection(seq, start_pos, true, ctx)?.into_iter().next())
    }
}

impl fmt::Debug for ErrorDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorDetector")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
