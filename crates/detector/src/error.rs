// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Error types for error detection
//!
//! Detection never recovers locally: every failure is returned to the caller
//! of [`crate::ErrorDetector::detection`], which decides whether to retry or
//! fall back to another policy.

use thiserror::Error;

/// Result type alias for detection operations
pub type DetectorResult<T> = Result<T, DetectorError>;

/// Errors that can occur while detecting erroneous decisions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DetectorError {
    /// A unit's confidence has the wrong shape for the policy
    #[error("{detector} detector expects {expected} confidence, found {found} at pointer {pointer}")]
    ConfidenceShape {
        detector: &'static str,
        expected: &'static str,
        found: &'static str,
        pointer: usize,
    },

    /// Threshold is negative or not a number
    #[error("Invalid {detector} threshold: {value}")]
    InvalidThreshold { detector: &'static str, value: f64 },

    /// Dropout detector received a unit with no samples
    #[error("Dropout detector found an empty sample collection at pointer {pointer}")]
    EmptySamples { pointer: usize },

    /// Simulated detector was called without ground truth
    #[error("Simulated detector requires ground-truth correctness flags")]
    MissingGroundTruth,

    /// Ground truth does not cover a unit's pointer
    #[error("Ground truth has {len} flags but pointer {pointer} was requested")]
    GroundTruthMisaligned { pointer: usize, len: usize },

    /// Tag has no column in the learned detector's indexer
    #[error("Tag '{0}' is not present in the learned detector's indexer")]
    UnknownTag(String),

    /// Indexer cannot produce a valid one-hot encoding
    #[error("Invalid indexer: {0}")]
    InvalidIndexer(String),

    /// The classifier failed to score a feature vector
    #[error("Classifier failed: {0}")]
    Classifier(#[from] ClassifierError),
}

/// Errors raised by a classifier
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClassifierError {
    /// Feature vector width differs from the model's input width
    #[error("Feature width mismatch: model expects {expected}, got {found}")]
    FeatureWidthMismatch { expected: usize, found: usize },

    /// Model produced a non-finite score
    #[error("Model produced a non-finite score: {0}")]
    NonFiniteScore(f64),

    /// Model-specific failure
    #[error("{0}")]
    Model(String),
}
