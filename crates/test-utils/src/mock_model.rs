// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Stub models for the learned detector
//!
//! [`MockClassifier`] scores feature vectors from a per-tag table and records
//! every vector it receives, so tests can check feature construction.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use misp_sql_detector::{Classifier, ClassifierError, ModelInfo, TagIndexer};

/// Classifier returning a fixed score per one-hot column
#[derive(Debug, Default)]
pub struct MockClassifier {
    scores: HashMap<usize, f64>,
    default_score: f64,
    calls: AtomicUsize,
    seen: Mutex<Vec<Vec<f64>>>,
}

impl MockClassifier {
    /// Classifier scoring every vector with `default_score`
    pub fn constant(default_score: f64) -> Self {
        Self {
            default_score,
            ..Self::default()
        }
    }

    /// Builder method: score vectors whose hot column is `column`
    pub fn with_score(mut self, column: usize, score: f64) -> Self {
        self.scores.insert(column, score);
        self
    }

    /// Number of vectors scored so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every vector scored so far, in call order
    pub fn seen(&self) -> Vec<Vec<f64>> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Classifier for MockClassifier {
    fn predict(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(features.to_vec());
        }
        // The last slot is the probability; the hot column is in the one-hot block
        let one_hot = &features[..features.len().saturating_sub(1)];
        let score = one_hot
            .iter()
            .position(|v| *v == 1.0)
            .and_then(|column| self.scores.get(&column).copied())
            .unwrap_or(self.default_score);
        Ok(score)
    }
}

/// Model info pairing an indexer with a shared classifier
#[derive(Clone)]
pub struct StubModelInfo {
    indexer: TagIndexer,
    model: Arc<dyn Classifier>,
}

impl StubModelInfo {
    pub fn new(indexer: TagIndexer, model: Arc<dyn Classifier>) -> Self {
        Self { indexer, model }
    }

    /// Model info indexing `tags` in order, backed by `model`
    pub fn with_tags<I, S>(tags: I, model: Arc<dyn Classifier>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(TagIndexer::from_tags(tags), model)
    }
}

impl ModelInfo for StubModelInfo {
    fn indexer(&self) -> &TagIndexer {
        &self.indexer
    }

    fn model(&self) -> Arc<dyn Classifier> {
        self.model.clone()
    }
}
