// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Feed-Forward Classifier
//!
//! A small dense network that can be serialized next to its indexer, so a
//! learned detector can be built from a single JSON file:
//!
//! ```json
//! {
//!   "indexer": { "SELECT_COL": 0, "WHERE_COL": 1 },
//!   "layers": [
//!     { "weights": [[0.5, -0.2, 1.3]], "bias": [0.1], "activation": "sigmoid" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::config::ConfigError;
use crate::error::ClassifierError;
use crate::learned::{Classifier, ModelInfo, TagIndexer};

/// Layer activation function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Identity,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Identity => x,
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Tanh => x.tanh(),
        }
    }
}

/// Fully connected layer; `weights` is `outputs x inputs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

impl DenseLayer {
    pub fn new(weights: Vec<Vec<f64>>, bias: Vec<f64>, activation: Activation) -> Self {
        Self {
            weights,
            bias,
            activation,
        }
    }

    pub fn input_width(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    pub fn output_width(&self) -> usize {
        self.bias.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| {
                let z: f64 = row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + b;
                self.activation.apply(z)
            })
            .collect()
    }
}

/// Dense network producing a single correctness score
#[derive(Debug, Clone, PartialEq)]
pub struct FeedForwardClassifier {
    layers: Vec<DenseLayer>,
}

impl FeedForwardClassifier {
    /// Build a network, checking that layer shapes chain to one output
    pub fn new(layers: Vec<DenseLayer>) -> Result<Self, ConfigError> {
        let Some(first) = layers.first() else {
            return Err(ConfigError::InvalidModel("network has no layers".to_string()));
        };
        let mut width = first.input_width();
        if width == 0 {
            return Err(ConfigError::InvalidModel("first layer has no inputs".to_string()));
        }
        for (i, layer) in layers.iter().enumerate() {
            if layer.weights.len() != layer.bias.len() {
                return Err(ConfigError::InvalidModel(format!(
                    "layer {} has {} weight rows but {} biases",
                    i,
                    layer.weights.len(),
                    layer.bias.len()
                )));
            }
            if layer.weights.iter().any(|row| row.len() != width) {
                return Err(ConfigError::InvalidModel(format!(
                    "layer {} expects {} inputs",
                    i, width
                )));
            }
            width = layer.output_width();
        }
        if width != 1 {
            return Err(ConfigError::InvalidModel(format!(
                "network must produce one output, produces {}",
                width
            )));
        }
        Ok(Self { layers })
    }

    pub fn input_width(&self) -> usize {
        self.layers.first().map_or(0, DenseLayer::input_width)
    }
}

impl Classifier for FeedForwardClassifier {
    fn predict(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        if features.len() != self.input_width() {
            return Err(ClassifierError::FeatureWidthMismatch {
                expected: self.input_width(),
                found: features.len(),
            });
        }
        let mut activations = features.to_vec();
        for layer in &self.layers {
            activations = layer.forward(&activations);
        }
        activations
            .first()
            .copied()
            .ok_or_else(|| ClassifierError::Model("network produced no output".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct ModelFile {
    indexer: TagIndexer,
    layers: Vec<DenseLayer>,
}

/// Indexer and feed-forward network loaded from a model file
#[derive(Debug, Clone)]
pub struct SerializedModelInfo {
    indexer: TagIndexer,
    classifier: Arc<FeedForwardClassifier>,
}

impl SerializedModelInfo {
    /// Pair an indexer with a network, checking their widths agree
    pub fn new(indexer: TagIndexer, classifier: FeedForwardClassifier) -> Result<Self, ConfigError> {
        indexer.validate()?;
        if classifier.input_width() != indexer.input_size() {
            return Err(ConfigError::InvalidModel(format!(
                "network takes {} inputs but indexer produces {}",
                classifier.input_width(),
                indexer.input_size()
            )));
        }
        Ok(Self {
            indexer,
            classifier: Arc::new(classifier),
        })
    }

    /// Parse a model from its JSON representation
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let file: ModelFile =
            serde_json::from_str(json).map_err(|e| ConfigError::Decode(e.to_string()))?;
        Self::new(file.indexer, FeedForwardClassifier::new(file.layers)?)
    }

    /// Load a model file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loading feed-forward detector model");
        Self::from_json_str(&json)
    }
}

impl ModelInfo for SerializedModelInfo {
    fn indexer(&self) -> &TagIndexer {
        &self.indexer
    }

    fn model(&self) -> Arc<dyn Classifier> {
        self.classifier.clone()
    }
}
