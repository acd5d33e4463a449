// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # MISP SQL - Error Detection
//!
//! This crate decides, during interactive SQL generation, which decisions of
//! the parser are likely wrong and should be shown to a human for correction.
//!
//! ## Policies
//!
//! All detectors share one entry point, [`ErrorDetector::detection`], and
//! differ only in their [`DetectionPolicy`]:
//!
//! - **Simulated**: oracle baseline driven by ground-truth flags
//! - **Probability**: flags decisions with probability below a threshold
//! - **BayesDropout**: flags decisions whose dropout samples spread too much
//! - **Learned**: flags decisions a trained [`Classifier`] scores below 0.5
//!
//! ```rust
//! use misp_sql_detector::{DetectionContext, ErrorDetector};
//! use misp_sql_ir::{DecisionRecord, SemanticTag};
//!
//! let seq = vec![
//!     DecisionRecord::new(SemanticTag::SelectCol, 0.9),
//!     DecisionRecord::new(SemanticTag::WhereCol, 0.4),
//!     DecisionRecord::new(SemanticTag::WhereOp, 0.6),
//! ];
//! let detector = ErrorDetector::probability(0.5).unwrap();
//! let errors = detector.detection(&seq, 0, false, &DetectionContext::new()).unwrap();
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].pointer, 1);
//! ```
//!
//! ## Learned Detector
//!
//! The trained model is injected through [`ModelInfo`]. A dense network stored
//! as JSON can be loaded with [`SerializedModelInfo`]; any other model only
//! needs to implement [`Classifier`].

pub mod config;
pub mod detector;
pub mod error;
pub mod fnn;
pub mod learned;

// Re-exports
pub use config::{ConfigError, DetectorConfig};
pub use detector::{DetectionContext, DetectionPolicy, ErrorDetector, ErrorPosition};
pub use error::{ClassifierError, DetectorError, DetectorResult};
pub use fnn::{Activation, DenseLayer, FeedForwardClassifier, SerializedModelInfo};
pub use learned::{Classifier, LearnedPolicy, ModelInfo, TagIndexer, CORRECTNESS_CUTOFF};
