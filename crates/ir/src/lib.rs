// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # MISP SQL - Decision Representation
//!
//! This crate provides the data model shared by the interactive SQL parser and
//! the error detectors that question its decisions:
//!
//! - [`DecisionRecord`]: one incremental choice made by the SQL decoder
//! - [`SemanticTag`]: what kind of choice a record is (column, operator, ...)
//! - [`Confidence`]: a scalar probability or a set of dropout samples
//! - [`SemanticUnit`]: the segmented, typed view of a decision
//! - [`Segmenter`]: turns a decision sequence into units and pointers
//!
//! ## Segmentation
//!
//! ```rust
//! use misp_sql_ir::{Confidence, DecisionRecord, SemanticTag, Segmenter, TagSegmenter};
//!
//! let seq = vec![
//!     DecisionRecord::new(SemanticTag::SelectCol, Confidence::Scalar(0.9)),
//!     DecisionRecord::new(SemanticTag::Outside, Confidence::Scalar(1.0)),
//!     DecisionRecord::new(SemanticTag::WhereCol, Confidence::Scalar(0.4)),
//! ];
//! let segmentation = TagSegmenter.segment(&seq);
//! assert_eq!(segmentation.pointers(), &[0, 2]);
//! ```

pub mod decision;
pub mod segment;
pub mod tag;

// Re-export commonly used types
pub use decision::{ColumnRef, Confidence, DecisionArg, DecisionRecord, SemanticUnit};
pub use segment::{Segmentation, Segmenter, TagSegmenter};
pub use tag::SemanticTag;
