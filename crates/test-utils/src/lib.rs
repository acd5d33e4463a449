// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for misp-sql
//!
//! This crate provides common testing components including:
//! - A fluent builder for decision sequences
//! - Stub classifiers and model infos for the learned detector
//! - Detection-specific assertions
//! - Test fixtures and sample data

pub mod assertions;
pub mod fixtures;
pub mod mock_model;
pub mod sequence_builder;

// Re-exports for convenience
pub use assertions::DetectionAssertions;
pub use fixtures::{DecisionFixtures, SchemaFixtures};
pub use mock_model::{MockClassifier, StubModelInfo};
pub use sequence_builder::DecisionSequenceBuilder;
