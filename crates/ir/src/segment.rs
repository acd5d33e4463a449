// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Semantic Unit Segmentation
//!
//! Segmentation turns a flat decision sequence into two equal-length ordered
//! lists: the semantic units and the pointers (indices into the original
//! sequence) at which each unit's decision occurred.
//!
//! The [`Segmenter`] trait is the seam for parsers with their own notion of a
//! unit. [`TagSegmenter`] is the default: one unit per record whose tag is
//! semantic, in sequence order.

use crate::decision::{DecisionRecord, SemanticUnit};

/// Semantic units paired with their positions in the decision sequence
///
/// Pointers are strictly increasing for any segmenter that preserves
/// sequence order, which every detector relies on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segmentation {
    units: Vec<SemanticUnit>,
    pointers: Vec<usize>,
}

impl Segmentation {
    /// Create an empty segmentation
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a unit found at `pointer`
    pub fn push(&mut self, unit: SemanticUnit, pointer: usize) {
        self.units.push(unit);
        self.pointers.push(pointer);
    }

    pub fn units(&self) -> &[SemanticUnit] {
        &self.units
    }

    pub fn pointers(&self) -> &[usize] {
        &self.pointers
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Iterate `(unit, pointer)` pairs in segmentation order
    pub fn iter(&self) -> impl Iterator<Item = (&SemanticUnit, usize)> {
        self.units.iter().zip(self.pointers.iter().copied())
    }
}

impl IntoIterator for Segmentation {
    type Item = (SemanticUnit, usize);
    type IntoIter = std::iter::Zip<std::vec::IntoIter<SemanticUnit>, std::vec::IntoIter<usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.into_iter().zip(self.pointers)
    }
}

/// Converts a decision sequence into semantic units and pointers
///
/// Implementations must be pure: the same sequence always yields the same
/// segmentation, and the output preserves sequence order.
pub trait Segmenter: Send + Sync {
    /// Segment `seq` into units and their pointers
    fn segment(&self, seq: &[DecisionRecord]) -> Segmentation;
}

/// Default segmenter: one unit per semantic decision
///
/// Records tagged `O` or `##END_NESTED##` are skipped; the pointer of a unit
/// is the index of its record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagSegmenter;

impl Segmenter for TagSegmenter {
    fn segment(&self, seq: &[DecisionRecord]) -> Segmentation {
        let mut segmentation = Segmentation::new();
        for (pointer, record) in seq.iter().enumerate() {
            if record.tag.is_semantic() {
                segmentation.push(SemanticUnit::from(record), pointer);
            }
        }
        tracing::trace!(
            records = seq.len(),
            units = segmentation.len(),
            "segmented decision sequence"
        );
        segmentation
    }
}

impl<F> Segmenter for F
where
    F: Fn(&[DecisionRecord]) -> Segmentation + Send + Sync,
{
    fn segment(&self, seq: &[DecisionRecord]) -> Segmentation {
        self(seq)
    }
}
