// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Detection-specific test helpers and custom assertions

use misp_sql_detector::ErrorPosition;

/// Custom assertion helpers for detection results
pub struct DetectionAssertions;

impl DetectionAssertions {
    /// Pointers of the flagged units, in result order
    pub fn pointers(errors: &[ErrorPosition]) -> Vec<usize> {
        errors.iter().map(|e| e.pointer).collect()
    }

    /// Assert that exactly the given pointers were flagged, in order
    pub fn assert_flagged(errors: &[ErrorPosition], expected: &[usize]) {
        assert_eq!(
            Self::pointers(errors),
            expected,
            "Flagged pointers mismatch"
        );
    }

    /// Assert the ordering and start-position guarantees of a detection result
    pub fn assert_well_formed(errors: &[ErrorPosition], start_pos: usize) {
        for error in errors {
            assert!(
                error.pointer >= start_pos,
                "Pointer {} precedes start position {}",
                error.pointer,
                start_pos
            );
        }
        for pair in errors.windows(2) {
            assert!(
                pair[0].pointer <= pair[1].pointer,
                "Pointers out of order: {} then {}",
                pair[0].pointer,
                pair[1].pointer
            );
        }
    }

    /// Assert that a first-only result is empty or the prefix of the full one
    pub fn assert_first_is_prefix(first: &[ErrorPosition], all: &[ErrorPosition]) {
        assert!(first.len() <= 1, "First-only result has {} entries", first.len());
        match (first.first(), all.first()) {
            (None, None) => {}
            (Some(f), Some(a)) => assert_eq!(f, a, "First-only result is not the first error"),
            (f, a) => panic!("First-only result {:?} disagrees with full result {:?}", f, a),
        }
    }
}
