// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Integration tests for the learned-classifier detector

use std::sync::Arc;

use misp_sql_detector::{
    Activation, DenseLayer, DetectionContext, DetectorError, ErrorDetector, FeedForwardClassifier,
    SerializedModelInfo, TagIndexer,
};
use misp_sql_ir::{SemanticTag, TagSegmenter, Segmenter};
use misp_sql_test_utils::{
    DecisionFixtures, DecisionSequenceBuilder, DetectionAssertions, MockClassifier, StubModelInfo,
};

#[test]
fn test_classifier_sees_one_hot_and_probability() {
    let clf = Arc::new(MockClassifier::constant(0.9));
    let mi = StubModelInfo::with_tags(DecisionFixtures::learned_tags(), clf.clone());
    let detector = ErrorDetector::learned(&mi).unwrap();

    let seq = DecisionFixtures::flight_query();
    let errors = detector.detection(&seq, 0, false, &DetectionContext::new()).unwrap();
    assert!(errors.is_empty());

    // One call per semantic unit, fillers excluded
    assert_eq!(clf.calls(), 5);
    let seen = clf.seen();
    // WHERE_OP is column 3, its probability is 0.42
    assert_eq!(seen[2], vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.42]);
    for x in &seen {
        assert_eq!(x.len(), DecisionFixtures::learned_tags().len() + 1);
        assert_eq!(x[..x.len() - 1].iter().filter(|v| **v == 1.0).count(), 1);
    }
}

#[test]
fn test_score_of_exactly_half_is_not_an_error() {
    let mi = StubModelInfo::with_tags(
        DecisionFixtures::learned_tags(),
        Arc::new(MockClassifier::constant(0.5)),
    );
    let detector = ErrorDetector::learned(&mi).unwrap();
    let errors = detector
        .detection(&DecisionFixtures::flight_query(), 0, false, &DetectionContext::new())
        .unwrap();
    assert!(errors.is_empty());
}

#[test]
fn test_unknown_tag_is_fatal() {
    let mi = StubModelInfo::with_tags(["SELECT_COL"], Arc::new(MockClassifier::constant(0.9)));
    let detector = ErrorDetector::learned(&mi).unwrap();
    let seq = DecisionSequenceBuilder::new()
        .unit(SemanticTag::SelectCol, 0.9)
        .unit(SemanticTag::HavAgg, 0.9)
        .build();

    let err = detector.detection(&seq, 0, false, &DetectionContext::new()).unwrap_err();
    assert_eq!(err, DetectorError::UnknownTag("HAV_AGG".to_string()));

    // Starting after the unknown unit avoids the lookup entirely
    let seq = DecisionSequenceBuilder::new()
        .unit(SemanticTag::HavAgg, 0.9)
        .unit(SemanticTag::SelectCol, 0.9)
        .build();
    assert!(detector.detection(&seq, 1, false, &DetectionContext::new()).unwrap().is_empty());
}

#[test]
fn test_invalid_indexer_is_rejected_at_construction() {
    let indexer = TagIndexer::new().with_column("SELECT_COL", 0).with_column("WHERE_COL", 5);
    let mi = StubModelInfo::new(indexer, Arc::new(MockClassifier::constant(0.9)));
    assert!(matches!(
        ErrorDetector::learned(&mi),
        Err(DetectorError::InvalidIndexer(_))
    ));
}

#[test]
fn test_logistic_model_flags_low_probability_units() {
    // Score is sigmoid(10 * prob - 5): below 0.5 exactly when prob < 0.5
    let tags = DecisionFixtures::learned_tags();
    let indexer = TagIndexer::from_tags(tags.iter().copied());
    let mut weights = vec![0.0; indexer.input_size()];
    if let Some(last) = weights.last_mut() {
        *last = 10.0;
    }
    let clf = FeedForwardClassifier::new(vec![DenseLayer::new(
        vec![weights],
        vec![-5.0],
        Activation::Sigmoid,
    )])
    .unwrap();
    let mi = SerializedModelInfo::new(indexer, clf).unwrap();
    let detector = ErrorDetector::learned(&mi).unwrap();

    let seq = DecisionFixtures::flight_query();
    let errors = detector.detection(&seq, 0, false, &DetectionContext::new()).unwrap();
    DetectionAssertions::assert_flagged(&errors, &[3, 6]);

    // Agrees with the probability detector at the same cut
    let by_prob = ErrorDetector::probability(0.5)
        .unwrap()
        .detection(&seq, 0, false, &DetectionContext::new())
        .unwrap();
    assert_eq!(errors, by_prob);
}

#[test]
fn test_custom_segmenter_is_used() {
    // Groups only the WHERE clause
    let where_only = |seq: &[misp_sql_ir::DecisionRecord]| {
        let mut segmentation = TagSegmenter.segment(seq);
        let kept: Vec<_> = segmentation
            .iter()
            .filter(|(u, _)| u.tag_name().starts_with("WHERE"))
            .map(|(u, p)| (u.clone(), p))
            .collect();
        segmentation = misp_sql_ir::Segmentation::new();
        for (unit, pointer) in kept {
            segmentation.push(unit, pointer);
        }
        segmentation
    };
    let mi = StubModelInfo::with_tags(
        DecisionFixtures::learned_tags(),
        Arc::new(MockClassifier::constant(0.1)),
    );
    let detector = ErrorDetector::learned(&mi).unwrap().with_segmenter(where_only);
    let errors = detector
        .detection(&DecisionFixtures::flight_query(), 0, false, &DetectionContext::new())
        .unwrap();
    DetectionAssertions::assert_flagged(&errors, &[2, 3, 4]);
}

#[test]
fn test_out_of_range_scores_are_compared_as_is() {
    let seq = DecisionFixtures::flight_query();
    let ctx = DetectionContext::new();

    let above = StubModelInfo::with_tags(
        DecisionFixtures::learned_tags(),
        Arc::new(MockClassifier::constant(1.3)),
    );
    let errors = ErrorDetector::learned(&above)
        .unwrap()
        .detection(&seq, 0, false, &ctx)
        .unwrap();
    assert!(errors.is_empty());

    let below = StubModelInfo::with_tags(
        DecisionFixtures::learned_tags(),
        Arc::new(MockClassifier::constant(-0.2)),
    );
    let errors = ErrorDetector::learned(&below)
        .unwrap()
        .detection(&seq, 0, false, &ctx)
        .unwrap();
    DetectionAssertions::assert_flagged(&errors, &[0, 2, 3, 4, 6]);
}
