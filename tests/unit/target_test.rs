//! Unit tests for the on-target classifier.

use fitlap::metrics::target::{classify, PlannedTarget, TargetStatus};

#[test]
fn test_eight_percent_over_is_on_target() {
    assert_eq!(classify(648.0, 600.0), TargetStatus::OnTarget);
}

#[test]
fn test_seventeen_percent_over_is_off_target() {
    assert_eq!(classify(700.0, 600.0), TargetStatus::OffTarget);
}

#[test]
fn test_tolerance_is_symmetric() {
    assert_eq!(classify(552.0, 600.0), TargetStatus::OnTarget);
    assert_eq!(classify(500.0, 600.0), TargetStatus::OffTarget);
}

#[test]
fn test_planned_target_duration_and_distance() {
    let target = PlannedTarget {
        duration_seconds: Some(600.0),
        distance_m: Some(2000.0),
        ..Default::default()
    };

    assert_eq!(target.classify_duration(648.0), Some(TargetStatus::OnTarget));
    assert_eq!(target.classify_distance(2500.0), Some(TargetStatus::OffTarget));
}

#[test]
fn test_unset_plan_yields_no_classification() {
    let target = PlannedTarget::default();
    assert_eq!(target.classify_duration(600.0), None);
    assert_eq!(target.classify_distance(2000.0), None);
}
