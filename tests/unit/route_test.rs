//! Unit tests for HR route-coloring segment inputs.

use fitlap::metrics::route::{hr_color_segments, NEUTRAL_RATIO};
use fitlap::model::RecordPoint;

fn point(lat: f64, lon: f64, hr: Option<u8>) -> RecordPoint {
    let mut record = RecordPoint::new(0);
    record.latitude = Some(lat);
    record.longitude = Some(lon);
    record.heart_rate = hr;
    record
}

#[test]
fn test_ratio_spans_hr_range() {
    let records = vec![
        point(23.58, 58.40, Some(120)),
        point(23.59, 58.41, Some(150)),
        point(23.60, 58.42, Some(180)),
    ];

    let segments = hr_color_segments(&records);
    assert_eq!(segments.len(), 2);
    assert!((segments[0].intensity - 0.5).abs() < 1e-6);
    assert!((segments[1].intensity - 1.0).abs() < 1e-6);
}

#[test]
fn test_flat_hr_is_neutral() {
    let records = vec![point(0.0, 0.0, Some(140)), point(0.1, 0.1, Some(140))];
    let segments = hr_color_segments(&records);
    assert_eq!(segments[0].intensity, NEUTRAL_RATIO);
}

#[test]
fn test_missing_hr_is_neutral_not_an_error() {
    let records = vec![point(0.0, 0.0, None), point(0.1, 0.1, None)];
    let segments = hr_color_segments(&records);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].intensity, NEUTRAL_RATIO);
}

#[test]
fn test_records_without_gps_are_excluded() {
    let records = vec![
        point(0.0, 0.0, Some(120)),
        RecordPoint::new(5),
        point(0.2, 0.2, Some(180)),
    ];

    let segments = hr_color_segments(&records);
    assert_eq!(segments.len(), 1);
}
