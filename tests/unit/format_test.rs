//! Unit tests for duration, distance and pace formatting.

use fitlap::metrics::format::{
    format_distance, format_duration, format_pace, format_swim_pace, parse_clock_time,
    running_pace, swim_pace_per_100m,
};

#[test]
fn test_clock_time_round_trips() {
    assert_eq!(parse_clock_time("2:05.30"), 125.3);
    assert_eq!(parse_clock_time("0:00.00"), 0.0);
    assert_eq!(parse_clock_time(""), 0.0);
}

#[test]
fn test_clock_time_with_hours() {
    assert_eq!(parse_clock_time("1:00:00.00"), 3600.0);
    assert_eq!(parse_clock_time("1:30:15.50"), 5415.5);
}

#[test]
fn test_clock_time_malformed_is_zero() {
    assert_eq!(parse_clock_time("abc"), 0.0);
    assert_eq!(parse_clock_time("1:2:3:4"), 0.0);
    assert_eq!(parse_clock_time(":"), 0.0);
}

#[test]
fn test_running_pace_five_per_km() {
    // 5000 m in 1500 s
    assert_eq!(running_pace(5000.0, 1500.0).as_deref(), Some("5:00/km"));
}

#[test]
fn test_pace_requires_positive_speed() {
    assert_eq!(format_pace(0.0), None);
    assert_eq!(format_swim_pace(-0.5), None);
}

#[test]
fn test_duration_switches_to_hours_at_3600() {
    assert_eq!(format_duration(3599), "59:59");
    assert_eq!(format_duration(3600), "1:00:00");
}

#[test]
fn test_distance_switches_to_km_at_1000() {
    assert_eq!(format_distance(999.0), "999m");
    assert_eq!(format_distance(1000.0), "1.00 km");
}

#[test]
fn test_swim_pace_per_100m_formats() {
    assert_eq!(
        swim_pace_per_100m(1500.0, 2400.0).as_deref(),
        Some("2:40/100m")
    );
    assert_eq!(swim_pace_per_100m(0.0, 2400.0), None);
    assert_eq!(swim_pace_per_100m(1500.0, 0.0), None);
}
