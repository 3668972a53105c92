//! End-to-end analysis of a decoded binary message stream.

use fitlap::ingest::{LapMessage, RecordMessage, SessionMessage};
use fitlap::metrics::route::hr_color_segments;
use fitlap::metrics::target::{PlannedTarget, TargetStatus};
use fitlap::{FitMessage, Sport, WorkoutAnalyzer};

fn record(offset: i64, hr: u8, lat: f64, lon: f64) -> FitMessage {
    FitMessage::Record(RecordMessage {
        timestamp_epoch: Some(1_700_000_000 + offset),
        heart_rate: Some(hr),
        latitude: Some(lat),
        longitude: Some(lon),
        speed_mps: Some(3.2),
        ..Default::default()
    })
}

fn lap(elapsed: f64, distance: f64) -> FitMessage {
    FitMessage::Lap(LapMessage {
        total_elapsed_seconds: elapsed,
        total_distance_m: distance,
        avg_speed_mps: if elapsed > 0.0 {
            Some(distance / elapsed)
        } else {
            None
        },
        avg_heart_rate: Some(150),
        max_heart_rate: Some(168),
        ..Default::default()
    })
}

fn running_stream() -> Vec<FitMessage> {
    let mut messages = vec![
        record(0, 130, 23.5880, 58.4080),
        record(1, 140, 23.5881, 58.4081),
        record(2, 160, 23.5882, 58.4082),
        lap(300.0, 1000.0),
        lap(2.0, 4.0),
        lap(310.0, 1020.0),
    ];
    messages.push(FitMessage::Session(SessionMessage {
        name: Some("Track Tuesday".to_string()),
        sport: Some("running".to_string()),
        start_time_epoch: Some(1_700_000_000),
        total_elapsed_seconds: Some(612.0),
        total_distance_m: Some(2024.0),
        avg_heart_rate: Some(151),
        max_heart_rate: Some(168),
        total_calories: Some(180),
        ..Default::default()
    }));
    messages
}

#[test]
fn test_stream_analysis_end_to_end() {
    let analysis = WorkoutAnalyzer::new()
        .analyze_fit_messages(&running_stream())
        .unwrap();

    assert_eq!(analysis.session.sport, Sport::Running);
    assert_eq!(analysis.session.name.as_deref(), Some("Track Tuesday"));
    // The 2-second artifact lap is gone and indices are gapless
    assert_eq!(analysis.laps.len(), 2);
    assert_eq!(analysis.laps[0].index, 0);
    assert_eq!(analysis.laps[1].index, 1);
    assert_eq!(analysis.laps[1].distance_m, 1020.0);

    assert_eq!(analysis.records.len(), 3);
    assert!(analysis.has_gps_data());
    assert_eq!(analysis.records[2].elapsed_seconds, 2);
}

#[test]
fn test_route_coloring_from_analysis_records() {
    let analysis = WorkoutAnalyzer::new()
        .analyze_fit_messages(&running_stream())
        .unwrap();

    let segments = hr_color_segments(&analysis.records);
    assert_eq!(segments.len(), 2);
    // 130..160 range: the 140-HR segment sits a third of the way up
    assert!((segments[0].intensity - 1.0 / 3.0).abs() < 1e-6);
    assert!((segments[1].intensity - 1.0).abs() < 1e-6);
}

#[test]
fn test_lap_only_stream_synthesizes_unknown_session() {
    let messages = vec![lap(300.0, 1000.0), lap(280.0, 980.0)];

    let analysis = WorkoutAnalyzer::new()
        .analyze_fit_messages(&messages)
        .unwrap();

    assert_eq!(analysis.session.sport, Sport::Unknown);
    assert_eq!(analysis.session.total_duration_seconds, 580);
    assert_eq!(analysis.session.total_distance_m, 1980.0);
    assert_eq!(analysis.session.avg_hr, Some(150));
    assert_eq!(analysis.session.max_hr, Some(168));
}

#[test]
fn test_on_target_classification_of_actual_laps() {
    let analysis = WorkoutAnalyzer::new()
        .analyze_fit_messages(&running_stream())
        .unwrap();

    let planned = PlannedTarget {
        duration_seconds: Some(300.0),
        ..Default::default()
    };

    let lap = &analysis.laps[0];
    assert_eq!(
        planned.classify_duration(lap.duration_seconds as f64),
        Some(TargetStatus::OnTarget)
    );

    let too_long = &analysis.laps[1];
    let tight_plan = PlannedTarget {
        duration_seconds: Some(250.0),
        ..Default::default()
    };
    assert_eq!(
        tight_plan.classify_duration(too_long.duration_seconds as f64),
        Some(TargetStatus::OffTarget)
    );
}

#[test]
fn test_report_for_binary_stream() {
    let analysis = WorkoutAnalyzer::new()
        .analyze_fit_messages(&running_stream())
        .unwrap();

    let report = analysis.report.as_deref().unwrap();
    assert!(report.contains("RUNNING: Track Tuesday"));
    assert!(report.contains("## Laps"));
    assert!(report.contains("| **Avg HR** | 151 bpm |"));
    assert!(report.contains("| **Calories** | 180 kcal |"));
}

#[test]
fn test_garbage_fit_bytes_fail() {
    let result = WorkoutAnalyzer::new().analyze_fit_bytes(b"definitely not a FIT file");
    assert!(result.is_err());
}

#[test]
fn test_empty_fit_bytes_fail() {
    let result = WorkoutAnalyzer::new().analyze_fit_bytes(&[]);
    assert!(result.is_err());
}
