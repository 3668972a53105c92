//! End-to-end analysis of a swim CSV export.

use fitlap::{Sport, WorkoutAnalyzer};

const HEADER: &str = "Set #,Set,Strk,Length (m),Interval (m),Move Time,Rest Time,Avg BPM (moving),Max BPM,SWOLF,Avg Strk Rate (strk/min),Strk Count,Avg DPS,Calories";

fn sample_csv() -> String {
    let rows = [
        "1,Warmup,FR,25,25,0:30.00,0:05.00,120,130,40,28,18,1.40,5",
        "1,Warmup,FR,25,25,0:31.00,0:04.00,124,132,42,29,19,1.35,5",
        "1,Warmup,FR,25,25,0:32.00,0:06.00,128,136,44,30,20,1.30,5",
        "2,Main,FR,25,25,0:28.00,0:10.00,140,150,38,32,17,1.45,6",
        "2,Main,FR,25,25,0:27.50,0:12.00,144,155,37,33,16,1.50,6",
        "3,Break,REST,0,0,0:00.00,1:00.00,0,0,0,0,0,0,2",
    ];

    let mut lines = vec![
        "Swim Title,Pool Size,Swim Date,Swim Start Time".to_string(),
        "Tuesday Intervals,25,2024-03-19,06:30:00".to_string(),
        String::new(),
        HEADER.to_string(),
    ];
    lines.extend(rows.iter().map(|r| r.to_string()));
    lines.join("\n")
}

#[test]
fn test_csv_analysis_produces_grouped_laps() {
    let analysis = WorkoutAnalyzer::new()
        .analyze_form_csv(&sample_csv())
        .unwrap();

    // Three Warmup rows + two Main rows + one rest row: three laps
    assert_eq!(analysis.laps.len(), 3);

    let warmup = &analysis.laps[0];
    assert_eq!(warmup.label.as_deref(), Some("Warmup"));
    assert_eq!(warmup.distance_m, 75.0);
    assert_eq!(warmup.duration_seconds, 108);
    assert_eq!(warmup.stroke_count, Some(57));

    let main = &analysis.laps[1];
    assert_eq!(main.label.as_deref(), Some("Main"));
    assert_eq!(main.distance_m, 50.0);

    let rest = &analysis.laps[2];
    assert!(rest.is_rest);
    assert_eq!(rest.distance_m, 0.0);
}

#[test]
fn test_csv_session_fields() {
    let analysis = WorkoutAnalyzer::new()
        .analyze_form_csv(&sample_csv())
        .unwrap();

    let session = &analysis.session;
    assert_eq!(session.sport, Sport::Swimming);
    assert_eq!(session.name.as_deref(), Some("Tuesday Intervals"));
    assert_eq!(session.pool_length_m, Some(25.0));
    assert_eq!(session.total_distance_m, 125.0);
    assert_eq!(session.num_active_lengths, Some(5));
    assert!(session.start_time.is_some());
    assert!(session.swim_pace_per_100m.is_some());
}

#[test]
fn test_csv_analysis_has_no_record_track() {
    let analysis = WorkoutAnalyzer::new()
        .analyze_form_csv(&sample_csv())
        .unwrap();

    assert!(analysis.records.is_empty());
    assert!(!analysis.has_gps_data());
}

#[test]
fn test_csv_report_renders_sets() {
    let analysis = WorkoutAnalyzer::new()
        .analyze_form_csv(&sample_csv())
        .unwrap();

    let report = analysis.report.as_deref().unwrap();
    assert!(report.contains("SWIMMING: Tuesday Intervals"));
    assert!(report.contains("## Sets"));
    assert!(report.contains("**Warmup:**"));
    assert!(report.contains("Rest"));
    assert!(report.contains("**Pool:** 25m"));
}

#[test]
fn test_analysis_serializes_to_json() {
    let analysis = WorkoutAnalyzer::new()
        .analyze_form_csv(&sample_csv())
        .unwrap();

    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["session"]["sport"], "swimming");
    assert_eq!(json["laps"][0]["label"], "Warmup");
    assert!(json["id"].is_string());
}

#[test]
fn test_truncated_csv_fails_cleanly() {
    let result = WorkoutAnalyzer::new().analyze_form_csv("just one line");
    assert!(result.is_err());
}

#[test]
fn test_csv_missing_column_fails_whole_parse() {
    // Header lacks Move Time
    let text = [
        "Swim Title,Pool Size,Swim Date,Swim Start Time",
        "X,25,2024-03-19,06:30:00",
        "",
        "Set #,Set,Strk,Length (m),Rest Time,Avg BPM (moving),Max BPM,SWOLF,Avg Strk Rate (strk/min),Strk Count,Avg DPS,Calories",
        "1,Warmup,FR,25,0:05.00,120,130,40,28,18,1.40,5",
    ]
    .join("\n");

    let result = WorkoutAnalyzer::new().analyze_form_csv(&text);
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Move Time"));
}
