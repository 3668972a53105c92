//! File-level round trip: read an export from disk, analyze, write the
//! report next to it.

use fitlap::{detect_format, FileFormat, WorkoutAnalyzer};

const SAMPLE_CSV: &str = "\
Swim Title,Pool Size,Swim Date,Swim Start Time
Lunch Swim,50,2024-04-02,12:15:00

Set #,Set,Strk,Length (m),Interval (m),Move Time,Rest Time,Avg BPM (moving),Max BPM,SWOLF,Avg Strk Rate (strk/min),Strk Count,Avg DPS,Calories
1,Steady,FR,50,50,0:55.00,0:10.00,135,148,44,30,38,1.30,9
1,Steady,FR,50,50,0:56.00,0:08.00,138,150,45,31,39,1.28,9
";

#[test]
fn test_csv_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("lunch_swim.csv");
    std::fs::write(&input, SAMPLE_CSV).unwrap();

    assert_eq!(detect_format(&input), Some(FileFormat::FormCsv));

    let text = std::fs::read_to_string(&input).unwrap();
    let analysis = WorkoutAnalyzer::new().analyze_form_csv(&text).unwrap();

    assert_eq!(analysis.laps.len(), 1);
    assert_eq!(analysis.session.pool_length_m, Some(50.0));

    let output = dir.path().join("lunch_swim.md");
    std::fs::write(&output, analysis.report.as_deref().unwrap()).unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("Lunch Swim"));
    assert!(written.contains("**Steady:**"));
}

#[test]
fn test_unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.txt");
    std::fs::write(&path, "not a workout").unwrap();

    assert_eq!(detect_format(&path), None);
}
