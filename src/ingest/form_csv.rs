//! CSV path: swim-goggle length exports.
//!
//! File layout is fixed: line 0 holds metadata keys, line 1 the metadata
//! values, line 2 is a blank separator, line 3 the per-length column header,
//! and everything after is one row per pool length. Consecutive rows sharing
//! a set label combine into one lap.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDateTime};

use crate::analyzer::AnalysisObserver;
use crate::ingest::ParseError;
use crate::metrics::format;
use crate::model::{Sport, WorkoutLap, WorkoutSession};

/// Minimum line count: two metadata rows, separator, column header, one row.
const MIN_LINES: usize = 5;

/// Stroke code marking a rest length.
const REST_MARKER: &str = "REST";

/// Default pool length when the metadata omits it.
const DEFAULT_POOL_LENGTH_M: f64 = 25.0;

/// Columns that must exist in the per-length header row.
const REQUIRED_COLUMNS: [&str; 13] = [
    "Set #",
    "Set",
    "Strk",
    "Length (m)",
    "Move Time",
    "Rest Time",
    "Avg BPM (moving)",
    "Max BPM",
    "SWOLF",
    "Avg Strk Rate (strk/min)",
    "Strk Count",
    "Avg DPS",
    "Calories",
];

/// One parsed length row.
#[derive(Debug, Clone)]
pub struct LengthRow {
    /// Set ordinal reported by the device
    pub set_number: u32,
    /// Set label; rows sharing a label combine into one lap
    pub label: Option<String>,
    /// Stroke code, `REST` for rest lengths
    pub stroke: String,
    /// Length distance in meters
    pub distance_m: f64,
    /// Moving time in seconds
    pub move_time_s: f64,
    /// Rest time in seconds
    pub rest_time_s: f64,
    /// Average moving heart rate
    pub avg_hr: Option<u8>,
    /// Maximum heart rate
    pub max_hr: Option<u8>,
    /// SWOLF for the length
    pub swolf: Option<u16>,
    /// Average stroke rate in strokes/min
    pub stroke_rate: Option<u16>,
    /// Stroke count
    pub stroke_count: u32,
    /// Average distance per stroke in meters
    pub dps: Option<f64>,
    /// Calories for the length
    pub calories: u32,
    /// True for rest lengths (rest stroke code or no distance)
    pub is_rest: bool,
}

/// Parse a swim CSV export into a normalized session and its laps.
pub fn parse(
    text: &str,
    offset: FixedOffset,
    observer: &dyn AnalysisObserver,
) -> Result<(WorkoutSession, Vec<WorkoutLap>), ParseError> {
    let lines: Vec<&str> = text
        .trim()
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .collect();

    if lines.len() < MIN_LINES {
        return Err(ParseError::TooShort {
            lines: lines.len(),
            required: MIN_LINES,
        });
    }

    let metadata = parse_metadata(lines[0], lines[1]);
    let columns = parse_columns(lines[3])?;

    let mut rows = Vec::new();
    for (idx, line) in lines.iter().enumerate().skip(4) {
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(line, &columns) {
            Some(row) => rows.push(row),
            None => observer.row_discarded(idx + 1),
        }
    }

    let laps = group_rows(&rows);
    let session = build_session(&metadata, &rows, &laps, offset);

    Ok((session, laps))
}

/// Build the metadata map from the two leading key/value rows.
fn parse_metadata(key_line: &str, value_line: &str) -> HashMap<String, String> {
    key_line
        .split(',')
        .zip(value_line.split(','))
        .filter_map(|(key, value)| {
            let key = key.trim();
            let value = value.trim();
            if key.is_empty() || value.is_empty() {
                None
            } else {
                Some((key.to_string(), value.to_string()))
            }
        })
        .collect()
}

/// Build the column name→index table and validate the required schema.
///
/// Validation happens once, here: a file missing a required column fails
/// the whole parse instead of silently defaulting row by row.
fn parse_columns(header_line: &str) -> Result<HashMap<String, usize>, ParseError> {
    let columns: HashMap<String, usize> = header_line
        .split(',')
        .enumerate()
        .map(|(idx, name)| (name.trim().to_string(), idx))
        .collect();

    for required in REQUIRED_COLUMNS {
        if !columns.contains_key(required) {
            return Err(ParseError::MissingColumn(required.to_string()));
        }
    }

    Ok(columns)
}

/// Parse one data row; `None` when the row is too short for the schema.
fn parse_row(line: &str, columns: &HashMap<String, usize>) -> Option<LengthRow> {
    let values: Vec<&str> = line.split(',').map(str::trim).collect();
    if values.len() < columns.len() {
        return None;
    }

    fn field<'a>(columns: &HashMap<String, usize>, values: &[&'a str], name: &str) -> &'a str {
        columns
            .get(name)
            .and_then(|&idx| values.get(idx))
            .copied()
            .unwrap_or("")
    }
    let get = |name: &str| field(columns, &values, name);

    let stroke = {
        let raw = get("Strk");
        if raw.is_empty() {
            REST_MARKER.to_string()
        } else {
            raw.to_string()
        }
    };
    let distance_m = parse_f64(get("Length (m)"));
    let is_rest = stroke == REST_MARKER || distance_m <= 0.0;

    let label = {
        let raw = get("Set");
        if raw.is_empty() {
            None
        } else {
            Some(raw.to_string())
        }
    };

    Some(LengthRow {
        set_number: parse_u32(get("Set #")),
        label,
        stroke,
        distance_m,
        move_time_s: format::parse_clock_time(get("Move Time")),
        rest_time_s: format::parse_clock_time(get("Rest Time")),
        avg_hr: positive_u8(get("Avg BPM (moving)")),
        max_hr: positive_u8(get("Max BPM")),
        swolf: positive_u16(get("SWOLF")),
        stroke_rate: positive_u16(get("Avg Strk Rate (strk/min)")),
        stroke_count: parse_u32(get("Strk Count")),
        dps: positive_f64(get("Avg DPS")),
        calories: parse_u32(get("Calories")),
        is_rest,
    })
}

/// Combine consecutive same-label rows into laps.
///
/// A label change (including into or out of no-label) closes the current
/// group; the trailing group flushes at end of input.
fn group_rows(rows: &[LengthRow]) -> Vec<WorkoutLap> {
    let mut laps: Vec<WorkoutLap> = Vec::new();
    let mut group: Vec<&LengthRow> = Vec::new();

    for row in rows {
        if let Some(first) = group.first() {
            if first.label != row.label {
                laps.push(combine_group(&group, laps.len()));
                group.clear();
            }
        }
        group.push(row);
    }

    if !group.is_empty() {
        laps.push(combine_group(&group, laps.len()));
    }

    laps
}

/// Combine one group of length rows into a single lap.
///
/// Distance, times and calories sum over every row (rest time belongs to
/// the set); HR/SWOLF/DPS/stroke-rate average only over non-rest rows with
/// a positive value, and stroke counts sum only over non-rest rows.
fn combine_group(rows: &[&LengthRow], index: usize) -> WorkoutLap {
    let distance_m: f64 = rows.iter().map(|row| row.distance_m).sum();
    let move_time: f64 = rows.iter().map(|row| row.move_time_s).sum();
    let rest_time: f64 = rows.iter().map(|row| row.rest_time_s).sum();
    let calories: u32 = rows.iter().map(|row| row.calories).sum();

    let mut lap = WorkoutLap::new(index, (move_time + rest_time).round() as u32, distance_m);
    lap.label = rows.first().and_then(|row| row.label.clone());
    lap.stroke_type = rows.first().map(|row| row.stroke.clone());
    lap.calories = Some(calories.min(u16::MAX as u32) as u16);

    let active: Vec<&&LengthRow> = rows.iter().filter(|row| !row.is_rest).collect();

    lap.avg_hr = mean_u8(active.iter().filter_map(|row| row.avg_hr));
    lap.max_hr = active.iter().filter_map(|row| row.max_hr).max();
    lap.swolf = mean_u16(active.iter().filter_map(|row| row.swolf));
    lap.stroke_rate = mean_u16(active.iter().filter_map(|row| row.stroke_rate));
    lap.distance_per_stroke = mean_f64(active.iter().filter_map(|row| row.dps));

    let strokes: u32 = active.iter().map(|row| row.stroke_count).sum();
    if strokes > 0 {
        lap.stroke_count = Some(strokes);
    }

    if move_time > 0.0 {
        let speed = distance_m / move_time;
        lap.avg_speed_mps = Some(speed);
        lap.pace = format::format_swim_pace(speed);
    }

    lap
}

/// Synthesize the session from CSV metadata and the built laps.
fn build_session(
    metadata: &HashMap<String, String>,
    rows: &[LengthRow],
    laps: &[WorkoutLap],
    offset: FixedOffset,
) -> WorkoutSession {
    let total_duration: u32 = laps.iter().map(|lap| lap.duration_seconds).sum();
    let total_distance: f64 = laps.iter().map(|lap| lap.distance_m).sum();

    let mut session = WorkoutSession::new(Sport::Swimming, total_duration, total_distance);

    session.name = Some(
        metadata
            .get("Swim Title")
            .cloned()
            .unwrap_or_else(|| "FORM Swim".to_string()),
    );
    session.pool_length_m = Some(
        metadata
            .get("Pool Size")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POOL_LENGTH_M),
    );
    session.start_time = parse_start_time(metadata, offset);

    let active_laps: Vec<&WorkoutLap> = laps.iter().filter(|lap| !lap.is_rest).collect();
    session.avg_hr = mean_u8(active_laps.iter().filter_map(|lap| lap.avg_hr));
    session.max_hr = active_laps.iter().filter_map(|lap| lap.max_hr).max();

    let calories: u32 = laps
        .iter()
        .filter_map(|lap| lap.calories.map(u32::from))
        .sum();
    if calories > 0 {
        session.calories = Some(calories.min(u16::MAX as u32) as u16);
    }

    let active_lengths = rows.iter().filter(|row| !row.is_rest).count();
    if active_lengths > 0 {
        session.num_active_lengths = Some(active_lengths.min(u16::MAX as usize) as u16);
    }

    session.swim_pace_per_100m =
        format::swim_pace_per_100m(total_distance, total_duration as f64);

    session
}

/// Parse `Swim Date` + `Swim Start Time` metadata into a localized start.
///
/// Best effort over the date layouts seen in the wild; `None` when nothing
/// matches.
fn parse_start_time(
    metadata: &HashMap<String, String>,
    offset: FixedOffset,
) -> Option<DateTime<FixedOffset>> {
    let date = metadata.get("Swim Date")?;
    let time = metadata.get("Swim Start Time")?;
    let combined = format!("{} {}", date, time);

    const LAYOUTS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%m/%d/%Y %I:%M:%S %p",
    ];

    LAYOUTS.iter().find_map(|layout| {
        NaiveDateTime::parse_from_str(&combined, layout)
            .ok()
            .and_then(|naive| naive.and_local_timezone(offset).single())
    })
}

fn parse_f64(value: &str) -> f64 {
    value.parse().unwrap_or(0.0)
}

fn parse_u32(value: &str) -> u32 {
    value.parse().unwrap_or(0)
}

fn positive_u8(value: &str) -> Option<u8> {
    value.parse::<u32>().ok().filter(|&v| v > 0).map(|v| v.min(u8::MAX as u32) as u8)
}

fn positive_u16(value: &str) -> Option<u16> {
    value
        .parse::<u32>()
        .ok()
        .filter(|&v| v > 0)
        .map(|v| v.min(u16::MAX as u32) as u16)
}

fn positive_f64(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|&v| v > 0.0)
}

fn mean_u8(values: impl Iterator<Item = u8>) -> Option<u8> {
    let collected: Vec<u32> = values.map(u32::from).collect();
    if collected.is_empty() {
        return None;
    }
    let mean = collected.iter().sum::<u32>() as f64 / collected.len() as f64;
    Some(mean.round() as u8)
}

fn mean_u16(values: impl Iterator<Item = u16>) -> Option<u16> {
    let collected: Vec<u32> = values.map(u32::from).collect();
    if collected.is_empty() {
        return None;
    }
    let mean = collected.iter().sum::<u32>() as f64 / collected.len() as f64;
    Some(mean.round() as u16)
}

fn mean_f64(values: impl Iterator<Item = f64>) -> Option<f64> {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        return None;
    }
    Some(collected.iter().sum::<f64>() / collected.len() as f64)
}
