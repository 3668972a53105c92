//! Normalized workout domain model.
//!
//! All entities here are plain values: they are built once during a single
//! parse pass, owned by the [`WorkoutAnalysis`] that contains them, and never
//! mutated afterwards. Callers serialize them (JSON via serde) at the
//! boundary; nothing is ever read back in.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Sport detected for a workout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    /// Running (outdoor or treadmill)
    Running,
    /// Cycling (outdoor or trainer)
    Cycling,
    /// Swimming (pool or open water)
    Swimming,
    /// Anything else, or no sport information available
    #[default]
    Unknown,
}

impl Sport {
    /// Map a device sport code to the sport enum.
    ///
    /// Unrecognized codes map to [`Sport::Unknown`]; this is a closed lookup
    /// and never fails.
    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_lowercase().as_str() {
            "running" => Sport::Running,
            "cycling" => Sport::Cycling,
            "swimming" => Sport::Swimming,
            _ => Sport::Unknown,
        }
    }

    /// Human-readable sport name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Sport::Running => "Running",
            Sport::Cycling => "Cycling",
            Sport::Swimming => "Swimming",
            Sport::Unknown => "Activity",
        }
    }

    /// Emoji used in report headers.
    pub fn emoji(&self) -> &'static str {
        match self {
            Sport::Running => "\u{1F3C3}",
            Sport::Cycling => "\u{1F6B4}",
            Sport::Swimming => "\u{1F3CA}",
            Sport::Unknown => "\u{1F4CA}",
        }
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A single time-stamped sample from the device track.
///
/// Absent fields stay `None` rather than defaulting to zero, so downstream
/// charting can tell "no data" from "zero value".
#[derive(Debug, Clone, Serialize)]
pub struct RecordPoint {
    /// Seconds since session start (clamped to zero, never negative)
    pub elapsed_seconds: u32,
    /// Heart rate in BPM
    pub heart_rate: Option<u8>,
    /// Power in watts
    pub power_watts: Option<f64>,
    /// Speed in m/s
    pub speed_mps: Option<f64>,
    /// Cadence in RPM (cycling) or SPM (running/swimming)
    pub cadence: Option<u16>,
    /// Altitude in meters
    pub altitude_m: Option<f64>,
    /// GPS latitude in decimal degrees
    pub latitude: Option<f64>,
    /// GPS longitude in decimal degrees
    pub longitude: Option<f64>,
    /// Cumulative distance in meters
    pub distance_m: Option<f64>,
}

impl RecordPoint {
    /// Create an empty record at the given elapsed time.
    pub fn new(elapsed_seconds: u32) -> Self {
        Self {
            elapsed_seconds,
            heart_rate: None,
            power_watts: None,
            speed_mps: None,
            cadence: None,
            altitude_m: None,
            latitude: None,
            longitude: None,
            distance_m: None,
        }
    }

    /// True iff both latitude and longitude are present.
    pub fn has_gps(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// One lap (binary export) or one aggregated set (CSV export).
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutLap {
    /// 0-based ordinal over retained laps; gapless even when laps are filtered
    pub index: usize,
    /// Human label (CSV set description); absent for binary laps
    pub label: Option<String>,
    /// Lap start time, localized per analyzer options
    pub start_time: Option<DateTime<FixedOffset>>,
    /// Total lap duration in seconds (move + rest for CSV sets)
    pub duration_seconds: u32,
    /// Lap distance in meters
    pub distance_m: f64,
    /// Average speed in m/s
    pub avg_speed_mps: Option<f64>,
    /// Maximum speed in m/s
    pub max_speed_mps: Option<f64>,
    /// Average heart rate in BPM
    pub avg_hr: Option<u8>,
    /// Maximum heart rate in BPM
    pub max_hr: Option<u8>,
    /// Formatted pace (`M:SS`, per km for land sports, per 100m for swims)
    pub pace: Option<String>,
    /// Average cadence (steps/min for running, already doubled)
    pub avg_cadence: Option<u16>,
    /// Maximum cadence
    pub max_cadence: Option<u16>,
    /// SWOLF score (swim efficiency; lower is better)
    pub swolf: Option<u16>,
    /// Total stroke count (swim)
    pub stroke_count: Option<u32>,
    /// Average distance per stroke in meters (swim)
    pub distance_per_stroke: Option<f64>,
    /// Average stroke rate in strokes/min (swim)
    pub stroke_rate: Option<u16>,
    /// Stroke type code (swim), e.g. "FR" or "freestyle"
    pub stroke_type: Option<String>,
    /// Total ascent in meters
    pub total_ascent_m: Option<u16>,
    /// Total descent in meters
    pub total_descent_m: Option<u16>,
    /// Left/right power balance, left percentage (cycling)
    pub left_balance_pct: Option<f32>,
    /// True iff the lap covered zero distance
    pub is_rest: bool,
    /// Calories burned during the lap
    pub calories: Option<u16>,
}

impl WorkoutLap {
    /// Create a lap with the required fields; optional metrics start unset.
    pub fn new(index: usize, duration_seconds: u32, distance_m: f64) -> Self {
        Self {
            index,
            label: None,
            start_time: None,
            duration_seconds,
            distance_m,
            avg_speed_mps: None,
            max_speed_mps: None,
            avg_hr: None,
            max_hr: None,
            pace: None,
            avg_cadence: None,
            max_cadence: None,
            swolf: None,
            stroke_count: None,
            distance_per_stroke: None,
            stroke_rate: None,
            stroke_type: None,
            total_ascent_m: None,
            total_descent_m: None,
            left_balance_pct: None,
            is_rest: distance_m == 0.0,
            calories: None,
        }
    }
}

/// Whole-activity summary.
///
/// Only `sport`, `total_duration_seconds` and `total_distance_m` are always
/// meaningful; every other field stays unset when the source or the detected
/// sport does not supply it.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutSession {
    /// Activity name from the device, or the sport display name
    pub name: Option<String>,
    /// Detected sport
    pub sport: Sport,
    /// Session start, localized per analyzer options
    pub start_time: Option<DateTime<FixedOffset>>,
    /// Total elapsed duration in seconds
    pub total_duration_seconds: u32,
    /// Total distance in meters
    pub total_distance_m: f64,
    /// Average heart rate in BPM
    pub avg_hr: Option<u8>,
    /// Maximum heart rate in BPM
    pub max_hr: Option<u8>,
    /// Average power in watts
    pub avg_power: Option<u16>,
    /// Maximum power in watts
    pub max_power: Option<u16>,
    /// Normalized Power (device value, or computed from records)
    pub normalized_power: Option<u16>,
    /// Intensity Factor (NP / FTP), device value
    pub intensity_factor: Option<f32>,
    /// Training Stress Score, device value
    pub tss: Option<f32>,
    /// Total calories burned
    pub calories: Option<u16>,
    /// Average cadence
    pub avg_cadence: Option<u16>,
    /// Left power fraction in [0, 1] for dual-sided meters
    pub left_balance: Option<f32>,
    /// Total elevation gain in meters
    pub elevation_gain_m: Option<u16>,
    /// Total descent in meters
    pub total_descent_m: Option<u16>,
    /// Average speed in m/s
    pub avg_speed_mps: Option<f64>,
    /// Maximum speed in m/s
    pub max_speed_mps: Option<f64>,
    /// Average ground contact time in milliseconds (running dynamics)
    pub avg_gct_ms: Option<f32>,
    /// Average stride length in meters (running dynamics)
    pub avg_stride_length_m: Option<f32>,
    /// Average temperature in Celsius
    pub avg_temperature_c: Option<i8>,
    /// Aerobic training effect score
    pub training_effect: Option<f32>,
    /// VO2 max estimate in ml/kg/min
    pub vo2_max: Option<f32>,
    /// Pool length in meters (swim)
    pub pool_length_m: Option<f64>,
    /// Number of active (non-rest) lengths (swim)
    pub num_active_lengths: Option<u16>,
    /// Formatted pace per 100m (`M:SS/100m`, swim only)
    pub swim_pace_per_100m: Option<String>,
}

impl WorkoutSession {
    /// Create a session with the required fields; optional metrics start unset.
    pub fn new(sport: Sport, total_duration_seconds: u32, total_distance_m: f64) -> Self {
        Self {
            name: None,
            sport,
            start_time: None,
            total_duration_seconds,
            total_distance_m,
            avg_hr: None,
            max_hr: None,
            avg_power: None,
            max_power: None,
            normalized_power: None,
            intensity_factor: None,
            tss: None,
            calories: None,
            avg_cadence: None,
            left_balance: None,
            elevation_gain_m: None,
            total_descent_m: None,
            avg_speed_mps: None,
            max_speed_mps: None,
            avg_gct_ms: None,
            avg_stride_length_m: None,
            avg_temperature_c: None,
            training_effect: None,
            vo2_max: None,
            pool_length_m: None,
            num_active_lengths: None,
            swim_pace_per_100m: None,
        }
    }
}

/// Root analysis result: the only artifact handed to external collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutAnalysis {
    /// Unique identifier for history/export collaborators
    pub id: Uuid,
    /// Whole-activity summary
    pub session: WorkoutSession,
    /// Ordered laps/sets
    pub laps: Vec<WorkoutLap>,
    /// Ordered per-sample track (empty for CSV exports)
    pub records: Vec<RecordPoint>,
    /// When the analysis ran
    pub analyzed_at: DateTime<Utc>,
    /// Composed markdown report, when enabled
    pub report: Option<String>,
}

impl WorkoutAnalysis {
    /// Assemble an analysis result around a session and its laps/records.
    pub fn new(session: WorkoutSession, laps: Vec<WorkoutLap>, records: Vec<RecordPoint>) -> Self {
        Self {
            id: Uuid::new_v4(),
            session,
            laps,
            records,
            analyzed_at: Utc::now(),
            report: None,
        }
    }

    /// True iff at least one record carries a GPS position.
    pub fn has_gps_data(&self) -> bool {
        self.records.iter().any(RecordPoint::has_gps)
    }
}
