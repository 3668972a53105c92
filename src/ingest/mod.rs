//! Ingest boundary: decoded message types and the two parse paths.
//!
//! The engine consumes *typed* messages; the raw FIT framing/CRC layer is the
//! decode adapter's job ([`decode`]). CSV exports arrive as text and go
//! straight through [`form_csv`].

pub mod decode;
pub mod fit;
pub mod form_csv;

use std::path::Path;
use thiserror::Error;

/// A decoded message from a binary workout capture.
///
/// The stream preserves device order; the binary path consumes it in a
/// single pass.
#[derive(Debug, Clone)]
pub enum FitMessage {
    /// Whole-activity summary message
    Session(SessionMessage),
    /// Per-lap summary message
    Lap(LapMessage),
    /// Per-sample record message
    Record(RecordMessage),
}

/// Session-level fields from the device.
///
/// Everything is optional: devices omit fields freely, and absent values must
/// stay distinguishable from zero.
#[derive(Debug, Clone, Default)]
pub struct SessionMessage {
    /// Activity name, when the device supplies one
    pub name: Option<String>,
    /// Sport code string, e.g. "running"
    pub sport: Option<String>,
    /// Session start as epoch seconds (UTC)
    pub start_time_epoch: Option<i64>,
    /// Total elapsed time in seconds
    pub total_elapsed_seconds: Option<f64>,
    /// Total distance in meters
    pub total_distance_m: Option<f64>,
    /// Average heart rate in BPM
    pub avg_heart_rate: Option<u8>,
    /// Maximum heart rate in BPM
    pub max_heart_rate: Option<u8>,
    /// Average power in watts
    pub avg_power: Option<u16>,
    /// Maximum power in watts
    pub max_power: Option<u16>,
    /// Normalized Power in watts
    pub normalized_power: Option<u16>,
    /// Intensity Factor
    pub intensity_factor: Option<f32>,
    /// Training Stress Score
    pub tss: Option<f32>,
    /// Total calories
    pub total_calories: Option<u16>,
    /// Average cadence (raw, per-leg for running)
    pub avg_cadence: Option<u16>,
    /// Left/right balance as a 0-100 percentage-like value (left side)
    pub left_right_balance: Option<f64>,
    /// Total ascent in meters
    pub total_ascent_m: Option<u16>,
    /// Total descent in meters
    pub total_descent_m: Option<u16>,
    /// Average speed in m/s
    pub avg_speed_mps: Option<f64>,
    /// Maximum speed in m/s
    pub max_speed_mps: Option<f64>,
    /// Average ground contact time in milliseconds
    pub avg_gct_ms: Option<f32>,
    /// Average stride length in meters
    pub avg_stride_length_m: Option<f32>,
    /// Average temperature in Celsius
    pub avg_temperature_c: Option<i8>,
    /// Aerobic training effect
    pub training_effect: Option<f32>,
    /// VO2 max estimate
    pub vo2_max: Option<f32>,
    /// Pool length in meters
    pub pool_length_m: Option<f64>,
    /// Number of active lengths
    pub num_active_lengths: Option<u16>,
}

/// Lap-level fields from the device.
#[derive(Debug, Clone, Default)]
pub struct LapMessage {
    /// Lap start as epoch seconds (UTC)
    pub start_time_epoch: Option<i64>,
    /// Total elapsed time in seconds
    pub total_elapsed_seconds: f64,
    /// Lap distance in meters
    pub total_distance_m: f64,
    /// Average speed in m/s (enhanced value when the device has one)
    pub avg_speed_mps: Option<f64>,
    /// Maximum speed in m/s
    pub max_speed_mps: Option<f64>,
    /// Average heart rate in BPM
    pub avg_heart_rate: Option<u8>,
    /// Maximum heart rate in BPM
    pub max_heart_rate: Option<u8>,
    /// Average cadence (raw, per-leg for running)
    pub avg_cadence: Option<u16>,
    /// Maximum cadence (raw)
    pub max_cadence: Option<u16>,
    /// Swim stroke type code
    pub swim_stroke: Option<String>,
    /// Total stroke count (total_cycles)
    pub total_strokes: Option<u32>,
    /// Number of active lengths in the lap
    pub num_active_lengths: Option<u16>,
    /// Calories burned in the lap
    pub total_calories: Option<u16>,
    /// Left/right balance, left percentage (already unmasked)
    pub left_balance_pct: Option<f32>,
    /// Total ascent in meters
    pub total_ascent_m: Option<u16>,
    /// Total descent in meters
    pub total_descent_m: Option<u16>,
}

/// Record-level (per-sample) fields from the device.
#[derive(Debug, Clone, Default)]
pub struct RecordMessage {
    /// Sample timestamp as epoch seconds (UTC)
    pub timestamp_epoch: Option<i64>,
    /// Heart rate in BPM
    pub heart_rate: Option<u8>,
    /// Power in watts
    pub power_watts: Option<f64>,
    /// Speed in m/s
    pub speed_mps: Option<f64>,
    /// Cadence in RPM/SPM
    pub cadence: Option<u16>,
    /// Altitude in meters
    pub altitude_m: Option<f64>,
    /// Latitude in decimal degrees
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees
    pub longitude: Option<f64>,
    /// Cumulative distance in meters
    pub distance_m: Option<f64>,
}

/// Errors that abort a parse.
///
/// Value-level problems (bad numeric tokens, short rows) are recovered
/// locally and never surface here; these variants are the structural and
/// semantic failures after which no usable result exists.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input has fewer lines than the format's fixed preamble requires
    #[error("input too short: {lines} lines, need at least {required}")]
    TooShort { lines: usize, required: usize },

    /// A required CSV column is missing from the header row
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// No session message and no laps could be produced
    #[error("no session or lap data found")]
    NoData,

    /// The byte buffer is not a decodable FIT file
    #[error("FIT decode error: {0}")]
    Decode(String),
}

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Binary device export
    Fit,
    /// Swim-goggle CSV export
    FormCsv,
}

/// Detect the input format from a file extension.
pub fn detect_format(path: &Path) -> Option<FileFormat> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "fit" => Some(FileFormat::Fit),
        "csv" => Some(FileFormat::FormCsv),
        _ => None,
    }
}
