//! FIT byte-buffer decode adapter.
//!
//! Turns a raw FIT export into the typed message stream the engine
//! consumes. All wire-format quirks live here: semicircle coordinates,
//! enhanced-field preference, the masked left/right balance encoding, and
//! the vendor-private VO2 max message.

use fitparser::profile::MesgNum;
use fitparser::{FitDataRecord, Value};

use crate::ingest::{FitMessage, LapMessage, ParseError, RecordMessage, SessionMessage};

/// Semicircles per degree: FIT stores positions as 32-bit semicircles.
const SEMICIRCLES_TO_DEGREES: f64 = 180.0 / 2_147_483_648.0;

/// Divisor mapping the vendor-private VO2 max raw value to ml/kg/min.
const VO2_MAX_DIVISOR: f64 = 18724.7;

/// Vendor-private message carrying the VO2 max estimate.
const VO2_MESSAGE_NUM: u16 = 140;
/// Field number of the raw VO2 max value inside that message.
const VO2_FIELD_NUM: u8 = 29;

/// Field number of the activity title string on the session message.
const SESSION_NAME_FIELD_NUM: u8 = 110;

/// Decode a FIT byte buffer into the typed message stream.
///
/// Fails only when the buffer is not a decodable FIT file; unknown
/// messages and fields are skipped.
pub fn decode_fit_bytes(bytes: &[u8]) -> Result<Vec<FitMessage>, ParseError> {
    let fit_data =
        fitparser::from_bytes(bytes).map_err(|e| ParseError::Decode(e.to_string()))?;

    let mut messages = Vec::new();
    let mut vo2_max: Option<f32> = None;

    for record in &fit_data {
        match record.kind() {
            MesgNum::Session => messages.push(FitMessage::Session(decode_session(record))),
            MesgNum::Lap => messages.push(FitMessage::Lap(decode_lap(record))),
            MesgNum::Record => messages.push(FitMessage::Record(decode_record(record))),
            MesgNum::UnknownVariant(VO2_MESSAGE_NUM) => {
                for field in record.fields() {
                    if field.number() == VO2_FIELD_NUM {
                        if let Some(raw) = value_to_f64(field.value()) {
                            let estimate = raw / VO2_MAX_DIVISOR;
                            vo2_max = Some(((estimate * 100.0).round() / 100.0) as f32);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    // The VO2 message sits outside the session; graft it on afterwards
    if let Some(vo2) = vo2_max {
        for message in &mut messages {
            if let FitMessage::Session(session) = message {
                session.vo2_max.get_or_insert(vo2);
            }
        }
    }

    Ok(messages)
}

/// Decode the masked left/right balance encoding.
///
/// The low 15 bits carry left percentage times 100; the high bit flags
/// right-side data. Zero means no balance data.
pub fn decode_balance(raw: u16) -> Option<f32> {
    let masked = raw & 0x7FFF;
    if masked == 0 {
        return None;
    }
    Some(masked as f32 / 100.0)
}

fn decode_session(record: &FitDataRecord) -> SessionMessage {
    let mut msg = SessionMessage::default();
    let mut avg_speed: Option<f64> = None;
    let mut enhanced_avg_speed: Option<f64> = None;
    let mut max_speed: Option<f64> = None;
    let mut enhanced_max_speed: Option<f64> = None;
    let mut avg_cadence: Option<u16> = None;
    let mut avg_running_cadence: Option<u16> = None;

    for field in record.fields() {
        let value = field.value();
        match field.name() {
            "sport" => {
                if let Value::String(sport) = value {
                    msg.sport = Some(sport.clone());
                }
            }
            "start_time" => {
                if let Value::Timestamp(ts) = value {
                    msg.start_time_epoch = Some(ts.timestamp());
                }
            }
            "total_elapsed_time" => msg.total_elapsed_seconds = value_to_f64(value),
            "total_distance" => msg.total_distance_m = value_to_f64(value),
            "avg_heart_rate" => msg.avg_heart_rate = value_to_u8(value),
            "max_heart_rate" => msg.max_heart_rate = value_to_u8(value),
            "avg_power" => msg.avg_power = value_to_u16(value),
            "max_power" => msg.max_power = value_to_u16(value),
            "normalized_power" => msg.normalized_power = value_to_u16(value),
            "intensity_factor" => msg.intensity_factor = value_to_f32(value),
            "training_stress_score" => msg.tss = value_to_f32(value),
            "total_calories" => msg.total_calories = value_to_u16(value),
            "avg_cadence" => avg_cadence = value_to_u16(value),
            "avg_running_cadence" => avg_running_cadence = value_to_u16(value),
            "left_right_balance" => {
                if let Some(raw) = value_to_f64(value) {
                    msg.left_right_balance =
                        decode_balance(raw as u16).map(|pct| pct as f64);
                }
            }
            "total_ascent" => msg.total_ascent_m = value_to_u16(value),
            "total_descent" => msg.total_descent_m = value_to_u16(value),
            "avg_speed" => avg_speed = value_to_f64(value),
            "enhanced_avg_speed" => enhanced_avg_speed = value_to_f64(value),
            "max_speed" => max_speed = value_to_f64(value),
            "enhanced_max_speed" => enhanced_max_speed = value_to_f64(value),
            "avg_stance_time" => msg.avg_gct_ms = value_to_f32(value),
            "avg_step_length" => {
                // Millimeters on the wire
                msg.avg_stride_length_m = value_to_f64(value).map(|mm| (mm / 1000.0) as f32);
            }
            "avg_temperature" => msg.avg_temperature_c = value_to_i8(value),
            "total_training_effect" => msg.training_effect = value_to_f32(value),
            "pool_length" => msg.pool_length_m = value_to_f64(value),
            "num_active_lengths" => msg.num_active_lengths = value_to_u16(value),
            _ => {
                if field.number() == SESSION_NAME_FIELD_NUM {
                    if let Value::String(name) = value {
                        msg.name = Some(name.clone());
                    }
                }
            }
        }
    }

    msg.avg_speed_mps = enhanced_avg_speed.or(avg_speed);
    msg.max_speed_mps = enhanced_max_speed.or(max_speed);
    msg.avg_cadence = avg_running_cadence.or(avg_cadence);
    msg
}

fn decode_lap(record: &FitDataRecord) -> LapMessage {
    let mut msg = LapMessage::default();
    let mut avg_speed: Option<f64> = None;
    let mut enhanced_avg_speed: Option<f64> = None;
    let mut max_speed: Option<f64> = None;
    let mut enhanced_max_speed: Option<f64> = None;
    let mut avg_cadence: Option<u16> = None;
    let mut avg_running_cadence: Option<u16> = None;
    let mut max_cadence: Option<u16> = None;
    let mut max_running_cadence: Option<u16> = None;
    let mut num_lengths: Option<u16> = None;

    for field in record.fields() {
        let value = field.value();
        match field.name() {
            "start_time" => {
                if let Value::Timestamp(ts) = value {
                    msg.start_time_epoch = Some(ts.timestamp());
                }
            }
            "total_elapsed_time" => {
                msg.total_elapsed_seconds = value_to_f64(value).unwrap_or(0.0);
            }
            "total_distance" => {
                msg.total_distance_m = value_to_f64(value).unwrap_or(0.0);
            }
            "avg_speed" => avg_speed = value_to_f64(value),
            "enhanced_avg_speed" => enhanced_avg_speed = value_to_f64(value),
            "max_speed" => max_speed = value_to_f64(value),
            "enhanced_max_speed" => enhanced_max_speed = value_to_f64(value),
            "avg_heart_rate" => msg.avg_heart_rate = value_to_u8(value),
            "max_heart_rate" => msg.max_heart_rate = value_to_u8(value),
            "avg_cadence" => avg_cadence = value_to_u16(value),
            "avg_running_cadence" => avg_running_cadence = value_to_u16(value),
            "max_cadence" => max_cadence = value_to_u16(value),
            "max_running_cadence" => max_running_cadence = value_to_u16(value),
            "swim_stroke" => {
                if let Value::String(stroke) = value {
                    msg.swim_stroke = Some(stroke.clone());
                }
            }
            "total_cycles" => msg.total_strokes = value_to_u32(value),
            "num_active_lengths" => msg.num_active_lengths = value_to_u16(value),
            "num_lengths" => num_lengths = value_to_u16(value),
            "total_calories" => msg.total_calories = value_to_u16(value),
            "left_right_balance" => {
                if let Some(raw) = value_to_f64(value) {
                    msg.left_balance_pct = decode_balance(raw as u16);
                }
            }
            "total_ascent" => msg.total_ascent_m = value_to_u16(value),
            "total_descent" => msg.total_descent_m = value_to_u16(value),
            _ => {}
        }
    }

    msg.avg_speed_mps = enhanced_avg_speed.or(avg_speed);
    msg.max_speed_mps = enhanced_max_speed.or(max_speed);
    msg.avg_cadence = avg_running_cadence.or(avg_cadence);
    msg.max_cadence = max_running_cadence.or(max_cadence);
    if msg.num_active_lengths.is_none() {
        msg.num_active_lengths = num_lengths;
    }
    msg
}

fn decode_record(record: &FitDataRecord) -> RecordMessage {
    let mut msg = RecordMessage::default();
    let mut speed: Option<f64> = None;
    let mut enhanced_speed: Option<f64> = None;
    let mut altitude: Option<f64> = None;
    let mut enhanced_altitude: Option<f64> = None;

    for field in record.fields() {
        let value = field.value();
        match field.name() {
            "timestamp" => {
                if let Value::Timestamp(ts) = value {
                    msg.timestamp_epoch = Some(ts.timestamp());
                }
            }
            "heart_rate" => msg.heart_rate = value_to_u8(value),
            "power" => msg.power_watts = value_to_f64(value),
            "speed" => speed = value_to_f64(value),
            "enhanced_speed" => enhanced_speed = value_to_f64(value),
            "cadence" => msg.cadence = value_to_u16(value),
            "altitude" => altitude = value_to_f64(value),
            "enhanced_altitude" => enhanced_altitude = value_to_f64(value),
            "position_lat" => {
                if let Value::SInt32(v) = value {
                    msg.latitude = Some(*v as f64 * SEMICIRCLES_TO_DEGREES);
                }
            }
            "position_long" => {
                if let Value::SInt32(v) = value {
                    msg.longitude = Some(*v as f64 * SEMICIRCLES_TO_DEGREES);
                }
            }
            "distance" => msg.distance_m = value_to_f64(value),
            _ => {}
        }
    }

    msg.speed_mps = enhanced_speed.or(speed);
    msg.altitude_m = enhanced_altitude.or(altitude);
    msg
}

/// Coerce any numeric FIT value to f64.
fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Float32(v) => Some(*v as f64),
        Value::Float64(v) => Some(*v),
        Value::SInt8(v) => Some(*v as f64),
        Value::UInt8(v) => Some(*v as f64),
        Value::UInt8z(v) => Some(*v as f64),
        Value::SInt16(v) => Some(*v as f64),
        Value::UInt16(v) => Some(*v as f64),
        Value::UInt16z(v) => Some(*v as f64),
        Value::SInt32(v) => Some(*v as f64),
        Value::UInt32(v) => Some(*v as f64),
        Value::UInt32z(v) => Some(*v as f64),
        Value::SInt64(v) => Some(*v as f64),
        Value::UInt64(v) => Some(*v as f64),
        Value::UInt64z(v) => Some(*v as f64),
        Value::Byte(v) => Some(*v as f64),
        Value::Array(values) => values.iter().find_map(value_to_f64),
        _ => None,
    }
}

fn value_to_u8(value: &Value) -> Option<u8> {
    value_to_f64(value).filter(|&v| v >= 0.0).map(|v| v.min(u8::MAX as f64) as u8)
}

fn value_to_u16(value: &Value) -> Option<u16> {
    value_to_f64(value)
        .filter(|&v| v >= 0.0)
        .map(|v| v.min(u16::MAX as f64) as u16)
}

fn value_to_u32(value: &Value) -> Option<u32> {
    value_to_f64(value)
        .filter(|&v| v >= 0.0)
        .map(|v| v.min(u32::MAX as f64) as u32)
}

fn value_to_i8(value: &Value) -> Option<i8> {
    value_to_f64(value)
        .map(|v| v.clamp(i8::MIN as f64, i8::MAX as f64) as i8)
}

fn value_to_f32(value: &Value) -> Option<f32> {
    value_to_f64(value).map(|v| v as f32)
}
