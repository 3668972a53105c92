//! Binary path: session extraction, lap aggregation and track building over
//! a decoded message stream.
//!
//! The stream is consumed in one pass; lap and record normalization run
//! afterwards because sport-conditional rules (pace flavor, cadence
//! doubling) need the session's sport, and session messages arrive last in
//! device order.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use crate::analyzer::AnalysisObserver;
use crate::ingest::{FitMessage, LapMessage, ParseError, RecordMessage, SessionMessage};
use crate::metrics::format;
use crate::model::{RecordPoint, Sport, WorkoutLap, WorkoutSession};

/// Laps shorter than this are GPS/pause artifacts and are discarded.
const MIN_LAP_SECONDS: f64 = 3.0;

/// Consume a decoded message stream and produce the normalized session,
/// laps and record track.
///
/// Fails with [`ParseError::NoData`] only when neither a session message
/// nor any retainable lap exists.
pub fn assemble(
    messages: &[FitMessage],
    offset: FixedOffset,
    observer: &dyn AnalysisObserver,
) -> Result<(WorkoutSession, Vec<WorkoutLap>, Vec<RecordPoint>), ParseError> {
    let mut session_msg: Option<&SessionMessage> = None;
    let mut lap_msgs: Vec<&LapMessage> = Vec::new();
    let mut record_msgs: Vec<&RecordMessage> = Vec::new();

    for message in messages {
        match message {
            FitMessage::Session(msg) => {
                // First session message wins; later duplicates are ignored
                if session_msg.is_none() {
                    session_msg = Some(msg);
                }
            }
            FitMessage::Lap(msg) => lap_msgs.push(msg),
            FitMessage::Record(msg) => record_msgs.push(msg),
        }
    }

    let sport = session_msg
        .and_then(|msg| msg.sport.as_deref())
        .map(Sport::from_code)
        .unwrap_or_default();

    let laps = build_laps(&lap_msgs, sport, offset, observer);

    let session = match session_msg {
        Some(msg) => extract_session(msg, offset),
        None => {
            if laps.is_empty() {
                return Err(ParseError::NoData);
            }
            observer.fallback_session(laps.len());
            synthesize_session(&laps)
        }
    };

    let start_epoch = session_msg.and_then(|msg| msg.start_time_epoch);
    let records = build_track(&record_msgs, start_epoch);

    Ok((session, laps, records))
}

/// Map the session-level message into the normalized session.
pub fn extract_session(msg: &SessionMessage, offset: FixedOffset) -> WorkoutSession {
    let sport = msg
        .sport
        .as_deref()
        .map(Sport::from_code)
        .unwrap_or_default();

    let duration_seconds = msg.total_elapsed_seconds.unwrap_or(0.0);
    let distance_m = msg.total_distance_m.unwrap_or(0.0);

    let mut session = WorkoutSession::new(sport, duration_seconds.round() as u32, distance_m);

    session.name = msg
        .name
        .clone()
        .or_else(|| Some(sport.display_name().to_string()));
    session.start_time = msg.start_time_epoch.map(|epoch| localize(epoch, offset));

    session.avg_hr = msg.avg_heart_rate;
    session.max_hr = msg.max_heart_rate;
    session.avg_power = msg.avg_power;
    session.max_power = msg.max_power;
    session.normalized_power = msg.normalized_power;
    session.intensity_factor = msg.intensity_factor;
    session.tss = msg.tss;
    session.calories = msg.total_calories;
    session.avg_cadence = msg.avg_cadence;
    session.elevation_gain_m = msg.total_ascent_m;
    session.total_descent_m = msg.total_descent_m;
    session.avg_speed_mps = msg.avg_speed_mps;
    session.max_speed_mps = msg.max_speed_mps;
    session.avg_gct_ms = msg.avg_gct_ms;
    session.avg_stride_length_m = msg.avg_stride_length_m;
    session.avg_temperature_c = msg.avg_temperature_c;
    session.training_effect = msg.training_effect;
    session.vo2_max = msg.vo2_max;
    session.pool_length_m = msg.pool_length_m;
    session.num_active_lengths = msg.num_active_lengths;

    // A raw balance of zero means "no balance data", not a 0/100 split
    session.left_balance = msg
        .left_right_balance
        .filter(|&raw| raw > 0.0)
        .map(|raw| (raw / 100.0) as f32);

    if sport == Sport::Swimming {
        session.swim_pace_per_100m = format::swim_pace_per_100m(distance_m, duration_seconds);
    }

    session
}

/// Synthesize a session when no session-level message exists.
///
/// Sums lap durations and distances, takes the simple (unweighted) mean of
/// per-lap average heart rates and the maximum of per-lap maximums. Sport
/// stays unknown: laps alone carry no sport code.
pub fn synthesize_session(laps: &[WorkoutLap]) -> WorkoutSession {
    let total_duration: u32 = laps.iter().map(|lap| lap.duration_seconds).sum();
    let total_distance: f64 = laps.iter().map(|lap| lap.distance_m).sum();

    let mut session = WorkoutSession::new(Sport::Unknown, total_duration, total_distance);

    let hr_values: Vec<u32> = laps.iter().filter_map(|lap| lap.avg_hr.map(u32::from)).collect();
    if !hr_values.is_empty() {
        let mean = hr_values.iter().sum::<u32>() as f64 / hr_values.len() as f64;
        session.avg_hr = Some(mean.round() as u8);
    }
    session.max_hr = laps.iter().filter_map(|lap| lap.max_hr).max();

    session
}

/// Build the ordered lap sequence from lap messages.
///
/// Laps shorter than three seconds are dropped and do not consume an
/// index, so retained indices stay gapless.
pub fn build_laps(
    lap_msgs: &[&LapMessage],
    sport: Sport,
    offset: FixedOffset,
    observer: &dyn AnalysisObserver,
) -> Vec<WorkoutLap> {
    let mut laps = Vec::new();

    for (original_index, msg) in lap_msgs.iter().enumerate() {
        if msg.total_elapsed_seconds < MIN_LAP_SECONDS {
            observer.lap_discarded(original_index, msg.total_elapsed_seconds);
            continue;
        }

        let mut lap = WorkoutLap::new(
            laps.len(),
            msg.total_elapsed_seconds.round() as u32,
            msg.total_distance_m,
        );

        lap.start_time = msg.start_time_epoch.map(|epoch| localize(epoch, offset));
        lap.avg_speed_mps = msg.avg_speed_mps;
        lap.max_speed_mps = msg.max_speed_mps;
        lap.avg_hr = msg.avg_heart_rate;
        lap.max_hr = msg.max_heart_rate;
        lap.calories = msg.total_calories;
        lap.total_ascent_m = msg.total_ascent_m;
        lap.total_descent_m = msg.total_descent_m;

        lap.pace = msg.avg_speed_mps.filter(|&s| s > 0.0).and_then(|speed| {
            if sport == Sport::Swimming {
                format::format_swim_pace(speed)
            } else {
                format::format_pace(speed)
            }
        });

        // Device running cadence is per-leg; steps per minute doubles it
        if sport == Sport::Running {
            lap.avg_cadence = msg.avg_cadence.map(|c| c * 2);
            lap.max_cadence = msg.max_cadence.map(|c| c * 2);
        } else {
            lap.avg_cadence = msg.avg_cadence;
            lap.max_cadence = msg.max_cadence;
        }

        if sport == Sport::Swimming {
            lap.stroke_type = msg.swim_stroke.clone();
            lap.stroke_count = msg.total_strokes;
            lap.stroke_rate = msg.avg_cadence;
            if let Some(strokes) = msg.total_strokes {
                if msg.num_active_lengths == Some(1) {
                    lap.swolf = Some(lap.duration_seconds as u16 + strokes as u16);
                }
                if strokes > 0 && msg.total_distance_m > 0.0 {
                    lap.distance_per_stroke = Some(msg.total_distance_m / strokes as f64);
                }
            }
        }

        if sport == Sport::Cycling {
            lap.left_balance_pct = msg.left_balance_pct;
        }

        laps.push(lap);
    }

    laps
}

/// Build the time-ordered record track.
///
/// The session start resolves once: the session message's start time when
/// available, else the first record's own timestamp. Elapsed times clamp to
/// zero when either side is missing.
pub fn build_track(record_msgs: &[&RecordMessage], start_epoch: Option<i64>) -> Vec<RecordPoint> {
    let resolved_start =
        start_epoch.or_else(|| record_msgs.iter().find_map(|msg| msg.timestamp_epoch));

    record_msgs
        .iter()
        .map(|msg| {
            let elapsed = match (msg.timestamp_epoch, resolved_start) {
                (Some(ts), Some(start)) => (ts - start).max(0) as u32,
                _ => 0,
            };

            let mut record = RecordPoint::new(elapsed);
            record.heart_rate = msg.heart_rate;
            record.power_watts = msg.power_watts;
            record.speed_mps = msg.speed_mps;
            record.cadence = msg.cadence;
            record.altitude_m = msg.altitude_m;
            record.latitude = msg.latitude;
            record.longitude = msg.longitude;
            record.distance_m = msg.distance_m;
            record
        })
        .collect()
}

fn localize(epoch: i64, offset: FixedOffset) -> DateTime<FixedOffset> {
    let utc: DateTime<Utc> = Utc.timestamp_opt(epoch, 0).single().unwrap_or_default();
    utc.with_timezone(&offset)
}
