//! Markdown report composer.
//!
//! Deterministic template rendering of the normalized model. Absent
//! optional fields are omitted, never rendered as placeholders, so two
//! sessions with the same data always produce byte-identical reports.

use crate::metrics::format;
use crate::model::{Sport, WorkoutLap, WorkoutSession};

/// Delimiter between the populated fields of a lap line.
const FIELD_DELIMITER: &str = " | ";

/// Render the full markdown report for a session and its laps.
pub fn compose_report(session: &WorkoutSession, laps: &[WorkoutLap]) -> String {
    let mut lines: Vec<String> = Vec::new();

    compose_header(&mut lines, session);
    compose_summary(&mut lines, session);
    compose_power_block(&mut lines, session);
    compose_balance_block(&mut lines, session);
    compose_cadence_block(&mut lines, session);
    compose_speed_block(&mut lines, session);
    compose_laps(&mut lines, session, laps);

    lines.join("\n")
}

fn compose_header(lines: &mut Vec<String>, session: &WorkoutSession) {
    let name = session
        .name
        .as_deref()
        .unwrap_or_else(|| session.sport.display_name());
    lines.push(format!(
        "# {} {}: {}",
        session.sport.emoji(),
        session.sport.display_name().to_uppercase(),
        name
    ));
    lines.push(String::new());

    if let Some(start) = session.start_time {
        lines.push(format!("**Date:** {}", start.format("%A, %B %d, %Y")));
        lines.push(format!("**Time:** {}", start.format("%H:%M")));
    }
    if let Some(pool) = session.pool_length_m {
        lines.push(format!("**Pool:** {}m", pool as u32));
    }
    if let Some(temp) = session.avg_temperature_c {
        lines.push(format!("**Temperature:** {}\u{B0}C", temp));
    }
    lines.push(String::new());
}

fn compose_summary(lines: &mut Vec<String>, session: &WorkoutSession) {
    lines.push("## Summary".to_string());
    lines.push(String::new());
    lines.push("| Metric | Value |".to_string());
    lines.push("|--------|-------|".to_string());

    push_row(
        lines,
        "Duration",
        Some(format::format_duration(session.total_duration_seconds)),
    );
    push_row(
        lines,
        "Distance",
        Some(format::format_distance(session.total_distance_m)),
    );

    match session.sport {
        Sport::Swimming => {
            push_row(lines, "Avg Pace", session.swim_pace_per_100m.clone());
            push_row(
                lines,
                "Lengths",
                session.num_active_lengths.map(|n| n.to_string()),
            );
        }
        Sport::Cycling => {
            push_row(
                lines,
                "Avg Speed",
                session
                    .avg_speed_mps
                    .and_then(format::format_speed_kmh)
                    .map(|s| format!("{} km/h", s)),
            );
        }
        _ => {
            push_row(
                lines,
                "Avg Pace",
                format::running_pace(
                    session.total_distance_m,
                    session.total_duration_seconds as f64,
                ),
            );
        }
    }

    push_row(lines, "Avg HR", session.avg_hr.map(|hr| format!("{} bpm", hr)));
    push_row(lines, "Max HR", session.max_hr.map(|hr| format!("{} bpm", hr)));
    push_row(
        lines,
        "Calories",
        session.calories.map(|c| format!("{} kcal", c)),
    );
    push_row(
        lines,
        "Training Effect",
        session.training_effect.map(|te| format!("{:.1}", te)),
    );
    push_row(
        lines,
        "VO2 Max",
        session.vo2_max.map(|v| format!("{} ml/kg/min", v)),
    );
    lines.push(String::new());
}

fn compose_power_block(lines: &mut Vec<String>, session: &WorkoutSession) {
    if session.sport != Sport::Cycling {
        return;
    }
    if session.avg_power.is_none() && session.max_power.is_none() {
        return;
    }

    lines.push("### Power".to_string());
    lines.push(String::new());
    lines.push("| Metric | Value |".to_string());
    lines.push("|--------|-------|".to_string());
    push_row(lines, "Avg Power", session.avg_power.map(|p| format!("{} W", p)));
    push_row(lines, "Max Power", session.max_power.map(|p| format!("{} W", p)));
    push_row(
        lines,
        "Normalized Power",
        session.normalized_power.map(|p| format!("{} W", p)),
    );
    push_row(
        lines,
        "Intensity Factor",
        session.intensity_factor.map(|f| format!("{:.2}", f)),
    );
    push_row(lines, "TSS", session.tss.map(|t| format!("{:.1}", t)));
    lines.push(String::new());
}

fn compose_balance_block(lines: &mut Vec<String>, session: &WorkoutSession) {
    if session.sport != Sport::Cycling {
        return;
    }
    let Some(left) = session.left_balance else {
        return;
    };

    let left_pct = left * 100.0;
    lines.push("### Balance".to_string());
    lines.push(String::new());
    lines.push(format!(
        "L {:.1}% / R {:.1}%",
        left_pct,
        100.0 - left_pct
    ));
    lines.push(String::new());
}

fn compose_cadence_block(lines: &mut Vec<String>, session: &WorkoutSession) {
    let Some(cadence) = session.avg_cadence else {
        return;
    };

    let unit = cadence_unit(session.sport);
    lines.push("### Cadence".to_string());
    lines.push(String::new());
    lines.push(format!("Avg Cadence: {} {}", cadence, unit));
    lines.push(String::new());
}

fn compose_speed_block(lines: &mut Vec<String>, session: &WorkoutSession) {
    if session.sport == Sport::Swimming {
        return;
    }

    let max_speed = session.max_speed_mps.and_then(format::format_speed_kmh);
    let has_elevation =
        session.elevation_gain_m.is_some() || session.total_descent_m.is_some();
    if max_speed.is_none() && !has_elevation {
        return;
    }

    lines.push("### Speed & Elevation".to_string());
    lines.push(String::new());
    lines.push("| Metric | Value |".to_string());
    lines.push("|--------|-------|".to_string());
    push_row(lines, "Max Speed", max_speed.map(|s| format!("{} km/h", s)));
    push_row(
        lines,
        "Elevation Gain",
        session.elevation_gain_m.map(|m| format!("{} m", m)),
    );
    push_row(
        lines,
        "Descent",
        session.total_descent_m.map(|m| format!("{} m", m)),
    );
    lines.push(String::new());
}

fn compose_laps(lines: &mut Vec<String>, session: &WorkoutSession, laps: &[WorkoutLap]) {
    if laps.is_empty() {
        return;
    }

    let heading = if session.sport == Sport::Swimming {
        "## Sets"
    } else {
        "## Laps"
    };
    lines.push(heading.to_string());
    lines.push(String::new());

    for lap in laps {
        lines.push(compose_lap_line(session.sport, lap));
        lines.push(String::new());
    }
}

/// Render one lap line: a bold prefix, then populated fields joined by the
/// fixed delimiter.
fn compose_lap_line(sport: Sport, lap: &WorkoutLap) -> String {
    let prefix = match &lap.label {
        Some(label) => format!("**{}:** ", label),
        None => {
            let noun = if sport == Sport::Swimming { "Set" } else { "Lap" };
            format!("**{} {}:** ", noun, lap.index + 1)
        }
    };

    let duration = format::format_duration(lap.duration_seconds);

    if lap.is_rest {
        return format!("{}**{}** Rest  ", prefix, duration);
    }

    let mut parts: Vec<String> = Vec::new();

    match sport {
        Sport::Swimming => {
            parts.push(format!(
                "**{}** in {}",
                format::format_distance(lap.distance_m),
                duration
            ));
            if let Some(pace) = &lap.pace {
                parts.push(format!("Pace {}/100m", pace));
            }
            if let Some(hr) = lap.avg_hr {
                parts.push(format!("HR {} avg", hr));
            }
            if let Some(swolf) = lap.swolf {
                parts.push(format!("SWOLF {}", swolf));
            }
            if let Some(strokes) = lap.stroke_count {
                parts.push(format!("Strokes {}", strokes));
            }
            if let Some(dps) = lap.distance_per_stroke {
                parts.push(format!("DPS {:.2}", dps));
            }
            if let Some(rate) = lap.stroke_rate {
                parts.push(format!("Rate {} strk/min", rate));
            }
            if let Some(stroke) = lap.stroke_type.as_deref().filter(|s| *s != "REST") {
                parts.push(format!("({})", stroke));
            }
        }
        Sport::Cycling => {
            match lap.avg_speed_mps.and_then(format::format_speed_kmh) {
                Some(speed) => parts.push(format!("**{}** \u{2014} {} km/h", duration, speed)),
                None => parts.push(format!("**{}**", duration)),
            }
            if let Some(hr) = lap.avg_hr {
                parts.push(format!("HR {} avg", hr));
            }
            if let Some(balance) = lap.left_balance_pct {
                parts.push(format!("Bal L {:.1}%", balance));
            }
            if let Some(cadence) = lap.avg_cadence {
                parts.push(format!("Cad {} rpm", cadence));
            }
        }
        _ => {
            match &lap.pace {
                Some(pace) => parts.push(format!("**{}** \u{2014} {}/km", duration, pace)),
                None => parts.push(format!("**{}**", duration)),
            }
            if let Some(hr) = lap.avg_hr {
                parts.push(format!("HR {}", hr));
            }
            if let Some(cadence) = lap.avg_cadence {
                parts.push(format!("Cad {} spm", cadence));
            }
        }
    }

    format!("{}{}  ", prefix, parts.join(FIELD_DELIMITER))
}

fn cadence_unit(sport: Sport) -> &'static str {
    match sport {
        Sport::Cycling => "rpm",
        _ => "spm",
    }
}

fn push_row(lines: &mut Vec<String>, label: &str, value: Option<String>) {
    if let Some(value) = value {
        lines.push(format!("| **{}** | {} |", label, value));
    }
}
