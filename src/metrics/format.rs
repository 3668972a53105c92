//! Duration, distance, pace and speed formatting, plus clock-time parsing.

/// Format a duration in seconds as `M:SS`, or `H:MM:SS` from one hour up.
pub fn format_duration(seconds: u32) -> String {
    if seconds < 3600 {
        format!("{}:{:02}", seconds / 60, seconds % 60)
    } else {
        let hours = seconds / 3600;
        let mins = (seconds % 3600) / 60;
        let secs = seconds % 60;
        format!("{}:{:02}:{:02}", hours, mins, secs)
    }
}

/// Format a distance in meters: kilometers to two decimals from 1000 m up,
/// whole meters below.
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.2} km", meters / 1000.0)
    } else {
        format!("{}m", meters as u32)
    }
}

/// Convert speed (m/s) to running pace (`M:SS` per km).
///
/// Returns `None` for non-positive speeds.
pub fn format_pace(speed_mps: f64) -> Option<String> {
    if speed_mps <= 0.0 {
        return None;
    }
    let pace_sec_per_km = 1000.0 / speed_mps;
    Some(format_pace_seconds(pace_sec_per_km))
}

/// Convert speed (m/s) to swim pace (`M:SS` per 100m).
///
/// Returns `None` for non-positive speeds.
pub fn format_swim_pace(speed_mps: f64) -> Option<String> {
    if speed_mps <= 0.0 {
        return None;
    }
    let pace_sec_per_100m = 100.0 / speed_mps;
    Some(format_pace_seconds(pace_sec_per_100m))
}

/// Convert speed (m/s) to km/h with one decimal.
///
/// Returns `None` for non-positive speeds.
pub fn format_speed_kmh(speed_mps: f64) -> Option<String> {
    if speed_mps <= 0.0 {
        return None;
    }
    Some(format!("{:.1}", speed_mps * 3.6))
}

/// Running pace over a whole distance/duration, with unit suffix: `M:SS/km`.
pub fn running_pace(distance_m: f64, duration_seconds: f64) -> Option<String> {
    if distance_m <= 0.0 || duration_seconds <= 0.0 {
        return None;
    }
    format_pace(distance_m / duration_seconds).map(|p| format!("{}/km", p))
}

/// Swim pace per 100m over a whole distance/duration, with unit suffix:
/// `M:SS/100m`. Seconds are rounded, not truncated.
pub fn swim_pace_per_100m(distance_m: f64, duration_seconds: f64) -> Option<String> {
    if distance_m <= 0.0 || duration_seconds <= 0.0 {
        return None;
    }
    let total = (duration_seconds / (distance_m / 100.0)).round() as u32;
    Some(format!("{}:{:02}/100m", total / 60, total % 60))
}

/// Format a pace given in seconds-per-unit as `M:SS` (seconds truncated).
fn format_pace_seconds(pace_seconds: f64) -> String {
    let minutes = (pace_seconds / 60.0) as u32;
    let seconds = (pace_seconds % 60.0) as u32;
    format!("{}:{:02}", minutes, seconds)
}

/// Parse a clock-time token (`M:SS.ff` or `H:MM:SS.ff`) into seconds.
///
/// Malformed tokens, empty strings and the `0:00.00` placeholder all parse
/// to zero; a bad time in one row must not abort the file.
pub fn parse_clock_time(token: &str) -> f64 {
    let token = token.trim();
    if token.is_empty() || token == "0:00.00" {
        return 0.0;
    }

    fn parse_parts(parts: &[&str]) -> Option<f64> {
        match parts {
            [mins, secs] => {
                let m: f64 = mins.parse().ok()?;
                let s: f64 = secs.parse().ok()?;
                Some(m * 60.0 + s)
            }
            [hours, mins, secs] => {
                let h: f64 = hours.parse().ok()?;
                let m: f64 = mins.parse().ok()?;
                let s: f64 = secs.parse().ok()?;
                Some(h * 3600.0 + m * 60.0 + s)
            }
            _ => None,
        }
    }

    let parts: Vec<&str> = token.split(':').collect();
    parse_parts(&parts).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_under_one_hour() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(3599), "59:59");
    }

    #[test]
    fn test_format_duration_over_one_hour() {
        assert_eq!(format_duration(3600), "1:00:00");
        assert_eq!(format_duration(3725), "1:02:05");
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(750.0), "750m");
        assert_eq!(format_distance(1000.0), "1.00 km");
        assert_eq!(format_distance(12345.0), "12.35 km");
    }

    #[test]
    fn test_format_pace() {
        // 5000 m in 1500 s = 3.333 m/s = 5:00/km
        assert_eq!(format_pace(5000.0 / 1500.0).as_deref(), Some("5:00"));
        assert_eq!(format_pace(0.0), None);
        assert_eq!(format_pace(-1.0), None);
    }

    #[test]
    fn test_running_pace_with_unit() {
        assert_eq!(running_pace(5000.0, 1500.0).as_deref(), Some("5:00/km"));
        assert_eq!(running_pace(0.0, 1500.0), None);
    }

    #[test]
    fn test_format_swim_pace() {
        // 1.0 m/s = 1:40 per 100m
        assert_eq!(format_swim_pace(1.0).as_deref(), Some("1:40"));
        assert_eq!(format_swim_pace(0.0), None);
    }

    #[test]
    fn test_swim_pace_per_100m_rounds() {
        // 1500 m in 2400 s -> 160 s/100m
        assert_eq!(
            swim_pace_per_100m(1500.0, 2400.0).as_deref(),
            Some("2:40/100m")
        );
        // 100 m in 99.6 s rounds up to 1:40
        assert_eq!(
            swim_pace_per_100m(100.0, 99.6).as_deref(),
            Some("1:40/100m")
        );
    }

    #[test]
    fn test_format_speed_kmh() {
        assert_eq!(format_speed_kmh(10.0).as_deref(), Some("36.0"));
        assert_eq!(format_speed_kmh(0.0), None);
    }

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(parse_clock_time("2:05.30"), 125.3);
        assert_eq!(parse_clock_time("0:00.00"), 0.0);
        assert_eq!(parse_clock_time(""), 0.0);
        assert_eq!(parse_clock_time("1:02:03.50"), 3723.5);
        assert_eq!(parse_clock_time("garbage"), 0.0);
        assert_eq!(parse_clock_time("1:xx.0"), 0.0);
    }
}
