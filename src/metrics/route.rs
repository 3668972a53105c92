//! Heart-rate coloring inputs for GPS route rendering.
//!
//! The renderer picks a point on a two-color gradient per route segment;
//! this module computes the interpolation ratio for each adjacent pair of
//! GPS-carrying records. Rendering itself is an external concern.

use crate::model::RecordPoint;

/// The neutral midpoint ratio used when no HR signal can grade a segment.
pub const NEUTRAL_RATIO: f32 = 0.5;

/// One route segment between two adjacent GPS points.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSegment {
    /// Start position (latitude, longitude)
    pub start: (f64, f64),
    /// End position (latitude, longitude)
    pub end: (f64, f64),
    /// Gradient interpolation ratio in [0, 1]; 0.5 when neutral
    pub intensity: f32,
}

/// Build color-gradient segments from the record track.
///
/// The ratio is `(hr - min) / (max - min)` over the HR range of the
/// GPS-carrying records. A zero-width HR range, or a segment without any HR
/// sample, yields the neutral 0.5 ratio rather than failing.
pub fn hr_color_segments(records: &[RecordPoint]) -> Vec<RouteSegment> {
    let gps_points: Vec<&RecordPoint> = records.iter().filter(|r| r.has_gps()).collect();
    if gps_points.len() < 2 {
        return Vec::new();
    }

    let hr_values: Vec<u8> = gps_points.iter().filter_map(|r| r.heart_rate).collect();
    let range = match (hr_values.iter().min(), hr_values.iter().max()) {
        (Some(&min), Some(&max)) if max > min => Some((min as f32, max as f32)),
        _ => None,
    };

    gps_points
        .windows(2)
        .map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            // Grade by the segment's end sample, falling back to its start
            let hr = b.heart_rate.or(a.heart_rate);
            let intensity = match (hr, range) {
                (Some(hr), Some((min, max))) => ((hr as f32 - min) / (max - min)).clamp(0.0, 1.0),
                _ => NEUTRAL_RATIO,
            };
            RouteSegment {
                // has_gps() guarantees both coordinates
                start: (a.latitude.unwrap_or(0.0), a.longitude.unwrap_or(0.0)),
                end: (b.latitude.unwrap_or(0.0), b.longitude.unwrap_or(0.0)),
                intensity,
            }
        })
        .collect()
}
