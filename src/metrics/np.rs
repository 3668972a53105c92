//! Normalized Power fallback computation.
//!
//! Used when the device session message carries no NP but the track has
//! power samples. NP = 4th root of the average of (30-sample rolling
//! average power)^4.

use crate::model::RecordPoint;
use std::collections::VecDeque;

/// Rolling average over a fixed sample window.
#[derive(Debug)]
pub struct RollingAverage {
    /// Buffer of recent values
    buffer: VecDeque<f64>,
    /// Window size in samples
    window_size: usize,
    /// Running sum for efficient calculation
    sum: f64,
}

impl RollingAverage {
    /// Create a new rolling average with the given window size.
    pub fn new(window_size: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(window_size),
            window_size,
            sum: 0.0,
        }
    }

    /// Create the 30-sample window used for Normalized Power.
    pub fn thirty_second() -> Self {
        Self::new(30)
    }

    /// Add a new value and return the current average.
    pub fn add(&mut self, value: f64) -> Option<f64> {
        self.buffer.push_back(value);
        self.sum += value;

        if self.buffer.len() > self.window_size {
            if let Some(old) = self.buffer.pop_front() {
                self.sum -= old;
            }
        }

        self.average()
    }

    /// Get the current average without adding a value.
    pub fn average(&self) -> Option<f64> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.sum / self.buffer.len() as f64)
        }
    }

    /// Check if the window has filled with samples.
    pub fn is_full(&self) -> bool {
        self.buffer.len() >= self.window_size
    }
}

/// Incremental Normalized Power calculator.
#[derive(Debug)]
pub struct NormalizedPowerCalculator {
    /// 30-sample rolling average
    rolling_avg: RollingAverage,
    /// Sum of 4th powers of the rolling averages
    sum_fourth_power: f64,
    /// Count of full-window samples
    count: u32,
}

impl NormalizedPowerCalculator {
    /// Create a new Normalized Power calculator.
    pub fn new() -> Self {
        Self {
            rolling_avg: RollingAverage::thirty_second(),
            sum_fourth_power: 0.0,
            count: 0,
        }
    }

    /// Add a power sample and return the current NP.
    pub fn add(&mut self, power_watts: f64) -> Option<u16> {
        if let Some(avg) = self.rolling_avg.add(power_watts) {
            // Only count once the 30-sample window is full; a shorter
            // window would skew NP low on short files
            if self.rolling_avg.is_full() {
                self.sum_fourth_power += avg.powi(4);
                self.count += 1;
            }
        }

        self.normalized_power()
    }

    /// Get the current Normalized Power.
    pub fn normalized_power(&self) -> Option<u16> {
        if self.count == 0 {
            return None;
        }

        let avg_fourth_power = self.sum_fourth_power / self.count as f64;
        Some(avg_fourth_power.powf(0.25).round() as u16)
    }
}

impl Default for NormalizedPowerCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute Normalized Power from a record track.
///
/// Returns `None` when fewer than 30 power samples exist.
pub fn normalized_power(records: &[RecordPoint]) -> Option<u16> {
    let mut calc = NormalizedPowerCalculator::new();
    for record in records {
        if let Some(power) = record.power_watts {
            calc.add(power);
        }
    }
    calc.normalized_power()
}
