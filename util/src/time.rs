//! General time utility functions

use chrono;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

/// Convert a cycle frequency into the cycle period.
///
/// Returns `None` if the frequency is not strictly positive and finite.
pub fn frequency_to_period(frequency_hz: f64) -> Option<std::time::Duration> {
    if frequency_hz.is_finite() && frequency_hz > 0.0 {
        Some(std::time::Duration::from_secs_f64(1.0 / frequency_hz))
    }
    else {
        None
    }
}
