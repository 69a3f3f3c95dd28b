//! Settlement window overlap arithmetic
//!
//! All durations are wall-clock differences in fractional hours, never
//! calendar-day counts.

use crate::constants::MS_PER_HOUR;
use chrono::{DateTime, Utc};

/// Fractional hours a stay was open within `[window_start, window_end)`.
///
/// A stay with `end = None` is still open and is clipped to the window end.
/// Stays entirely outside the window contribute zero.
pub fn overlap_hours(
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> f64 {
    let s = start.max(window_start);
    let e = end.unwrap_or(window_end).min(window_end);
    if e <= s {
        return 0.0;
    }
    (e - s).num_milliseconds() as f64 / MS_PER_HOUR
}

/// Fractional hours from `from` to `to`, clamped at zero.
pub fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let ms = (to - from).num_milliseconds();
    if ms <= 0 {
        return 0.0;
    }
    ms as f64 / MS_PER_HOUR
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, min, 0).unwrap()
    }

    #[test]
    fn partial_overlap_clips_to_window_start() {
        // stay [10:00, 11:00) against window [10:30, 11:30)
        let hours = overlap_hours(at(10, 0), Some(at(11, 0)), at(10, 30), at(11, 30));
        assert!((hours - 0.5).abs() < 1e-9);
    }

    #[test]
    fn open_stay_clips_to_window_end() {
        // stay [09:00, open) against window [10:00, 11:00)
        let hours = overlap_hours(at(9, 0), None, at(10, 0), at(11, 0));
        assert!((hours - 1.0).abs() < 1e-9);
    }

    #[test]
    fn stay_after_window_is_zero() {
        let hours = overlap_hours(at(12, 0), Some(at(13, 0)), at(10, 0), at(11, 0));
        assert_eq!(hours, 0.0);
    }

    #[test]
    fn stay_before_window_is_zero() {
        let hours = overlap_hours(at(7, 0), Some(at(8, 0)), at(10, 0), at(11, 0));
        assert_eq!(hours, 0.0);
    }

    #[test]
    fn hours_between_clamps_negative() {
        assert_eq!(hours_between(at(11, 0), at(10, 0)), 0.0);
        assert!((hours_between(at(10, 0), at(12, 30)) - 2.5).abs() < 1e-9);
    }
}
