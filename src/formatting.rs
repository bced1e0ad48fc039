//! Display formatting for race timers and history timestamps.

use chrono::{DateTime, Local, TimeZone};

/// Format milliseconds as `SS:CC` (seconds and centiseconds).
///
/// Used for race durations in the history list, e.g. `5230` -> `"05:23"`.
pub fn format_time(ms: f64) -> String {
    let ms = ms.max(0.0) as u64;
    let seconds = ms / 1000;
    let centiseconds = (ms % 1000) / 10;
    format!("{seconds:02}:{centiseconds:02}")
}

/// Format milliseconds as `MM:SS` for the live race clock.
pub fn format_race_timer(ms: f64) -> String {
    let ms = ms.max(0.0) as u64;
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    format!("{minutes:02}:{seconds:02}")
}

/// Format an epoch-millisecond instant as local `HH:MM:SS DD/MM/YYYY`.
pub fn format_timestamp(epoch_ms: f64) -> String {
    format_timestamp_in(epoch_ms, &Local)
}

/// [`format_timestamp`] in an explicit time zone.
pub fn format_timestamp_in<Tz: TimeZone>(epoch_ms: f64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp_millis(epoch_ms as i64) {
        Some(utc) => utc
            .with_timezone(tz)
            .format("%H:%M:%S %d/%m/%Y")
            .to_string(),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(5230.0), "05:23");
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(999.0), "00:99");
        assert_eq!(format_time(12_345.9), "12:34");
        assert_eq!(format_time(-40.0), "00:00");
    }

    #[test]
    fn test_format_race_timer() {
        assert_eq!(format_race_timer(0.0), "00:00");
        assert_eq!(format_race_timer(5_999.0), "00:05");
        assert_eq!(format_race_timer(61_000.0), "01:01");
        assert_eq!(format_race_timer(600_000.0), "10:00");
    }

    #[test]
    fn test_format_timestamp_utc() {
        // 2024-03-05T07:08:09Z
        let ms = 1_709_622_489_000.0;
        assert_eq!(format_timestamp_in(ms, &Utc), "07:08:09 05/03/2024");
    }

    #[test]
    fn test_format_timestamp_out_of_range() {
        assert_eq!(format_timestamp_in(f64::MAX, &Utc), "N/A");
    }
}
