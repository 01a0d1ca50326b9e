/// Utility functions for formatting readings, timestamps and durations
use time::{format_description, OffsetDateTime};

/// Format a timestamp for human-readable logging
///
/// Converts an OffsetDateTime to DD.MM.YYYY - HH:MM:SS format
/// Falls back to default string representation if formatting fails.
pub fn format_datetime(dt: &OffsetDateTime) -> String {
    format_with(dt, "[day].[month].[year] - [hour]:[minute]:[second]")
}

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS` for storage rows.
pub fn format_iso9075(dt: &OffsetDateTime) -> String {
    format_with(dt, "[year]-[month]-[day] [hour]:[minute]:[second]")
}

fn format_with(dt: &OffsetDateTime, description: &str) -> String {
    match format_description::parse(description) {
        Ok(format) => dt.format(&format).unwrap_or_else(|_| dt.to_string()),
        Err(_) => dt.to_string(),
    }
}

/// Convert a time::Duration to seconds as u64
///
/// Negative durations clamp to zero.
pub fn duration_to_seconds(duration: time::Duration) -> u64 {
    duration.whole_seconds().max(0) as u64
}

/// Render a duration as `1h 2m 3s`, dropping leading zero units.
pub fn format_duration(duration: time::Duration) -> String {
    let total = duration_to_seconds(duration);
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Round to two decimal places, as shown on the display and in alerts.
pub fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Render a statistic, showing `-` for unseeded sentinels.
pub fn format_stat(value: f32) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        "-".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn formats_durations_compactly() {
        assert_eq!(format_duration(time::Duration::seconds(42)), "42s");
        assert_eq!(format_duration(time::Duration::seconds(125)), "2m 5s");
        assert_eq!(format_duration(time::Duration::seconds(3723)), "1h 2m 3s");
        assert_eq!(format_duration(time::Duration::seconds(-5)), "0s");
    }

    #[test]
    fn converts_celsius() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(round2(21.23456), 21.23);
    }

    #[test]
    fn formats_timestamps() {
        let dt = datetime!(2024-03-09 07:05:01 UTC);
        assert_eq!(format_iso9075(&dt), "2024-03-09 07:05:01");
        assert_eq!(format_datetime(&dt), "09.03.2024 - 07:05:01");
    }

    #[test]
    fn unseeded_stats_render_as_dash() {
        assert_eq!(format_stat(f32::INFINITY), "-");
        assert_eq!(format_stat(71.456), "71.46");
    }
}
