//! Timecode formatting for the position and duration labels.

/// Microseconds per second; positions and durations are carried as
/// microsecond counts everywhere in this crate.
pub const US_PER_SEC: i64 = 1_000_000;

/// Format a microsecond position as `M:SS`, or `H:MM:SS` once the value
/// reaches an hour. Negative inputs format as `0:00`.
pub fn format_timecode(position_us: i64) -> String {
    let total_seconds = position_us.max(0) / US_PER_SEC;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timecode_zero() {
        assert_eq!(format_timecode(0), "0:00");
    }

    #[test]
    fn test_format_timecode_seconds_padded() {
        assert_eq!(format_timecode(7 * US_PER_SEC), "0:07");
        assert_eq!(format_timecode(59 * US_PER_SEC), "0:59");
    }

    #[test]
    fn test_format_timecode_minutes() {
        assert_eq!(format_timecode(60 * US_PER_SEC), "1:00");
        assert_eq!(format_timecode(90 * US_PER_SEC), "1:30");
        assert_eq!(format_timecode(754 * US_PER_SEC), "12:34");
    }

    #[test]
    fn test_format_timecode_hours() {
        assert_eq!(format_timecode(3600 * US_PER_SEC), "1:00:00");
        assert_eq!(format_timecode(3661 * US_PER_SEC), "1:01:01");
        assert_eq!(format_timecode(10 * 3600 * US_PER_SEC), "10:00:00");
    }

    #[test]
    fn test_format_timecode_truncates_sub_second() {
        assert_eq!(format_timecode(1_999_999), "0:01");
    }

    #[test]
    fn test_format_timecode_negative_clamps() {
        assert_eq!(format_timecode(-5 * US_PER_SEC), "0:00");
    }
}
