//! Pointer-to-position math for the timeline.
//!
//! Pure geometry, no widget types: the timeline widget feeds pointer
//! coordinates in here and hands the result to the session. Keeping the
//! math free of GTK keeps every branch testable.

/// Fraction of the track covered at `pointer_x`, for a track starting at
/// `track_left` with width `track_width` (all in the same coordinate
/// space, typically widget-local pixels).
///
/// Returns `None` while the track has no width, which happens before the
/// widget's first allocation. The result is not clamped: a pointer
/// outside the track yields a fraction outside `0.0..=1.0`, and
/// [`seek_target_us`] turns that into a no-op rather than snapping to an
/// edge.
pub fn pointer_fraction(pointer_x: f64, track_left: f64, track_width: f64) -> Option<f64> {
    if track_width <= 0.0 {
        return None;
    }
    Some((pointer_x - track_left) / track_width)
}

/// Absolute seek target for `fraction` of a media item `duration_us`
/// long. Returns `None` when the fraction is outside `0.0..=1.0` or the
/// duration is still unknown (zero or negative); callers issue no
/// command in that case.
pub fn seek_target_us(fraction: f64, duration_us: i64) -> Option<i64> {
    if !(0.0..=1.0).contains(&fraction) || duration_us <= 0 {
        return None;
    }
    Some((duration_us as f64 * fraction).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timecode::US_PER_SEC;

    #[test]
    fn test_pointer_fraction_midpoint() {
        assert_eq!(pointer_fraction(100.0, 0.0, 200.0), Some(0.5));
    }

    #[test]
    fn test_pointer_fraction_respects_track_origin() {
        // Track starts 40px into the widget.
        assert_eq!(pointer_fraction(40.0, 40.0, 100.0), Some(0.0));
        assert_eq!(pointer_fraction(140.0, 40.0, 100.0), Some(1.0));
    }

    #[test]
    fn test_pointer_fraction_unallocated_track() {
        assert_eq!(pointer_fraction(10.0, 0.0, 0.0), None);
        assert_eq!(pointer_fraction(10.0, 0.0, -5.0), None);
    }

    #[test]
    fn test_pointer_fraction_is_not_clamped() {
        assert_eq!(pointer_fraction(-20.0, 0.0, 100.0), Some(-0.2));
        assert_eq!(pointer_fraction(150.0, 0.0, 100.0), Some(1.5));
    }

    #[test]
    fn test_seek_target_midpoint_of_two_minutes() {
        let duration = 120 * US_PER_SEC;
        assert_eq!(seek_target_us(0.5, duration), Some(60 * US_PER_SEC));
    }

    #[test]
    fn test_seek_target_track_edges() {
        let duration = 90 * US_PER_SEC;
        assert_eq!(seek_target_us(0.0, duration), Some(0));
        assert_eq!(seek_target_us(1.0, duration), Some(duration));
    }

    #[test]
    fn test_seek_target_rejects_out_of_range_fraction() {
        let duration = 120 * US_PER_SEC;
        assert_eq!(seek_target_us(-0.01, duration), None);
        assert_eq!(seek_target_us(1.01, duration), None);
    }

    #[test]
    fn test_seek_target_unknown_duration() {
        assert_eq!(seek_target_us(0.5, 0), None);
        assert_eq!(seek_target_us(0.5, -1), None);
    }

    #[test]
    fn test_seek_target_rounds_to_nearest_microsecond() {
        assert_eq!(seek_target_us(1.0 / 3.0, 10), Some(3));
    }
}
