//! Command seam between the session and the media backend.

/// Commands the session can issue against the playing media.
///
/// The session borrows a handle per call and never owns one; the
/// application wires in the real pipeline, tests wire in a recording
/// fake. Methods take `&self` since backends track their own state
/// behind interior mutability.
///
/// Commands are requests, not transitions: the state change they cause
/// comes back later as a [`crate::PlaybackEvent`], or not at all if the
/// backend drops the request.
pub trait MediaHandle {
    fn play(&self);
    fn pause(&self);

    /// Seek to an absolute position in microseconds.
    fn seek_to(&self, position_us: i64);

    /// The rate currently applied to the backend.
    fn playback_rate(&self) -> f64;

    fn set_playback_rate(&self, rate: f64);

    /// Media length in microseconds, 0 while not yet known.
    fn duration_us(&self) -> i64;
}
