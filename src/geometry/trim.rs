use crate::foundation::core::{TimeMs, TimeSpan};
use crate::foundation::error::{DrivecamError, DrivecamResult};

/// Requested trim of the source recording.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrimSpec {
    /// When `false` the whole recording is used and `start` / `duration` are ignored.
    pub enabled: bool,
    /// Offset into the source where output begins.
    pub start: TimeMs,
    /// Requested output length.
    pub duration: TimeMs,
}

impl TrimSpec {
    /// Trimming turned off.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Trim `duration` of footage starting at `start`.
    pub fn window(start: TimeMs, duration: TimeMs) -> Self {
        Self {
            enabled: true,
            start,
            duration,
        }
    }
}

/// Effective output window after clamping a [`TrimSpec`] to the available footage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrimWindow {
    /// Offset into the source where output begins.
    pub start: TimeMs,
    /// Output timeline length.
    pub duration: TimeMs,
}

impl TrimWindow {
    /// Window in source time, `[start, start + duration)`.
    pub fn source_span(&self) -> TimeSpan {
        TimeSpan {
            start: self.start,
            end: self.start.saturating_add(self.duration),
        }
    }
}

/// Clamp `trim` against `video_duration`.
///
/// A window that runs past the end of the recording is silently shortened. Fails with
/// `InvalidDuration` for a zero-length video and `EmptyTimeline` when nothing is left.
pub fn resolve_trim(trim: &TrimSpec, video_duration: TimeMs) -> DrivecamResult<TrimWindow> {
    if video_duration.is_zero() {
        return Err(DrivecamError::invalid_duration(
            "video duration must be greater than zero",
        ));
    }
    if !trim.enabled {
        return Ok(TrimWindow {
            start: TimeMs::ZERO,
            duration: video_duration,
        });
    }

    let available = video_duration.saturating_sub(trim.start);
    let duration = trim.duration.min(available);
    if duration.is_zero() {
        return Err(DrivecamError::empty_timeline(format!(
            "trim start {} with duration {} leaves nothing of a {} recording",
            trim.start, trim.duration, video_duration
        )));
    }

    Ok(TrimWindow {
        start: trim.start,
        duration,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/trim.rs"]
mod tests;
