use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{DrivecamError, DrivecamResult};

/// Non-negative time offset with millisecond resolution.
///
/// All timeline arithmetic happens on whole milliseconds so that interval boundaries computed
/// from different samples compare exactly.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct TimeMs(pub u64);

impl TimeMs {
    /// The zero offset.
    pub const ZERO: TimeMs = TimeMs(0);

    /// Build from whole milliseconds.
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Build from whole seconds, clamping at `u64::MAX` milliseconds.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    /// Build from whole seconds, or `None` when the millisecond count overflows.
    pub const fn checked_from_secs(secs: u64) -> Option<Self> {
        match secs.checked_mul(1000) {
            Some(ms) => Some(Self(ms)),
            None => None,
        }
    }

    /// Build from fractional seconds, rounding to the nearest millisecond.
    ///
    /// Negative and non-finite inputs are rejected.
    pub fn from_secs_f64(secs: f64) -> DrivecamResult<Self> {
        if !secs.is_finite() {
            return Err(DrivecamError::validation(format!(
                "time value must be finite, got {secs}"
            )));
        }
        if secs < 0.0 {
            return Err(DrivecamError::validation(format!(
                "time value must be non-negative, got {secs}"
            )));
        }
        Ok(Self((secs * 1000.0).round() as u64))
    }

    /// Whole milliseconds.
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Offset in fractional seconds.
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Return `true` for the zero offset.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Subtract `rhs`, clamping at zero.
    pub fn saturating_sub(self, rhs: TimeMs) -> TimeMs {
        TimeMs(self.0.saturating_sub(rhs.0))
    }

    /// Add `rhs`, clamping at `u64::MAX`.
    pub fn saturating_add(self, rhs: TimeMs) -> TimeMs {
        TimeMs(self.0.saturating_add(rhs.0))
    }

    /// Parse a timecode such as `"90"`, `"12.5"`, `"01:30"` or `"00:01:30.250"`.
    ///
    /// Minute and second fields must stay below 60 once a larger unit is present.
    pub fn parse_timecode(s: &str) -> DrivecamResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DrivecamError::validation("timecode must not be empty"));
        }

        let fields: Vec<&str> = s.split(':').collect();
        if fields.len() > 3 {
            return Err(DrivecamError::validation(format!(
                "timecode '{s}' has too many ':' separated fields"
            )));
        }

        let (last, leading) = fields
            .split_last()
            .ok_or_else(|| DrivecamError::validation("timecode must not be empty"))?;

        let seconds = parse_decimal_field(s, last)?;
        if !leading.is_empty() && seconds >= 60.0 {
            return Err(DrivecamError::validation(format!(
                "timecode '{s}': seconds field must be < 60"
            )));
        }

        let mut total = seconds;
        let mut scale = 60.0;
        for (i, field) in leading.iter().rev().enumerate() {
            let value = parse_integer_field(s, field)?;
            // Minutes are bounded when hours are also given.
            if i == 0 && leading.len() == 2 && value >= 60 {
                return Err(DrivecamError::validation(format!(
                    "timecode '{s}': minutes field must be < 60"
                )));
            }
            total += value as f64 * scale;
            scale *= 60.0;
        }

        Self::from_secs_f64(total)
    }
}

fn parse_integer_field(whole: &str, field: &str) -> DrivecamResult<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DrivecamError::validation(format!(
            "timecode '{whole}': '{field}' is not a whole number"
        )));
    }
    field.parse::<u64>().map_err(|e| {
        DrivecamError::validation(format!("timecode '{whole}': '{field}' is invalid: {e}"))
    })
}

fn parse_decimal_field(whole: &str, field: &str) -> DrivecamResult<f64> {
    let valid = !field.is_empty()
        && field.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && field.bytes().filter(|&b| b == b'.').count() <= 1
        && field != ".";
    if !valid {
        return Err(DrivecamError::validation(format!(
            "timecode '{whole}': '{field}' is not a number of seconds"
        )));
    }
    field.parse::<f64>().map_err(|e| {
        DrivecamError::validation(format!("timecode '{whole}': '{field}' is invalid: {e}"))
    })
}

impl FromStr for TimeMs {
    type Err = DrivecamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_timecode(s)
    }
}

impl fmt::Display for TimeMs {
    /// Formats as `H:MM:SS.mmm`, which `ffmpeg` accepts for `-ss` / `-t`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.0;
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1000;
        let millis = ms % 1000;
        write!(f, "{hours}:{minutes:02}:{seconds:02}.{millis:03}")
    }
}

/// Half-open time span `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimeSpan {
    /// Inclusive span start.
    pub start: TimeMs,
    /// Exclusive span end.
    pub end: TimeMs,
}

impl TimeSpan {
    /// Create a validated span with `start <= end`.
    pub fn new(start: TimeMs, end: TimeMs) -> DrivecamResult<Self> {
        if start > end {
            return Err(DrivecamError::validation("TimeSpan start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Length of the span.
    pub fn len(self) -> TimeMs {
        self.end.saturating_sub(self.start)
    }

    /// Return `true` when the span covers no time.
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Return `true` when `t` is inside `[start, end)`.
    pub fn contains(self, t: TimeMs) -> bool {
        self.start <= t && t < self.end
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
