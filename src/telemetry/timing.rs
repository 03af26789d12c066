use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::foundation::core::TimeMs;
use crate::foundation::error::{DrivecamError, DrivecamResult};
use crate::telemetry::load::TelemetryRecord;
use crate::telemetry::sample::TelemetrySample;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%d/%m/%Y"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// How record offsets on the recording timeline are derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingMode {
    /// Explicit offsets if every record has one, else wall clock, else spread.
    #[default]
    Auto,
    /// Use each record's `timestamp` field; records without one are an error.
    Explicit,
    /// Offset from the earliest `date` + `time` wall clock.
    WallClock,
    /// Distribute records evenly over the video duration, in file order.
    Spread,
}

/// Strategy that was actually applied by [`resolve_samples`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimingSource {
    /// Explicit per-record offsets.
    Explicit,
    /// Wall-clock deltas.
    WallClock,
    /// Even spread over the video duration.
    Spread,
}

/// Place parsed records on the recording timeline.
pub fn resolve_samples(
    records: &[TelemetryRecord],
    mode: TimingMode,
    video_duration: TimeMs,
) -> DrivecamResult<(Vec<TelemetrySample>, TimingSource)> {
    let (offsets, source) = match mode {
        TimingMode::Explicit => (explicit_offsets(records)?, TimingSource::Explicit),
        TimingMode::WallClock => (wall_clock_offsets(records)?, TimingSource::WallClock),
        TimingMode::Spread => (
            spread_offsets(records.len(), video_duration),
            TimingSource::Spread,
        ),
        TimingMode::Auto => {
            if let Ok(offsets) = explicit_offsets(records) {
                (offsets, TimingSource::Explicit)
            } else if let Ok(offsets) = wall_clock_offsets(records) {
                (offsets, TimingSource::WallClock)
            } else {
                (
                    spread_offsets(records.len(), video_duration),
                    TimingSource::Spread,
                )
            }
        }
    };

    let samples = records
        .iter()
        .zip(offsets)
        .map(|(r, timestamp)| TelemetrySample {
            timestamp,
            speed: r.speed,
            latitude: r.latitude,
            longitude: r.longitude,
            date: r.date.clone(),
            time: r.time.clone(),
        })
        .collect();

    Ok((samples, source))
}

fn explicit_offsets(records: &[TelemetryRecord]) -> DrivecamResult<Vec<TimeMs>> {
    if records.is_empty() {
        return Err(DrivecamError::validation("no records to take offsets from"));
    }
    records
        .iter()
        .map(|r| {
            r.offset.ok_or_else(|| {
                DrivecamError::invalid_sample(format!(
                    "record {} has no 'timestamp' offset",
                    r.index
                ))
            })
        })
        .collect()
}

fn wall_clock_offsets(records: &[TelemetryRecord]) -> DrivecamResult<Vec<TimeMs>> {
    if records.is_empty() {
        return Err(DrivecamError::validation("no records to take wall clock from"));
    }
    let stamps = records
        .iter()
        .map(wall_clock)
        .collect::<DrivecamResult<Vec<_>>>()?;

    let Some(earliest) = stamps.iter().min().copied() else {
        return Ok(Vec::new());
    };
    Ok(stamps
        .into_iter()
        .map(|t| {
            let delta = (t - earliest).num_milliseconds();
            TimeMs(u64::try_from(delta).unwrap_or(0))
        })
        .collect())
}

fn wall_clock(record: &TelemetryRecord) -> DrivecamResult<NaiveDateTime> {
    let missing = || {
        DrivecamError::invalid_sample(format!(
            "record {} lacks a parsable date and time",
            record.index
        ))
    };
    let date = record.date.as_deref().and_then(parse_date).ok_or_else(missing)?;
    let time = record.time.as_deref().and_then(parse_time).ok_or_else(missing)?;
    Ok(date.and_time(time))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|f| NaiveTime::parse_from_str(s, f).ok())
}

/// `index * duration / count`, rounded down to whole milliseconds.
fn spread_offsets(count: usize, video_duration: TimeMs) -> Vec<TimeMs> {
    if count == 0 {
        return Vec::new();
    }
    let total = u128::from(video_duration.as_millis());
    let n = count as u128;
    (0..count)
        .map(|i| TimeMs((i as u128 * total / n) as u64))
        .collect()
}

/// Keep every `step`-th sample so that at most about `max_events` remain.
///
/// `step = max(1, count / max_events)`; a cap of zero disables thinning. Samples are stably
/// ordered by timestamp first, so records listed out of order still thin evenly in time.
pub fn thin_samples(
    mut samples: Vec<TelemetrySample>,
    max_events: usize,
) -> Vec<TelemetrySample> {
    if max_events == 0 || samples.len() <= max_events {
        return samples;
    }
    samples.sort_by_key(|s| s.timestamp);
    let step = (samples.len() / max_events).max(1);
    samples.into_iter().step_by(step).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/telemetry/timing.rs"]
mod tests;
