use crate::foundation::core::{TimeMs, TimeSpan};
use crate::foundation::error::DrivecamResult;
use crate::geometry::trim::{TrimSpec, TrimWindow, resolve_trim};
use crate::telemetry::sample::TelemetrySample;

/// One span of the output timeline and the sample whose values it displays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayInterval<'a> {
    /// Inclusive start on the effective (trimmed) timeline.
    pub start: TimeMs,
    /// Exclusive end on the effective timeline; always greater than `start`.
    pub end: TimeMs,
    /// Source sample, or `None` for the placeholder interval of a run without telemetry.
    pub sample: Option<&'a TelemetrySample>,
}

impl DisplayInterval<'_> {
    /// The interval as a [`TimeSpan`].
    pub fn span(&self) -> TimeSpan {
        TimeSpan {
            start: self.start,
            end: self.end,
        }
    }
}

/// Ordered, gap-free display intervals covering `[0, window.duration)`.
#[derive(Clone, Debug)]
pub struct Timeline<'a> {
    /// Trim window the intervals were computed for.
    pub window: TrimWindow,
    /// Intervals in timeline order.
    pub intervals: Vec<DisplayInterval<'a>>,
}

impl Timeline<'_> {
    /// Length of the effective timeline.
    pub fn duration(&self) -> TimeMs {
        self.window.duration
    }

    /// Number of intervals bound to a real sample.
    pub fn populated(&self) -> usize {
        self.intervals.iter().filter(|i| i.sample.is_some()).count()
    }

    /// Check the coverage invariant: starts at zero, no gaps, no overlaps, no empty
    /// intervals, ends exactly at the effective duration.
    pub fn is_contiguous(&self) -> bool {
        let Some(first) = self.intervals.first() else {
            return false;
        };
        let Some(last) = self.intervals.last() else {
            return false;
        };
        first.start.is_zero()
            && last.end == self.window.duration
            && self.intervals.iter().all(|i| i.end > i.start)
            && self.intervals.windows(2).all(|w| w[0].end == w[1].start)
    }
}

/// Map telemetry samples onto the (optionally trimmed) video timeline.
///
/// Samples are sorted by timestamp (stable, so the earlier-listed sample wins a tie) and held
/// until the next distinct timestamp. The last sample before a trim window is re-anchored at
/// zero; without one, the first sample inside the window is extended back to zero. Samples at
/// or past the window end are dropped, and the last kept sample runs to the end of the
/// timeline. With no usable sample a single placeholder interval covers everything.
#[tracing::instrument(skip(samples), fields(samples = samples.len()))]
pub fn synchronize<'a>(
    samples: &'a [TelemetrySample],
    video_duration: TimeMs,
    trim: &TrimSpec,
) -> DrivecamResult<Timeline<'a>> {
    let window = resolve_trim(trim, video_duration)?;
    let end = window.duration;

    let mut sorted: Vec<&TelemetrySample> = samples.iter().collect();
    sorted.sort_by_key(|s| s.timestamp);

    let lead = sorted.partition_point(|s| s.timestamp < window.start);
    let (before, inside) = sorted.split_at(lead);

    let mut anchors: Vec<(TimeMs, &TelemetrySample)> = Vec::with_capacity(inside.len() + 1);
    for &s in inside {
        let rel = s.timestamp.saturating_sub(window.start);
        if rel >= end {
            break;
        }
        if anchors.last().is_some_and(|&(t, _)| t == rel) {
            continue;
        }
        anchors.push((rel, s));
    }

    let covers_start = anchors.first().is_some_and(|(t, _)| t.is_zero());
    if !covers_start {
        if let Some(last) = before.last() {
            let tie = before.partition_point(|s| s.timestamp < last.timestamp);
            anchors.insert(0, (TimeMs::ZERO, before[tie]));
        } else if let Some(first) = anchors.first_mut() {
            first.0 = TimeMs::ZERO;
        }
    }

    if anchors.is_empty() {
        tracing::debug!("no telemetry inside the window, emitting placeholder interval");
        return Ok(Timeline {
            window,
            intervals: vec![DisplayInterval {
                start: TimeMs::ZERO,
                end,
                sample: None,
            }],
        });
    }

    let intervals: Vec<DisplayInterval<'a>> = anchors
        .iter()
        .enumerate()
        .map(|(i, &(start, sample))| DisplayInterval {
            start,
            end: anchors.get(i + 1).map_or(end, |&(next, _)| next),
            sample: Some(sample),
        })
        .collect();

    tracing::debug!(
        intervals = intervals.len(),
        dropped = samples.len() - intervals.len(),
        "telemetry synchronized"
    );

    Ok(Timeline { window, intervals })
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/sync.rs"]
mod tests;
