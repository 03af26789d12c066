use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::convert::config::ConvertConfig;
use crate::convert::ffmpeg::{self, TranscodeJob, TranscodeProgress};
use crate::convert::probe::{MediaInfo, probe_media};
use crate::foundation::core::TimeMs;
use crate::foundation::error::DrivecamResult;
use crate::geometry::crop::{CropSpec, resolve_crop};
use crate::geometry::trim::{TrimWindow, resolve_trim};
use crate::overlay::render::{OverlayDocument, OverlayHeader, render};
use crate::telemetry::load::Metadata;
use crate::telemetry::timing::{TimingSource, resolve_samples, thin_samples};
use crate::timeline::sync::synchronize;

/// Counters describing a rendered overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayStats {
    /// Samples placed on the timeline (after thinning).
    pub samples: usize,
    /// How sample offsets were derived.
    pub timing: TimingSource,
    /// Display intervals produced by the synchronizer.
    pub intervals: usize,
    /// Intervals bound to a real sample.
    pub populated: usize,
    /// Dialogue events written.
    pub events: usize,
}

/// Overlay markup for one recording, ready to be written.
#[derive(Clone, Debug)]
pub struct OverlayPlan {
    /// Rendered ASS script.
    pub document: OverlayDocument,
    /// Effective output window.
    pub window: TrimWindow,
    /// Counters for reporting.
    pub stats: OverlayStats,
}

/// Place `meta` on a `video_duration` timeline and render it with the settings in `cfg`.
///
/// `play_res` is the output frame size, if known.
pub fn plan_overlay(
    meta: &Metadata,
    cfg: &ConvertConfig,
    video_duration: TimeMs,
    play_res: Option<(u32, u32)>,
) -> DrivecamResult<OverlayPlan> {
    let (samples, timing) = resolve_samples(&meta.records, cfg.timing, video_duration)?;
    let samples = match cfg.max_events {
        Some(limit) => thin_samples(samples, limit),
        None => samples,
    };
    tracing::debug!(samples = samples.len(), ?timing, "telemetry placed");

    let trim = cfg.trim()?;
    let timeline = synchronize(&samples, video_duration, &trim)?;

    let mut header = OverlayHeader::for_vin(&meta.vin);
    if let Some((w, h)) = play_res {
        header = header.with_play_res(w, h);
    }
    let document = render(&timeline.intervals, &cfg.style(), &header)?;

    Ok(OverlayPlan {
        window: timeline.window,
        stats: OverlayStats {
            samples: samples.len(),
            timing,
            intervals: timeline.intervals.len(),
            populated: timeline.populated(),
            events: document.events,
        },
        document,
    })
}

/// Render the overlay of `metadata_path` for a `video_duration` recording into `out_path`.
pub fn write_overlay(
    metadata_path: &Path,
    out_path: &Path,
    cfg: &ConvertConfig,
    video_duration: TimeMs,
    play_res: Option<(u32, u32)>,
) -> DrivecamResult<OverlayPlan> {
    cfg.validate()?;
    let meta = Metadata::from_path(metadata_path)?;
    let plan = plan_overlay(&meta, cfg, video_duration, play_res)?;
    ffmpeg::ensure_parent_dir(out_path)?;
    std::fs::write(out_path, &plan.document.markup)
        .with_context(|| format!("write overlay '{}'", out_path.display()))?;
    tracing::info!(
        path = %out_path.display(),
        events = plan.stats.events,
        "overlay written"
    );
    Ok(plan)
}

/// Overlay script in the temp directory, deleted on drop.
pub(crate) struct TempOverlay {
    path: PathBuf,
}

impl TempOverlay {
    pub(crate) fn write(markup: &str) -> DrivecamResult<Self> {
        let path = std::env::temp_dir().join(format!("drivecam-{}.ass", uuid::Uuid::new_v4()));
        std::fs::write(&path, markup)
            .with_context(|| format!("write overlay '{}'", path.display()))?;
        Ok(Self { path })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempOverlay {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::debug!(path = %self.path.display(), "failed to remove overlay: {e}");
        }
    }
}

/// Inputs of one conversion.
#[derive(Clone, Debug)]
pub struct ConvertRequest {
    /// Recorder video (`.ts`).
    pub video: PathBuf,
    /// Metadata JSON.
    pub metadata: PathBuf,
    /// Destination; [`ConvertConfig::default_output_name`] when `None`.
    pub output: Option<PathBuf>,
    /// Run settings.
    pub config: ConvertConfig,
}

impl ConvertRequest {
    /// Where the converted file is written.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.config.default_output_name()))
    }
}

/// Outcome of a finished conversion.
#[derive(Clone, Debug)]
pub struct ConvertReport {
    /// Written file.
    pub output: PathBuf,
    /// Probed source.
    pub media: MediaInfo,
    /// Applied crop.
    pub crop: CropSpec,
    /// Applied trim window.
    pub window: TrimWindow,
    /// Overlay counters, `None` when the overlay was disabled.
    pub overlay: Option<OverlayStats>,
    /// Malformed metadata records that were skipped.
    pub skipped_records: usize,
    /// Source size in bytes.
    pub input_bytes: u64,
    /// Output size in bytes.
    pub output_bytes: u64,
}

impl ConvertReport {
    /// Source size in MiB.
    pub fn input_mb(&self) -> f64 {
        bytes_to_mb(self.input_bytes)
    }

    /// Output size in MiB.
    pub fn output_mb(&self) -> f64 {
        bytes_to_mb(self.output_bytes)
    }

    /// Relative size change in percent; `None` for an empty source.
    pub fn size_change_percent(&self) -> Option<f64> {
        if self.input_bytes == 0 {
            return None;
        }
        let before = self.input_bytes as f64;
        Some((self.output_bytes as f64 - before) / before * 100.0)
    }
}

fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

fn file_size(path: &Path) -> DrivecamResult<u64> {
    let meta =
        std::fs::metadata(path).with_context(|| format!("stat '{}'", path.display()))?;
    Ok(meta.len())
}

/// Convert a recording: probe, synchronize telemetry, render the overlay and run `ffmpeg`.
///
/// Blocks until the transcode finishes; `on_progress` is called for every status line.
pub fn convert(
    request: &ConvertRequest,
    on_progress: &mut dyn FnMut(TranscodeProgress),
) -> DrivecamResult<ConvertReport> {
    request.config.validate()?;
    let meta = Metadata::from_path(&request.metadata)?;
    tracing::info!(
        vin = %meta.vin,
        entries = meta.records.len(),
        skipped = meta.skipped,
        "metadata loaded"
    );
    convert_with_metadata(request, &meta, on_progress)
}

/// [`convert`] with metadata the caller already loaded; `request.metadata` is not read.
pub fn convert_with_metadata(
    request: &ConvertRequest,
    meta: &Metadata,
    on_progress: &mut dyn FnMut(TranscodeProgress),
) -> DrivecamResult<ConvertReport> {
    let cfg = &request.config;
    cfg.validate()?;
    ffmpeg::check_dependencies()?;

    let media = probe_media(&request.video)?;
    tracing::info!(
        width = media.width,
        height = media.height,
        duration = %media.duration,
        "video probed"
    );

    let crop = resolve_crop(cfg.quadrant()?, media.width, media.height)?;
    let trim = cfg.trim()?;
    let window = resolve_trim(&trim, media.duration)?;
    if trim.enabled && window.duration < trim.duration {
        tracing::warn!(
            requested = %trim.duration,
            available = %window.duration,
            "trim window runs past the end of the recording, truncated"
        );
    }
    tracing::debug!(?crop, ?window, "geometry resolved");

    let (overlay, stats) = if cfg.enable_overlay {
        let plan = plan_overlay(
            meta,
            cfg,
            media.duration,
            Some((crop.rect.width, crop.rect.height)),
        )?;
        let file = TempOverlay::write(&plan.document.markup)?;
        tracing::info!(
            intervals = plan.stats.intervals,
            events = plan.stats.events,
            "overlay rendered"
        );
        (Some(file), Some(plan.stats))
    } else {
        (None, None)
    };

    let output = request.output_path();
    let job = TranscodeJob {
        input: request.video.clone(),
        output: output.clone(),
        crop_filter: crop.filter(),
        overlay: overlay.as_ref().map(|f| f.path().to_path_buf()),
        trim: trim.enabled.then_some(window),
        encoder: cfg.encoder.clone(),
    };

    tracing::info!(
        input = %request.video.display(),
        output = %output.display(),
        "transcoding"
    );
    ffmpeg::run_transcode(&job, window.duration, on_progress)?;
    drop(overlay);

    let report = ConvertReport {
        input_bytes: file_size(&request.video)?,
        output_bytes: file_size(&output)?,
        output,
        media,
        crop,
        window,
        overlay: stats,
        skipped_records: meta.skipped,
    };
    tracing::info!(
        input_mb = report.input_mb(),
        output_mb = report.output_mb(),
        "conversion finished"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/convert/pipeline.rs"]
mod tests;
