//! drivecam converts drive recorder transport streams into QuickTime files with a burned-in
//! telemetry overlay.
//!
//! # Pipeline overview
//!
//! 1. **Load**: metadata JSON -> [`TelemetryRecord`]s (malformed records are skipped)
//! 2. **Place**: records -> [`TelemetrySample`]s on the recording timeline
//! 3. **Synchronize**: samples + video duration + [`TrimSpec`] -> gap-free [`DisplayInterval`]s
//! 4. **Render**: intervals + [`StyleConfig`] -> ASS overlay markup
//! 5. **Transcode**: the system `ffmpeg` binary crops, trims and burns in the overlay
//!
//! Steps 1-4 are pure and deterministic; only probing and transcoding touch external tools.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod convert;
mod foundation;
mod geometry;
mod overlay;
mod telemetry;
mod timeline;

/// Speed and coordinate conversion and formatting.
pub mod units;

pub use crate::foundation::core::{TimeMs, TimeSpan};
pub use crate::foundation::error::{DrivecamError, DrivecamResult};

pub use crate::convert::config::{ConvertConfig, DisplayConfig};
pub use crate::convert::ffmpeg::{
    EncoderSettings, REQUIRED_TOOLS, TranscodeJob, TranscodeProgress, ass_filter,
    check_dependencies, ensure_parent_dir, is_tool_on_path, parse_progress, run_transcode,
};
pub use crate::convert::pipeline::{
    ConvertReport, ConvertRequest, OverlayPlan, OverlayStats, convert, convert_with_metadata,
    plan_overlay, write_overlay,
};
pub use crate::convert::probe::{MediaInfo, parse_probe_output, probe_media};
pub use crate::geometry::crop::{CropQuadrant, CropRect, CropSpec, resolve_crop};
pub use crate::geometry::trim::{TrimSpec, TrimWindow, resolve_trim};
pub use crate::overlay::render::{
    OverlayDocument, OverlayHeader, escape_text, format_ass_time, render,
};
pub use crate::overlay::style::{
    AssColors, AssStyle, FieldSet, INFO_STYLE, OverlayField, SPEED_STYLE, StyleConfig,
};
pub use crate::telemetry::load::{Metadata, TelemetryRecord, UNKNOWN_VIN};
pub use crate::telemetry::sample::TelemetrySample;
pub use crate::telemetry::summary::MetadataSummary;
pub use crate::telemetry::timing::{TimingMode, TimingSource, resolve_samples, thin_samples};
pub use crate::timeline::sync::{DisplayInterval, Timeline, synchronize};
