use std::collections::VecDeque;
use std::ffi::OsString;
use std::io::{BufRead as _, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::foundation::core::TimeMs;
use crate::foundation::error::{DrivecamError, DrivecamResult};
use crate::geometry::trim::TrimWindow;

/// External tools a conversion needs.
pub const REQUIRED_TOOLS: [&str; 2] = ["ffmpeg", "ffprobe"];

const STDERR_TAIL_LINES: usize = 12;

/// Codec settings passed to `ffmpeg`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderSettings {
    /// Video encoder name.
    pub video_codec: String,
    /// Encoder preset (`-preset`).
    pub preset: Option<String>,
    /// Constant rate factor (`-crf`).
    pub crf: Option<u8>,
    /// Audio encoder name.
    pub audio_codec: String,
    /// Audio bitrate (`-b:a`), e.g. `"128k"`.
    pub audio_bitrate: Option<String>,
    /// Move the moov atom to the front of the file.
    pub faststart: bool,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self::archival()
    }
}

impl EncoderSettings {
    /// Near-lossless H.264 at the slowest preset.
    pub fn archival() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: Some("veryslow".to_string()),
            crf: Some(1),
            audio_codec: "aac".to_string(),
            audio_bitrate: Some("128k".to_string()),
            faststart: true,
        }
    }

    /// Encoder defaults; much quicker, larger quality loss.
    pub fn fast() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: None,
            crf: None,
            audio_codec: "aac".to_string(),
            audio_bitrate: None,
            faststart: true,
        }
    }

    /// Reject settings that would produce a broken command line.
    pub fn validate(&self) -> DrivecamResult<()> {
        if self.video_codec.trim().is_empty() {
            return Err(DrivecamError::validation("video codec must not be empty"));
        }
        if self.audio_codec.trim().is_empty() {
            return Err(DrivecamError::validation("audio codec must not be empty"));
        }
        if self.crf.is_some_and(|crf| crf > 51) {
            return Err(DrivecamError::validation("crf must be in 0..=51"));
        }
        Ok(())
    }
}

/// One `ffmpeg` transcode: input, filters, trim and encoder settings.
#[derive(Clone, Debug)]
pub struct TranscodeJob {
    /// Source recording.
    pub input: PathBuf,
    /// Destination file; overwritten if present.
    pub output: PathBuf,
    /// `crop=...` filter, `None` for the full frame.
    pub crop_filter: Option<String>,
    /// ASS overlay to burn in.
    pub overlay: Option<PathBuf>,
    /// Trim window, `None` to keep the whole recording.
    pub trim: Option<TrimWindow>,
    /// Codec settings.
    pub encoder: EncoderSettings,
}

impl TranscodeJob {
    /// Comma-joined `-vf` chain: crop first, then the overlay.
    pub fn filter_chain(&self) -> Option<String> {
        let mut filters = Vec::new();
        if let Some(crop) = &self.crop_filter {
            filters.push(crop.clone());
        }
        if let Some(path) = &self.overlay {
            filters.push(ass_filter(path));
        }
        if filters.is_empty() {
            None
        } else {
            Some(filters.join(","))
        }
    }

    /// Full `ffmpeg` argument list (without the program name).
    ///
    /// Trimming seeks on the input side so the overlay sees timestamps starting at zero.
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-hide_banner".into(), "-nostdin".into()];
        if let Some(window) = self.trim {
            args.push("-ss".into());
            args.push(ffmpeg_seconds(window.start).into());
        }
        args.push("-i".into());
        args.push(self.input.clone().into_os_string());
        if let Some(window) = self.trim {
            args.push("-t".into());
            args.push(ffmpeg_seconds(window.duration).into());
        }
        if let Some(vf) = self.filter_chain() {
            args.push("-vf".into());
            args.push(vf.into());
        }

        let enc = &self.encoder;
        args.push("-c:v".into());
        args.push(enc.video_codec.clone().into());
        if let Some(preset) = &enc.preset {
            args.push("-preset".into());
            args.push(preset.clone().into());
        }
        if let Some(crf) = enc.crf {
            args.push("-crf".into());
            args.push(crf.to_string().into());
        }
        args.push("-c:a".into());
        args.push(enc.audio_codec.clone().into());
        if let Some(bitrate) = &enc.audio_bitrate {
            args.push("-b:a".into());
            args.push(bitrate.clone().into());
        }
        if enc.faststart {
            args.push("-movflags".into());
            args.push("+faststart".into());
        }
        args.push("-y".into());
        args.push(self.output.clone().into_os_string());
        args
    }
}

/// Progress of a running transcode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TranscodeProgress {
    /// Output time written so far.
    pub out_time: TimeMs,
    /// `out_time / expected`, clamped to `[0, 1]`; `None` when the expected length is unknown.
    pub fraction: Option<f64>,
}

impl TranscodeProgress {
    fn new(out_time: TimeMs, expected: TimeMs) -> Self {
        let fraction = (!expected.is_zero())
            .then(|| (out_time.as_secs_f64() / expected.as_secs_f64()).clamp(0.0, 1.0));
        Self { out_time, fraction }
    }
}

/// Escape a path for use inside an `ass='...'` filter argument.
pub fn ass_filter(path: &Path) -> String {
    let escaped = path
        .to_string_lossy()
        .replace('\\', "\\\\")
        .replace(':', "\\:")
        .replace('\'', "\\'");
    format!("ass='{escaped}'")
}

fn ffmpeg_seconds(t: TimeMs) -> String {
    format!("{}.{:03}", t.as_millis() / 1000, t.as_millis() % 1000)
}

/// Extract `time=` from an `ffmpeg` status line.
pub fn parse_progress(line: &str) -> Option<TimeMs> {
    // "frame=  123 fps= 30 q=28.0 size=  1024kB time=00:01:23.45 bitrate=..."
    let time = line.split("time=").nth(1)?.split_whitespace().next()?;
    let negative = time.starts_with('-');
    let parts: Vec<&str> = time.trim_start_matches('-').split(':').collect();
    if parts.len() != 3 {
        return None;
    }
    let hours: u64 = parts[0].parse().ok()?;
    let minutes: u64 = parts[1].parse().ok()?;
    let seconds: f64 = parts[2].parse().ok()?;
    if negative {
        return Some(TimeMs::ZERO);
    }
    let secs = TimeMs::from_secs_f64(seconds).ok()?;
    let whole = hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?;
    let ms = TimeMs::checked_from_secs(whole)?.as_millis().checked_add(secs.as_millis())?;
    Some(TimeMs(ms))
}

/// `true` when `tool -version` runs successfully.
pub fn is_tool_on_path(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Fail with the list of [`REQUIRED_TOOLS`] that cannot be run.
pub fn check_dependencies() -> DrivecamResult<()> {
    let missing: Vec<&str> = REQUIRED_TOOLS
        .iter()
        .copied()
        .filter(|t| !is_tool_on_path(t))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(DrivecamError::tool(format!(
        "missing required tools: {} (install ffmpeg and make sure it is on PATH)",
        missing.join(", ")
    )))
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> DrivecamResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Run `job`, reporting progress against `expected` output length.
///
/// Blocks until `ffmpeg` exits. On failure the last lines of its stderr are included in the
/// error.
pub fn run_transcode(
    job: &TranscodeJob,
    expected: TimeMs,
    on_progress: &mut dyn FnMut(TranscodeProgress),
) -> DrivecamResult<()> {
    job.encoder.validate()?;
    ensure_parent_dir(&job.output)?;

    let args = job.to_args();
    tracing::debug!(?args, "spawning ffmpeg");

    let mut child = Command::new("ffmpeg")
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            DrivecamError::tool(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| DrivecamError::tool("failed to open ffmpeg stderr (unexpected)"))?;

    // Status lines end in '\r', log lines in '\n'.
    let mut reader = BufReader::new(stderr);
    let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
    let mut chunk = Vec::new();
    loop {
        chunk.clear();
        let n = reader
            .read_until(b'\r', &mut chunk)
            .map_err(|e| DrivecamError::tool(format!("failed to read ffmpeg output: {e}")))?;
        if n == 0 {
            break;
        }
        let text = String::from_utf8_lossy(&chunk);
        for line in text.split(['\r', '\n']).map(str::trim).filter(|l| !l.is_empty()) {
            if let Some(out_time) = parse_progress(line) {
                on_progress(TranscodeProgress::new(out_time, expected));
                continue;
            }
            if tail.len() == STDERR_TAIL_LINES {
                tail.pop_front();
            }
            tail.push_back(line.to_string());
        }
    }

    let status = child
        .wait()
        .map_err(|e| DrivecamError::tool(format!("failed to wait for ffmpeg to finish: {e}")))?;
    if !status.success() {
        let tail: Vec<String> = tail.into_iter().collect();
        return Err(DrivecamError::tool(format!(
            "ffmpeg exited with status {status}: {}",
            tail.join("\n")
        )));
    }

    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/convert/ffmpeg.rs"]
mod tests;
