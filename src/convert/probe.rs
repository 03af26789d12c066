use std::path::{Path, PathBuf};
use std::process::Command;

use crate::foundation::core::TimeMs;
use crate::foundation::error::{DrivecamError, DrivecamResult};

/// Stream facts read from `ffprobe`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaInfo {
    /// Probed file.
    pub source_path: PathBuf,
    /// Frame width of the first video stream.
    pub width: u32,
    /// Frame height of the first video stream.
    pub height: u32,
    /// Container duration.
    pub duration: TimeMs,
    /// `true` when the file carries at least one audio stream.
    pub has_audio: bool,
}

/// Run `ffprobe` on `source_path`.
pub fn probe_media(source_path: &Path) -> DrivecamResult<MediaInfo> {
    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| DrivecamError::tool(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(DrivecamError::tool(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let info = parse_probe_output(source_path, &out.stdout)?;
    tracing::debug!(
        width = info.width,
        height = info.height,
        duration = %info.duration,
        has_audio = info.has_audio,
        "probed media"
    );
    Ok(info)
}

/// Parse `ffprobe -print_format json -show_streams -show_format` output.
pub fn parse_probe_output(source_path: &Path, json: &[u8]) -> DrivecamResult<MediaInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| DrivecamError::tool(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| DrivecamError::tool("no video stream found"))?;
    let width = video_stream
        .width
        .ok_or_else(|| DrivecamError::tool("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| DrivecamError::tool("missing video height from ffprobe"))?;

    // Transport streams sometimes only report a duration per stream.
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(video_stream.duration.as_deref())
        .and_then(|s| s.trim().parse::<f64>().ok())
        .ok_or_else(|| {
            DrivecamError::invalid_duration(format!(
                "ffprobe reported no duration for '{}'",
                source_path.display()
            ))
        })?;
    let duration = TimeMs::from_secs_f64(duration_sec)
        .map_err(|e| DrivecamError::invalid_duration(e.to_string()))?;

    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(MediaInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        duration,
        has_audio,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/convert/probe.rs"]
mod tests;
