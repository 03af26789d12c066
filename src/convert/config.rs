use std::path::Path;

use anyhow::Context as _;

use crate::convert::ffmpeg::EncoderSettings;
use crate::foundation::core::TimeMs;
use crate::foundation::error::{DrivecamError, DrivecamResult};
use crate::geometry::crop::CropQuadrant;
use crate::geometry::trim::TrimSpec;
use crate::overlay::style::{AssColors, FieldSet, OverlayField, StyleConfig};
use crate::telemetry::timing::TimingMode;

/// Which overlay fields are shown.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Speed in mph and km/h.
    pub speed: bool,
    /// Date stamp.
    pub date: bool,
    /// Time stamp.
    pub time: bool,
    /// GPS coordinates.
    pub coordinates: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            speed: true,
            date: false,
            time: false,
            coordinates: false,
        }
    }
}

impl DisplayConfig {
    /// Enabled fields as a set.
    pub fn fields(&self) -> FieldSet {
        [
            (OverlayField::Speed, self.speed),
            (OverlayField::Date, self.date),
            (OverlayField::Time, self.time),
            (OverlayField::Coordinates, self.coordinates),
        ]
        .into_iter()
        .filter_map(|(f, on)| on.then_some(f))
        .collect()
    }

    /// Enable exactly `fields`.
    pub fn from_fields(fields: &FieldSet) -> Self {
        Self {
            speed: fields.contains(OverlayField::Speed),
            date: fields.contains(OverlayField::Date),
            time: fields.contains(OverlayField::Time),
            coordinates: fields.contains(OverlayField::Coordinates),
        }
    }
}

/// Settings for one conversion run.
///
/// Loaded from JSON; every field is optional and unknown keys are rejected.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Overlay fields to show.
    pub display: DisplayConfig,
    /// 0 = full frame, 1-4 = top-left, top-right, bottom-left, bottom-right.
    pub crop_quadrant: u8,
    /// Use `trim_start` / `trim_duration`.
    pub enable_trimming: bool,
    /// Timecode (`HH:MM:SS[.fff]`, `MM:SS` or seconds).
    pub trim_start: String,
    /// Timecode, same forms as `trim_start`.
    pub trim_duration: String,
    /// Overlay font family.
    pub font_name: String,
    /// Base font size.
    pub font_size: u32,
    /// Speed line size relative to `font_size`.
    pub speed_multiplier: f64,
    /// Text colour, `&HAABBGGRR`.
    pub primary_color: String,
    /// Secondary colour, `&HAABBGGRR`.
    pub secondary_color: String,
    /// Outline colour, `&HAABBGGRR`.
    pub outline_color: String,
    /// Shadow colour, `&HAABBGGRR`.
    pub back_color: String,
    /// Burn the telemetry overlay into the output.
    pub enable_overlay: bool,
    /// How record offsets are derived.
    pub timing: TimingMode,
    /// Upper bound on rendered samples; larger inputs are thinned.
    pub max_events: Option<usize>,
    /// Codec settings.
    pub encoder: EncoderSettings,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        let style = StyleConfig::default();
        Self {
            display: DisplayConfig::default(),
            crop_quadrant: 1,
            enable_trimming: false,
            trim_start: "00:00:00".to_string(),
            trim_duration: "00:00:00".to_string(),
            font_name: style.font_name,
            font_size: style.font_size,
            speed_multiplier: style.speed_multiplier,
            primary_color: style.colors.primary,
            secondary_color: style.colors.secondary,
            outline_color: style.colors.outline,
            back_color: style.colors.back,
            enable_overlay: true,
            timing: TimingMode::Auto,
            max_events: None,
            encoder: EncoderSettings::default(),
        }
    }
}

impl ConvertConfig {
    /// Read a JSON config file.
    pub fn from_path(path: &Path) -> DrivecamResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse JSON config.
    pub fn from_json_str(text: &str) -> DrivecamResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| DrivecamError::serde(format!("config json parse failed: {e}")))
    }

    /// Check every value before any work starts.
    pub fn validate(&self) -> DrivecamResult<()> {
        self.quadrant()?;
        self.trim()?;
        self.style().validate()?;
        self.encoder.validate()?;
        if self.max_events == Some(0) {
            return Err(DrivecamError::validation("max_events must be > 0"));
        }
        Ok(())
    }

    /// Crop quadrant.
    pub fn quadrant(&self) -> DrivecamResult<CropQuadrant> {
        CropQuadrant::from_index(self.crop_quadrant)
    }

    /// Trim request; timecodes are only parsed when trimming is enabled.
    pub fn trim(&self) -> DrivecamResult<TrimSpec> {
        if !self.enable_trimming {
            return Ok(TrimSpec::disabled());
        }
        let start = TimeMs::parse_timecode(&self.trim_start)
            .map_err(|e| DrivecamError::validation(format!("trim_start: {e}")))?;
        let duration = TimeMs::parse_timecode(&self.trim_duration)
            .map_err(|e| DrivecamError::validation(format!("trim_duration: {e}")))?;
        if duration.is_zero() {
            return Err(DrivecamError::validation(
                "trim_duration must be greater than zero when trimming is enabled",
            ));
        }
        Ok(TrimSpec::window(start, duration))
    }

    /// Overlay style.
    pub fn style(&self) -> StyleConfig {
        StyleConfig {
            font_name: self.font_name.clone(),
            font_size: self.font_size,
            speed_multiplier: self.speed_multiplier,
            enabled_fields: self.display.fields(),
            colors: AssColors {
                primary: self.primary_color.clone(),
                secondary: self.secondary_color.clone(),
                outline: self.outline_color.clone(),
                back: self.back_color.clone(),
            },
        }
    }

    /// Output file name used when none is given, e.g.
    /// `Drive_Recorder_Enhanced_Q1_trim_000015_000010.mov`.
    pub fn default_output_name(&self) -> String {
        let quadrant = match self.crop_quadrant {
            0 => "full".to_string(),
            n => format!("Q{n}"),
        };
        let trim = if self.enable_trimming {
            let clean = |t: &str| t.trim().replace([':', '.'], "");
            format!(
                "_trim_{}_{}",
                clean(&self.trim_start),
                clean(&self.trim_duration)
            )
        } else {
            String::new()
        };
        format!("Drive_Recorder_Enhanced_{quadrant}{trim}.mov")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/convert/config.rs"]
mod tests;
