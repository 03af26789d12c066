use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{DrivecamError, DrivecamResult};

/// Telemetry field that can be shown in the overlay.
///
/// The declaration order is the display order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OverlayField {
    /// Speed in mph and km/h.
    Speed,
    /// Recorded date.
    Date,
    /// Recorded wall-clock time.
    Time,
    /// GPS position.
    Coordinates,
}

impl OverlayField {
    /// Every field in display order.
    pub const ALL: [OverlayField; 4] = [Self::Speed, Self::Date, Self::Time, Self::Coordinates];

    fn name(self) -> &'static str {
        match self {
            Self::Speed => "speed",
            Self::Date => "date",
            Self::Time => "time",
            Self::Coordinates => "coordinates",
        }
    }
}

impl fmt::Display for OverlayField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OverlayField {
    type Err = DrivecamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if matches!(s.as_str(), "gps" | "coords") {
            return Ok(Self::Coordinates);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| DrivecamError::validation(format!("unknown overlay field '{s}'")))
    }
}

/// Set of enabled overlay fields; iteration always follows display order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldSet(BTreeSet<OverlayField>);

impl FieldSet {
    /// No fields enabled.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Speed only, the recorder tool's default.
    pub fn speed_only() -> Self {
        [OverlayField::Speed].into_iter().collect()
    }

    /// Return `true` when `field` is enabled.
    pub fn contains(&self, field: OverlayField) -> bool {
        self.0.contains(&field)
    }

    /// Enable `field`.
    pub fn insert(&mut self, field: OverlayField) {
        self.0.insert(field);
    }

    /// Return `true` when nothing is enabled.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Enabled fields in display order.
    pub fn iter(&self) -> impl Iterator<Item = OverlayField> + '_ {
        self.0.iter().copied()
    }

    /// Parse a comma-separated list such as `"speed,coordinates"`.
    pub fn parse_list(s: &str) -> DrivecamResult<Self> {
        s.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(OverlayField::from_str)
            .collect()
    }
}

impl FromIterator<OverlayField> for FieldSet {
    fn from_iter<I: IntoIterator<Item = OverlayField>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// ASS colours in `&HAABBGGRR` notation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssColors {
    /// Text fill.
    pub primary: String,
    /// Karaoke colour.
    pub secondary: String,
    /// Text outline.
    pub outline: String,
    /// Shadow / box background.
    pub back: String,
}

impl Default for AssColors {
    fn default() -> Self {
        Self {
            primary: "&H00FFFFFF".to_string(),   // White
            secondary: "&H000000FF".to_string(), // Red
            outline: "&H00000000".to_string(),   // Black
            back: "&H80000000".to_string(),      // Semi-transparent black
        }
    }
}

impl AssColors {
    /// Check every colour is `&H` followed by 6 or 8 hex digits.
    pub fn validate(&self) -> DrivecamResult<()> {
        for (name, value) in [
            ("primary", &self.primary),
            ("secondary", &self.secondary),
            ("outline", &self.outline),
            ("back", &self.back),
        ] {
            let hex = value
                .strip_prefix("&H")
                .or_else(|| value.strip_prefix("&h"))
                .unwrap_or("");
            let ok = matches!(hex.len(), 6 | 8) && hex.bytes().all(|b| b.is_ascii_hexdigit());
            if !ok {
                return Err(DrivecamError::validation(format!(
                    "{name} colour '{value}' is not in &HAABBGGRR form"
                )));
            }
        }
        Ok(())
    }
}

/// Overlay appearance and content selection.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleConfig {
    /// Font family.
    pub font_name: String,
    /// Base font size in script pixels.
    pub font_size: u32,
    /// Speed line size relative to `font_size`.
    pub speed_multiplier: f64,
    /// Fields to display.
    pub enabled_fields: FieldSet,
    /// Text colours.
    pub colors: AssColors,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_name: "SF Pro Display".to_string(),
            font_size: 16,
            speed_multiplier: 1.4,
            enabled_fields: FieldSet::speed_only(),
            colors: AssColors::default(),
        }
    }
}

impl StyleConfig {
    /// Reject values the overlay markup cannot carry.
    pub fn validate(&self) -> DrivecamResult<()> {
        let font = self.font_name.trim();
        if font.is_empty() {
            return Err(DrivecamError::validation("font name must not be empty"));
        }
        // Style lines are comma separated.
        if font.contains(',') || font.contains('\n') {
            return Err(DrivecamError::validation(format!(
                "font name '{font}' must not contain commas or newlines"
            )));
        }
        if self.font_size == 0 {
            return Err(DrivecamError::validation("font size must be > 0"));
        }
        if !self.speed_multiplier.is_finite() || self.speed_multiplier <= 0.0 {
            return Err(DrivecamError::validation(format!(
                "speed multiplier must be a positive number, got {}",
                self.speed_multiplier
            )));
        }
        self.colors.validate()
    }

    /// Font size of the speed line.
    pub fn speed_font_size(&self) -> u32 {
        let scaled = (f64::from(self.font_size) * self.speed_multiplier).round();
        (scaled as u32).max(1)
    }
}

/// One `Style:` line of the `[V4+ Styles]` section.
#[derive(Debug, Clone)]
pub struct AssStyle {
    /// Style name referenced by events.
    pub name: String,
    /// Font name.
    pub font_name: String,
    /// Font size.
    pub font_size: u32,
    /// Colours.
    pub colors: AssColors,
    /// Bold.
    pub bold: bool,
    /// Outline width.
    pub outline: f32,
    /// Shadow depth.
    pub shadow: f32,
    /// Alignment (numpad style: 1-9).
    pub alignment: u8,
    /// Margin from left edge.
    pub margin_l: u32,
    /// Margin from right edge.
    pub margin_r: u32,
    /// Margin from the bottom edge.
    pub margin_v: u32,
}

/// Style name of the speed line.
pub const SPEED_STYLE: &str = "Speed";
/// Style name of the date/time/GPS block.
pub const INFO_STYLE: &str = "Info";

impl AssStyle {
    fn base(name: &str, style: &StyleConfig, font_size: u32, margin_v: u32) -> Self {
        Self {
            name: name.to_string(),
            font_name: style.font_name.trim().to_string(),
            font_size,
            colors: style.colors.clone(),
            bold: true,
            outline: 1.0,
            shadow: 2.0,
            alignment: 1, // Bottom left
            margin_l: 20,
            margin_r: 20,
            margin_v,
        }
    }

    /// Large speed readout near the bottom edge.
    pub fn speed(style: &StyleConfig) -> Self {
        Self::base(SPEED_STYLE, style, style.speed_font_size(), 30)
    }

    /// Smaller info block stacked above the speed line.
    pub fn info(style: &StyleConfig) -> Self {
        Self::base(INFO_STYLE, style, style.font_size, 60)
    }

    /// Format as ASS style line
    pub(crate) fn to_ass_line(&self) -> String {
        format!(
            "Style: {},{},{},{},{},{},{},{},0,0,0,100,100,0,0,1,{},{},{},{},{},{},1",
            self.name,
            self.font_name,
            self.font_size,
            self.colors.primary,
            self.colors.secondary,
            self.colors.outline,
            self.colors.back,
            if self.bold { -1 } else { 0 },
            self.outline,
            self.shadow,
            self.alignment,
            self.margin_l,
            self.margin_r,
            self.margin_v
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/style.rs"]
mod tests;
