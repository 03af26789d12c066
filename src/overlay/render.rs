use crate::foundation::core::TimeMs;
use crate::foundation::error::DrivecamResult;
use crate::overlay::style::{AssStyle, INFO_STYLE, OverlayField, SPEED_STYLE, StyleConfig};
use crate::telemetry::sample::TelemetrySample;
use crate::timeline::sync::DisplayInterval;
use crate::units::{self, Axis};

/// `[Script Info]` values of an overlay document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayHeader {
    /// Script title.
    pub title: String,
    /// Script resolution, normally the output frame size.
    pub play_res: Option<(u32, u32)>,
}

impl OverlayHeader {
    /// Header for a recording from vehicle `vin`.
    pub fn for_vin(vin: &str) -> Self {
        Self {
            title: format!("Drive Recorder – VIN: {}", vin.trim()),
            play_res: None,
        }
    }

    /// Set the script resolution.
    #[must_use]
    pub fn with_play_res(mut self, width: u32, height: u32) -> Self {
        self.play_res = Some((width, height));
        self
    }
}

/// Rendered overlay markup plus counters for reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayDocument {
    /// Complete ASS script.
    pub markup: String,
    /// Number of `Dialogue:` events written.
    pub events: usize,
    /// Intervals too short to survive centisecond rounding.
    pub collapsed: usize,
}

/// Format a timeline offset as an ASS timestamp (`H:MM:SS.cc`, truncated).
pub fn format_ass_time(t: TimeMs) -> String {
    let ms = t.as_millis();
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let centis = (ms % 1000) / 10;
    format!("{hours}:{minutes:02}:{seconds:02}.{centis:02}")
}

/// Word joiner placed after a literal backslash so it cannot start `\N`, `\n` or `\h`.
const BACKSLASH_BREAK: &str = "\\\u{2060}";

/// Neutralize characters that ASS would interpret as override tags or line breaks.
///
/// libass has no escape for a backslash itself, so a zero-width word joiner follows every
/// literal `\`. Braces become `\{` / `\}`.
pub fn escape_text(text: &str) -> String {
    text.replace('\r', "")
        .replace('\\', BACKSLASH_BREAK)
        .replace('{', "\\{")
        .replace('}', "\\}")
        .replace('\n', "\\N")
}

/// Render display intervals as an ASS script.
///
/// Only fields enabled in `style` and present on the interval's sample are written; a missing
/// value produces no line at all. Placeholder intervals emit nothing.
#[tracing::instrument(skip_all, fields(intervals = intervals.len()))]
pub fn render(
    intervals: &[DisplayInterval<'_>],
    style: &StyleConfig,
    header: &OverlayHeader,
) -> DrivecamResult<OverlayDocument> {
    style.validate()?;

    let mut markup = script_header(style, header);
    let mut events = 0usize;
    let mut collapsed = 0usize;

    for interval in intervals {
        let Some(sample) = interval.sample else {
            continue;
        };
        let start = format_ass_time(interval.start);
        let end = format_ass_time(interval.end);
        if start == end {
            collapsed += 1;
            continue;
        }

        let block = TextBlock::of(sample, style)?;
        if let Some(speed) = block.speed {
            push_dialogue(&mut markup, &start, &end, SPEED_STYLE, &speed);
            events += 1;
        }
        if !block.info.is_empty() {
            let text = block
                .info
                .iter()
                .map(|l| escape_text(l))
                .collect::<Vec<_>>()
                .join("\\N");
            push_dialogue(&mut markup, &start, &end, INFO_STYLE, &text);
            events += 1;
        }
    }

    if collapsed > 0 {
        tracing::debug!(collapsed, "skipped intervals shorter than one centisecond");
    }
    tracing::debug!(events, "overlay rendered");

    Ok(OverlayDocument {
        markup,
        events,
        collapsed,
    })
}

/// Per-interval display text before markup.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct TextBlock {
    pub(crate) speed: Option<String>,
    pub(crate) info: Vec<String>,
}

impl TextBlock {
    pub(crate) fn of(sample: &TelemetrySample, style: &StyleConfig) -> DrivecamResult<Self> {
        let fields = &style.enabled_fields;
        let mut block = Self::default();

        if fields.contains(OverlayField::Speed)
            && let Some(kmh) = sample.speed
        {
            block.speed = Some(escape_text(&units::format_speed(kmh)?));
        }

        let date = sample
            .date
            .as_deref()
            .map(str::trim)
            .filter(|d| fields.contains(OverlayField::Date) && !d.is_empty());
        let time = sample
            .time
            .as_deref()
            .map(str::trim)
            .filter(|t| fields.contains(OverlayField::Time) && !t.is_empty());
        match (date, time) {
            (Some(d), Some(t)) => block.info.push(format!("{d} @ {t}")),
            (Some(d), None) => block.info.push(format!("Date: {d}")),
            (None, Some(t)) => block.info.push(format!("Time: {t}")),
            (None, None) => {}
        }

        if fields.contains(OverlayField::Coordinates)
            && let Some((lat, lon)) = sample.coordinates()
        {
            block.info.push(format!(
                "GPS: {}, {}",
                units::format_coordinate(lat, Axis::Latitude)?,
                units::format_coordinate(lon, Axis::Longitude)?
            ));
        }

        Ok(block)
    }
}

/// `[Script Info]` values are not tag-parsed; only line breaks need removing.
fn header_value(text: &str) -> String {
    text.replace('\r', "").replace('\n', " ")
}

fn script_header(style: &StyleConfig, header: &OverlayHeader) -> String {
    let mut lines = vec![
        "[Script Info]".to_string(),
        format!("Title: {}", header_value(&header.title)),
        "ScriptType: v4.00+".to_string(),
    ];
    if let Some((w, h)) = header.play_res {
        lines.push(format!("PlayResX: {w}"));
        lines.push(format!("PlayResY: {h}"));
    }
    lines.push("ScaledBorderAndShadow: yes".to_string());
    lines.push(String::new());

    lines.push("[V4+ Styles]".to_string());
    lines.push(
        "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, \
         OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, \
         ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, \
         MarginL, MarginR, MarginV, Encoding"
            .to_string(),
    );
    lines.push(AssStyle::speed(style).to_ass_line());
    lines.push(AssStyle::info(style).to_ass_line());
    lines.push(String::new());

    lines.push("[Events]".to_string());
    lines.push(
        "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text"
            .to_string(),
    );

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn push_dialogue(out: &mut String, start: &str, end: &str, style: &str, text: &str) {
    out.push_str(&format!("Dialogue: 0,{start},{end},{style},,0,0,0,,{text}\n"));
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/render.rs"]
mod tests;
