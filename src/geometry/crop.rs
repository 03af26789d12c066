use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{DrivecamError, DrivecamResult};

/// Selectable framing region of the recorder's 2x2 camera grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CropQuadrant {
    /// Keep the full frame.
    #[default]
    None,
    /// Upper-left quarter.
    TopLeft,
    /// Upper-right quarter.
    TopRight,
    /// Lower-left quarter.
    BottomLeft,
    /// Lower-right quarter.
    BottomRight,
}

impl CropQuadrant {
    /// All quadrants in index order.
    pub const ALL: [CropQuadrant; 5] = [
        Self::None,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Map the configuration index (`0` = full frame, `1..=4` = quadrants).
    pub fn from_index(index: u8) -> DrivecamResult<Self> {
        Self::ALL.get(usize::from(index)).copied().ok_or_else(|| {
            DrivecamError::validation(format!("crop quadrant must be 0-4, got {index}"))
        })
    }

    /// Configuration index of this quadrant.
    pub fn index(self) -> u8 {
        match self {
            Self::None => 0,
            Self::TopLeft => 1,
            Self::TopRight => 2,
            Self::BottomLeft => 3,
            Self::BottomRight => 4,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for CropQuadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CropQuadrant {
    type Err = DrivecamError;

    /// Accepts the numeric index or the kebab-case name (`full` is an alias of `none`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if let Ok(index) = s.parse::<u8>() {
            return Self::from_index(index);
        }
        if s == "full" {
            return Ok(Self::None);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|q| q.name() == s)
            .ok_or_else(|| DrivecamError::validation(format!("unknown crop quadrant '{s}'")))
    }
}

/// Pixel rectangle inside the source frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CropRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Resolved crop for one source frame size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropSpec {
    /// Requested quadrant.
    pub quadrant: CropQuadrant,
    /// Source frame width.
    pub source_width: u32,
    /// Source frame height.
    pub source_height: u32,
    /// Output rectangle; the whole frame for [`CropQuadrant::None`].
    pub rect: CropRect,
}

impl CropSpec {
    /// `true` when no cropping should be applied downstream.
    pub fn is_full_frame(&self) -> bool {
        self.quadrant == CropQuadrant::None
    }

    /// `ffmpeg` crop filter, or `None` when the full frame is kept.
    pub fn filter(&self) -> Option<String> {
        if self.is_full_frame() {
            return None;
        }
        let r = self.rect;
        Some(format!("crop={}:{}:{}:{}", r.width, r.height, r.x, r.y))
    }
}

/// Compute the crop rectangle of `quadrant` within a `source_width` x `source_height` frame.
///
/// Halves are found by integer division: the left/top origin takes the floor, so with odd
/// dimensions the right/bottom half absorbs the extra pixel.
pub fn resolve_crop(
    quadrant: CropQuadrant,
    source_width: u32,
    source_height: u32,
) -> DrivecamResult<CropSpec> {
    if source_width == 0 || source_height == 0 {
        return Err(DrivecamError::invalid_crop(format!(
            "source frame {source_width}x{source_height} is empty"
        )));
    }

    let half_w = source_width / 2;
    let half_h = source_height / 2;
    let right_w = source_width - half_w;
    let bottom_h = source_height - half_h;

    let rect = match quadrant {
        CropQuadrant::None => CropRect {
            x: 0,
            y: 0,
            width: source_width,
            height: source_height,
        },
        CropQuadrant::TopLeft => CropRect {
            x: 0,
            y: 0,
            width: half_w,
            height: half_h,
        },
        CropQuadrant::TopRight => CropRect {
            x: half_w,
            y: 0,
            width: right_w,
            height: half_h,
        },
        CropQuadrant::BottomLeft => CropRect {
            x: 0,
            y: half_h,
            width: half_w,
            height: bottom_h,
        },
        CropQuadrant::BottomRight => CropRect {
            x: half_w,
            y: half_h,
            width: right_w,
            height: bottom_h,
        },
    };

    let fits_x = rect.x.checked_add(rect.width).is_some_and(|e| e <= source_width);
    let fits_y = rect.y.checked_add(rect.height).is_some_and(|e| e <= source_height);
    if rect.width == 0 || rect.height == 0 || !fits_x || !fits_y {
        return Err(DrivecamError::invalid_crop(format!(
            "{quadrant} crop {}x{}+{}+{} does not fit a {source_width}x{source_height} frame",
            rect.width, rect.height, rect.x, rect.y
        )));
    }

    Ok(CropSpec {
        quadrant,
        source_width,
        source_height,
        rect,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/crop.rs"]
mod tests;
