//! Unit converters feeding the overlay text.
//!
//! The recorder reports speed in km/h, which is treated as the native unit throughout.

use crate::foundation::error::{DrivecamError, DrivecamResult};

/// Kilometres per statute mile.
pub const KM_PER_MILE: f64 = 1.60934;

/// Coordinate axis, used to pick the hemisphere letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// North/south axis; positive values are `N`.
    Latitude,
    /// East/west axis; positive values are `E`.
    Longitude,
}

impl Axis {
    fn limit(self) -> f64 {
        match self {
            Self::Latitude => 90.0,
            Self::Longitude => 180.0,
        }
    }

    fn hemisphere(self, degrees: f64) -> char {
        match (self, degrees < 0.0) {
            (Self::Latitude, false) => 'N',
            (Self::Latitude, true) => 'S',
            (Self::Longitude, false) => 'E',
            (Self::Longitude, true) => 'W',
        }
    }
}

fn finite_speed(native: f64) -> DrivecamResult<f64> {
    if !native.is_finite() {
        return Err(DrivecamError::invalid_sample(format!(
            "speed must be a finite number, got {native}"
        )));
    }
    Ok(native)
}

/// Convert a native (km/h) speed to miles per hour.
pub fn to_mph(native: f64) -> DrivecamResult<f64> {
    Ok(finite_speed(native)? / KM_PER_MILE)
}

/// Convert a native (km/h) speed to kilometres per hour.
pub fn to_kmh(native: f64) -> DrivecamResult<f64> {
    finite_speed(native)
}

/// Format a native speed as `"62.1 mph (100.0 km/h)"`.
pub fn format_speed(native: f64) -> DrivecamResult<String> {
    let mph = to_mph(native)?;
    let kmh = to_kmh(native)?;
    Ok(format!("{mph:.1} mph ({kmh:.1} km/h)"))
}

/// Format decimal degrees as `"48.137154° N"`.
///
/// Zero is reported as `N` / `E`. Values outside ±90 (latitude) or ±180 (longitude) are
/// rejected.
pub fn format_coordinate(degrees: f64, axis: Axis) -> DrivecamResult<String> {
    validate_coordinate(degrees, axis)?;
    let letter = axis.hemisphere(degrees);
    Ok(format!("{:.6}° {letter}", degrees.abs()))
}

/// Check that `degrees` is a finite value inside the range of `axis`.
pub fn validate_coordinate(degrees: f64, axis: Axis) -> DrivecamResult<()> {
    if !degrees.is_finite() {
        return Err(DrivecamError::invalid_sample(format!(
            "{axis:?} must be a finite number, got {degrees}"
        )));
    }
    if degrees.abs() > axis.limit() {
        return Err(DrivecamError::invalid_sample(format!(
            "{axis:?} {degrees} is outside ±{}",
            axis.limit()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/units.rs"]
mod tests;
