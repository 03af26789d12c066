use std::path::Path;

use anyhow::Context as _;
use serde_json::{Map, Value};

use crate::foundation::core::TimeMs;
use crate::foundation::error::{DrivecamError, DrivecamResult};
use crate::units::{Axis, validate_coordinate};

/// VIN reported when the metadata file does not carry one.
pub const UNKNOWN_VIN: &str = "Unknown";

/// One parsed metadata record, before it is placed on the timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct TelemetryRecord {
    /// Position of the record in the metadata file (0-based, counting skipped records).
    pub index: usize,
    /// Explicit offset from recording start, when the record carries one.
    pub offset: Option<TimeMs>,
    /// Speed in km/h.
    pub speed: Option<f64>,
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    /// Wall-clock date string.
    pub date: Option<String>,
    /// Wall-clock time string.
    pub time: Option<String>,
}

/// Contents of a drive recorder metadata file.
#[derive(Clone, Debug)]
pub struct Metadata {
    /// Vehicle identification number, or [`UNKNOWN_VIN`].
    pub vin: String,
    /// Well-formed records in file order.
    pub records: Vec<TelemetryRecord>,
    /// Number of malformed records that were skipped.
    pub skipped: usize,
}

impl Metadata {
    /// Read and parse a metadata JSON file.
    pub fn from_path(path: &Path) -> DrivecamResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read metadata '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse metadata JSON.
    ///
    /// The document is either an object with `entries` (and optionally `VIN`) or a non-empty
    /// array whose first element is such an object. Malformed records are skipped with a
    /// warning; a document that is not shaped like metadata at all is an error.
    pub fn from_json_str(text: &str) -> DrivecamResult<Self> {
        let doc: Value = serde_json::from_str(text)
            .map_err(|e| DrivecamError::serde(format!("metadata json parse failed: {e}")))?;

        let root = match &doc {
            Value::Array(items) => items
                .first()
                .ok_or_else(|| DrivecamError::serde("metadata array is empty"))?,
            other => other,
        };
        let root = root
            .as_object()
            .ok_or_else(|| DrivecamError::serde("metadata root must be a JSON object"))?;

        let vin = match root.get("VIN") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_owned(),
            _ => UNKNOWN_VIN.to_owned(),
        };

        let entries = match root.get("entries") {
            None | Some(Value::Null) => &[][..],
            Some(Value::Array(items)) => items.as_slice(),
            Some(_) => return Err(DrivecamError::serde("metadata 'entries' must be an array")),
        };

        let mut records = Vec::with_capacity(entries.len());
        let mut skipped = 0usize;
        for (index, entry) in entries.iter().enumerate() {
            match parse_record(index, entry) {
                Ok(record) => records.push(record),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!("skipping telemetry record {index}: {e}");
                }
            }
        }

        Ok(Self {
            vin,
            records,
            skipped,
        })
    }
}

fn parse_record(index: usize, entry: &Value) -> DrivecamResult<TelemetryRecord> {
    let obj = entry
        .as_object()
        .ok_or_else(|| DrivecamError::invalid_sample("record is not a JSON object"))?;

    let offset = match number_field(obj, "timestamp")? {
        Some(secs) if secs < 0.0 => {
            return Err(DrivecamError::invalid_sample(format!(
                "'timestamp' must be non-negative, got {secs}"
            )));
        }
        Some(secs) => Some(
            TimeMs::from_secs_f64(secs).map_err(|e| DrivecamError::invalid_sample(e.to_string()))?,
        ),
        None => None,
    };

    let latitude = number_field(obj, "latitude")?;
    if let Some(lat) = latitude {
        validate_coordinate(lat, Axis::Latitude)?;
    }
    let longitude = number_field(obj, "longitude")?;
    if let Some(lon) = longitude {
        validate_coordinate(lon, Axis::Longitude)?;
    }

    Ok(TelemetryRecord {
        index,
        offset,
        speed: number_field(obj, "velocity")?,
        latitude,
        longitude,
        date: text_field(obj, "date")?,
        time: text_field(obj, "time")?,
    })
}

/// Numeric field; numeric strings are accepted, `null` and absence mean "no value".
fn number_field(obj: &Map<String, Value>, key: &str) -> DrivecamResult<Option<f64>> {
    let value = match obj.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match value {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(DrivecamError::invalid_sample(format!(
            "'{key}' is not a finite number: {}",
            obj.get(key).map(Value::to_string).unwrap_or_default()
        ))),
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> DrivecamResult<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_owned())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(DrivecamError::invalid_sample(format!(
            "'{key}' must be a string, got {other}"
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/telemetry/load.rs"]
mod tests;
