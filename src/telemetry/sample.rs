use crate::foundation::core::TimeMs;

/// One telemetry record placed on the recording timeline.
///
/// Samples are immutable once built; the loader hands out a fresh `Vec` per run and nothing
/// downstream mutates it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TelemetrySample {
    /// Offset from the start of the recording.
    pub timestamp: TimeMs,
    /// Speed in the native unit (km/h).
    pub speed: Option<f64>,
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    /// Wall-clock date string as recorded.
    pub date: Option<String>,
    /// Wall-clock time string as recorded.
    pub time: Option<String>,
}

impl TelemetrySample {
    /// Create a sample at `timestamp` with no telemetry fields set.
    pub fn new(timestamp: TimeMs) -> Self {
        Self {
            timestamp,
            speed: None,
            latitude: None,
            longitude: None,
            date: None,
            time: None,
        }
    }

    /// Set the native speed.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Set both coordinates.
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Set the wall-clock date string.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Set the wall-clock time string.
    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    /// Latitude and longitude, only when both are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}
