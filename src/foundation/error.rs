/// Convenience result type used across drivecam.
pub type DrivecamResult<T> = Result<T, DrivecamError>;

/// Top-level error taxonomy used by the conversion core and orchestrator.
#[derive(thiserror::Error, Debug)]
pub enum DrivecamError {
    /// Video duration is zero, negative or not a finite number.
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// Trim window clamps to an empty output timeline.
    #[error("empty timeline: {0}")]
    EmptyTimeline(String),

    /// Malformed numeric field in a telemetry record.
    #[error("invalid sample: {0}")]
    InvalidSample(String),

    /// Computed crop rectangle does not fit inside the source frame.
    #[error("invalid crop geometry: {0}")]
    InvalidCropGeometry(String),

    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure while running or reading back `ffmpeg` / `ffprobe`.
    #[error("tool error: {0}")]
    Tool(String),

    /// Errors when serializing or deserializing metadata or configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DrivecamError {
    /// Build a [`DrivecamError::InvalidDuration`] value.
    pub fn invalid_duration(msg: impl Into<String>) -> Self {
        Self::InvalidDuration(msg.into())
    }

    /// Build a [`DrivecamError::EmptyTimeline`] value.
    pub fn empty_timeline(msg: impl Into<String>) -> Self {
        Self::EmptyTimeline(msg.into())
    }

    /// Build a [`DrivecamError::InvalidSample`] value.
    pub fn invalid_sample(msg: impl Into<String>) -> Self {
        Self::InvalidSample(msg.into())
    }

    /// Build a [`DrivecamError::InvalidCropGeometry`] value.
    pub fn invalid_crop(msg: impl Into<String>) -> Self {
        Self::InvalidCropGeometry(msg.into())
    }

    /// Build a [`DrivecamError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DrivecamError::Tool`] value.
    pub fn tool(msg: impl Into<String>) -> Self {
        Self::Tool(msg.into())
    }

    /// Build a [`DrivecamError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
