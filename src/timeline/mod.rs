//! Timeline synchronizer: maps sparse telemetry samples onto the video timeline.

/// Sample-to-interval synchronization.
pub mod sync;
