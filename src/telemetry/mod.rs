//! Telemetry ingestion: metadata parsing, timeline placement and summaries.

/// Metadata JSON parsing.
pub mod load;
/// Immutable telemetry sample type.
pub mod sample;
/// Metadata overview.
pub mod summary;
/// Record-to-timeline placement and thinning.
pub mod timing;
