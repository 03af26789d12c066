//! Geometry resolver: crop rectangles and trim windows.

/// Quadrant crop rectangles.
pub mod crop;
/// Trim window clamping.
pub mod trim;
