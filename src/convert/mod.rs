//! Conversion orchestrator: probing, `ffmpeg` invocation and the end-to-end pipeline.

/// Run configuration.
pub mod config;
/// `ffmpeg` command construction and execution.
pub mod ffmpeg;
/// Probe → synchronize → render → transcode.
pub mod pipeline;
/// `ffprobe` stream inspection.
pub mod probe;
