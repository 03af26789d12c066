//! Overlay renderer: turns display intervals into ASS subtitle markup.

/// ASS document generation.
pub mod render;
/// Fonts, colours and enabled fields.
pub mod style;
