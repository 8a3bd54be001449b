//! Diagnostic partition of a detected goal into left/center/right regions.

/// SVG-rasterized guide drawing.
pub mod overlay;
/// Region geometry.
pub mod partition;
