//! Sprite compositing.

/// Scale, place, clip and alpha-blend sprites onto frames.
pub mod composite;
