//! Sprite clips and the video-to-clip timeline.

/// Directions, sprite frames, clips and the shared clip library.
pub mod clip;
/// Per-video animation state and sprite index mapping.
pub mod sequencer;
