//! Frame buffers and the per-video overlay renderer.

/// RGB8 video frame buffer.
pub mod frame;
/// Detect, guide, sequence and composite, frame by frame.
pub mod pipeline;
