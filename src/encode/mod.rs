//! Encoding sinks.
//!
//! Sinks consume composed frames in stream order and are driven by
//! [`crate::render::pipeline::VideoRenderer::render`].

/// `ffmpeg`-based sinks (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
