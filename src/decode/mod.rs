//! Frame sources: ordered RGB24 frames in.

/// `ffprobe`/`ffmpeg`-backed decoding.
pub mod ffmpeg;
/// Generic frame source trait and the in-memory source.
pub mod source;
