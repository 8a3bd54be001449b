use std::collections::VecDeque;

use crate::foundation::core::Fps;
use crate::foundation::error::{KeeperError, KeeperResult};
use crate::render::frame::VideoFrame;

/// Stream metadata reported by a [`FrameSource`] before decoding starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SourceInfo {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Stream frame rate.
    pub fps: Fps,
    /// Number of frames the stream will yield.
    pub frame_count: u64,
}

/// Source contract for producing background frames in stream order.
///
/// Every frame has the dimensions reported by [`FrameSource::info`]. `Ok(None)` marks the end of
/// the stream.
pub trait FrameSource: Send {
    /// Stream metadata.
    fn info(&self) -> SourceInfo;
    /// Next frame, or `None` once the stream is exhausted.
    fn next_frame(&mut self) -> KeeperResult<Option<VideoFrame>>;
}

/// In-memory source for tests and debugging.
#[derive(Debug)]
pub struct InMemorySource {
    info: SourceInfo,
    frames: VecDeque<VideoFrame>,
}

impl InMemorySource {
    /// Serve `frames` at `fps`. All frames must share the given dimensions.
    pub fn new(width: u32, height: u32, fps: Fps, frames: Vec<VideoFrame>) -> KeeperResult<Self> {
        if let Some((i, f)) = frames
            .iter()
            .enumerate()
            .find(|(_, f)| f.width != width || f.height != height)
        {
            return Err(KeeperError::validation(format!(
                "in-memory frame {i} is {}x{}, expected {width}x{height}",
                f.width, f.height
            )));
        }
        Ok(Self {
            info: SourceInfo {
                width,
                height,
                fps,
                frame_count: frames.len() as u64,
            },
            frames: frames.into(),
        })
    }

    /// Frames not yet handed out.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for InMemorySource {
    fn info(&self) -> SourceInfo {
        self.info
    }

    fn next_frame(&mut self) -> KeeperResult<Option<VideoFrame>> {
        Ok(self.frames.pop_front())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/decode/source.rs"]
mod tests;
