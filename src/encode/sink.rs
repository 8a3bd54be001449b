use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{KeeperError, KeeperResult};
use crate::render::frame::VideoFrame;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming composed frames in stream order.
///
/// Ordering contract: `push_frame` is called with strictly increasing `FrameIndex`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> KeeperResult<()>;
    /// Push one frame in strictly increasing order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &VideoFrame) -> KeeperResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> KeeperResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, VideoFrame)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, VideoFrame)] {
        &self.frames
    }

    /// Whether `end` was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> KeeperResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &VideoFrame) -> KeeperResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| KeeperError::media("in-memory sink not started"))?;
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(KeeperError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if let Some((last, _)) = self.frames.last()
            && idx.0 <= last.0
        {
            return Err(KeeperError::media("sink received out-of-order frame index"));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> KeeperResult<()> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
