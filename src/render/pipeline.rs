use crate::animation::sequencer::AnimationState;
use crate::decode::source::FrameSource;
use crate::detect::{DetectConfig, detect_goal};
use crate::effects::composite::{CompositeOutcome, composite_sprite};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, GoalBox};
use crate::foundation::error::{KeeperError, KeeperResult};
use crate::guide::overlay::GuideOverlay;
use crate::render::frame::VideoFrame;

/// What happened to one frame in [`VideoRenderer::process_frame`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// Detected goal box, if any.
    pub goal: Option<GoalBox>,
    /// Sprite index selected by the sequencer, if any.
    pub sprite_index: Option<usize>,
    /// Compositing result; `None` when no composite was attempted.
    pub composite: Option<CompositeOutcome>,
}

/// Whole-video render counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames read from the source and pushed to the sink.
    pub frames_total: u64,
    /// Frames where a goal box was found.
    pub frames_detected: u64,
    /// Frames where a sprite was actually blended.
    pub frames_composited: u64,
}

/// Per-video overlay renderer.
///
/// Holds only immutable configuration; the animation timeline lives in the caller-owned
/// [`AnimationState`], so one renderer can serve many videos.
#[derive(Clone, Debug, Default)]
pub struct VideoRenderer {
    detect: DetectConfig,
    guides: Option<GuideOverlay>,
}

impl VideoRenderer {
    /// Renderer with the given detection settings and no guide overlay.
    pub fn new(detect: DetectConfig) -> KeeperResult<Self> {
        detect.validate()?;
        Ok(Self {
            detect,
            guides: None,
        })
    }

    /// Draw the region guides on every frame with a detected goal.
    pub fn with_guides(mut self, guides: GuideOverlay) -> Self {
        self.guides = Some(guides);
        self
    }

    /// Process one frame in place.
    ///
    /// The sequencer is advanced exactly once per call whether or not a goal is found, so sprite
    /// timing tracks the video rather than detection hits.
    pub fn process_frame(
        &self,
        frame: &mut VideoFrame,
        state: Option<&mut AnimationState>,
    ) -> KeeperResult<FrameReport> {
        let goal = detect_goal(frame, &self.detect);

        if let Some(guides) = &self.guides {
            guides.draw(frame, goal)?;
        }

        let mut report = FrameReport {
            goal,
            sprite_index: None,
            composite: None,
        };
        let Some(state) = state else {
            return Ok(report);
        };

        let y_offset_fraction = state.params().y_offset_fraction;
        let Some(selection) = state.advance_and_select() else {
            return Ok(report);
        };
        report.sprite_index = Some(selection.index);

        if let Some(goal) = goal {
            let outcome = composite_sprite(frame, goal, selection.sprite, y_offset_fraction);
            tracing::trace!(?goal, index = selection.index, ?outcome, "sprite composited");
            report.composite = Some(outcome);
        }
        Ok(report)
    }

    /// Stream every frame of `source` through [`Self::process_frame`] into `sink`.
    ///
    /// The sink sees the source's dimensions and frame rate, and exactly as many frames as the
    /// source yields.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn render(
        &self,
        source: &mut dyn FrameSource,
        mut state: Option<AnimationState>,
        sink: &mut dyn FrameSink,
    ) -> KeeperResult<RenderStats> {
        let info = source.info();
        sink.begin(SinkConfig {
            width: info.width,
            height: info.height,
            fps: info.fps,
        })?;

        let mut stats = RenderStats::default();
        while let Some(mut frame) = source.next_frame()? {
            if frame.width != info.width || frame.height != info.height {
                return Err(KeeperError::media(format!(
                    "source frame {} is {}x{}, expected {}x{}",
                    stats.frames_total, frame.width, frame.height, info.width, info.height
                )));
            }

            let report = self.process_frame(&mut frame, state.as_mut())?;
            if report.goal.is_some() {
                stats.frames_detected += 1;
            }
            if report.composite.is_some_and(CompositeOutcome::is_applied) {
                stats.frames_composited += 1;
            }
            tracing::debug!(
                frame = stats.frames_total,
                goal = ?report.goal,
                sprite = ?report.sprite_index,
                "frame processed"
            );

            sink.push_frame(FrameIndex(stats.frames_total), &frame)?;
            stats.frames_total += 1;
        }
        sink.end()?;

        if stats.frames_total != info.frame_count {
            tracing::warn!(
                expected = info.frame_count,
                actual = stats.frames_total,
                "source yielded a different frame count than it reported"
            );
        }
        tracing::info!(
            frames = stats.frames_total,
            detected = stats.frames_detected,
            composited = stats.frames_composited,
            "render finished"
        );
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
