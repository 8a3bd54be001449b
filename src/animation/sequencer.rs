use std::sync::Arc;

use crate::animation::clip::{AnimationClip, ClipLibrary, Direction, SpriteFrame};
use crate::foundation::error::{KeeperError, KeeperResult};

/// Default fraction of the clip that plays over a whole video.
pub const DEFAULT_SPEED: f64 = 0.5;
/// Default downward shift of the sprite, as a fraction of its scaled height.
pub const DEFAULT_Y_OFFSET_FRACTION: f64 = 0.25;

/// Timeline parameters fixed for the lifetime of one [`AnimationState`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationParams {
    /// Fraction of the clip that plays across the video, in `(0, 1]`.
    pub speed: f64,
    /// Downward sprite shift as a fraction of scaled sprite height, in `[0, 1)`.
    pub y_offset_fraction: f64,
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            y_offset_fraction: DEFAULT_Y_OFFSET_FRACTION,
        }
    }
}

impl AnimationParams {
    /// Reject parameters outside their documented ranges.
    pub fn validate(&self) -> KeeperResult<()> {
        if !self.speed.is_finite() || self.speed <= 0.0 || self.speed > 1.0 {
            return Err(KeeperError::validation(format!(
                "animation speed must be in (0, 1], got {}",
                self.speed
            )));
        }
        if !self.y_offset_fraction.is_finite()
            || self.y_offset_fraction < 0.0
            || self.y_offset_fraction >= 1.0
        {
            return Err(KeeperError::validation(format!(
                "y_offset_fraction must be in [0, 1), got {}",
                self.y_offset_fraction
            )));
        }
        Ok(())
    }
}

/// Where a sequencer stands in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencerPhase {
    /// No animation has been set for this video.
    Idle,
    /// Frames remain and the clip is non-empty.
    Active,
    /// The frame counter reached the total, or the clip is empty.
    Exhausted,
}

impl SequencerPhase {
    /// Phase of an optional state; `None` is [`SequencerPhase::Idle`].
    pub fn of(state: Option<&AnimationState>) -> Self {
        state.map_or(SequencerPhase::Idle, AnimationState::phase)
    }
}

/// A sprite chosen for the current video frame.
#[derive(Clone, Copy, Debug)]
pub struct SpriteSelection<'a> {
    /// Index into the clip.
    pub index: usize,
    /// The selected sprite.
    pub sprite: &'a SpriteFrame,
}

/// Per-video animation timeline.
///
/// Created by [`ClipLibrary::set_animation`], advanced once per processed frame, dropped with the
/// video. Each concurrently rendered video needs its own state; the clip inside is shared.
#[derive(Clone, Debug)]
pub struct AnimationState {
    clip: Arc<AnimationClip>,
    total_video_frames: u64,
    params: AnimationParams,
    current_video_frame: u64,
}

impl AnimationState {
    /// Start a timeline over `clip` at frame 0.
    pub fn new(
        clip: Arc<AnimationClip>,
        total_video_frames: u64,
        params: AnimationParams,
    ) -> KeeperResult<Self> {
        params.validate()?;
        Ok(Self {
            clip,
            total_video_frames,
            params,
            current_video_frame: 0,
        })
    }

    /// Direction of the clip being played.
    pub fn direction(&self) -> Direction {
        self.clip.direction()
    }

    /// Number of frames already processed.
    pub fn current_video_frame(&self) -> u64 {
        self.current_video_frame
    }

    /// Total video frames the clip is stretched over.
    pub fn total_video_frames(&self) -> u64 {
        self.total_video_frames
    }

    /// Timeline parameters.
    pub fn params(&self) -> AnimationParams {
        self.params
    }

    /// Length of the clip being played.
    pub fn clip_len(&self) -> usize {
        self.clip.len()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SequencerPhase {
        if self.clip.is_empty() || self.current_video_frame >= self.total_video_frames {
            SequencerPhase::Exhausted
        } else {
            SequencerPhase::Active
        }
    }

    /// Advance one video frame and return the sprite to overlay on it, if any.
    ///
    /// The frame counter moves forward on every call, including once exhausted.
    pub fn advance_and_select(&mut self) -> Option<SpriteSelection<'_>> {
        let selected = sprite_index(
            self.current_video_frame,
            self.total_video_frames,
            self.params.speed,
            self.clip.len(),
        );
        self.current_video_frame = self.current_video_frame.saturating_add(1);

        let index = selected?;
        let sprite = self.clip.get(index)?;
        Some(SpriteSelection { index, sprite })
    }
}

/// Sprite index for video frame `current` of `total`, or `None` once exhausted.
///
/// `floor((current / total) * speed * clip_len)`, clamped to the last sprite. Non-decreasing in
/// `current` for fixed `total`, `speed` and `clip_len`.
pub fn sprite_index(current: u64, total: u64, speed: f64, clip_len: usize) -> Option<usize> {
    if clip_len == 0 || current >= total {
        return None;
    }
    let progress = (current as f64 / total as f64) * speed;
    let idx = (progress * clip_len as f64).floor();
    let idx = if idx.is_finite() && idx > 0.0 {
        idx as usize
    } else {
        0
    };
    Some(idx.min(clip_len - 1))
}

impl ClipLibrary {
    /// Start an animation for one video.
    ///
    /// `label` is resolved leniently (unknown labels fall back to `center` with a warning). The
    /// returned state starts at frame 0; this is the only way to reset a timeline.
    pub fn set_animation(
        &self,
        label: &str,
        total_video_frames: u64,
        params: AnimationParams,
    ) -> KeeperResult<AnimationState> {
        let direction = Direction::resolve(label);
        let state = AnimationState::new(self.clip(direction), total_video_frames, params)?;
        tracing::debug!(
            %direction,
            total_video_frames,
            clip_len = state.clip_len(),
            speed = params.speed,
            y_offset_fraction = params.y_offset_fraction,
            "animation set"
        );
        Ok(state)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/sequencer.rs"]
mod tests;
