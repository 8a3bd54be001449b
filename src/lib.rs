//! keeperviz overlays an animated goalkeeper onto penalty-kick footage.
//!
//! Per frame, the goal structure is located by perceptual color distance to its paint color, a
//! sprite is picked from the dive clip for the predicted direction, and the sprite is alpha-blended
//! onto the goal's bottom edge. The public API is stream-oriented:
//!
//! - Load a [`ClipLibrary`] once through a [`ClipLoader`]
//! - Start a per-video [`AnimationState`] with [`ClipLibrary::set_animation`]
//! - Stream a [`FrameSource`] through a [`VideoRenderer`] into a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Dive directions, sprite clips and the video-to-clip timeline.
pub mod animation;
/// Sprite asset loading.
pub mod assets;
/// JSON configuration and prediction sidecars.
pub mod config;
/// Frame sources.
pub mod decode;
/// Goal detection.
pub mod detect;
/// Sprite compositing.
pub mod effects;
/// Encoding sinks.
pub mod encode;
/// Core types, errors and channel math.
pub mod foundation;
/// Region partition and diagnostic guides.
pub mod guide;
/// Frame buffers and the per-video renderer.
pub mod render;

mod process;

pub use crate::foundation::core::{Fps, FrameIndex, GoalBox, Rgb8};
pub use crate::foundation::error::{KeeperError, KeeperResult};

pub use crate::animation::clip::{AnimationClip, ClipLibrary, Direction, SpriteFrame};
pub use crate::animation::sequencer::{
    AnimationParams, AnimationState, SequencerPhase, SpriteSelection, sprite_index,
};
pub use crate::assets::loader::{ClipLoader, FolderClipLoader, InMemoryClipLoader};
pub use crate::config::{GuideConfig, OverlayConfig};
pub use crate::decode::ffmpeg::{FfmpegSource, probe_video};
pub use crate::decode::source::{FrameSource, InMemorySource, SourceInfo};
pub use crate::detect::{BinaryMask, DetectConfig, detect_goal, detect_mask};
pub use crate::effects::composite::{CompositeOutcome, SpritePlacement, composite_sprite};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::guide::overlay::{GuideOverlay, RegionLabels};
pub use crate::guide::partition::{GoalRegions, RegionSpan};
pub use crate::render::frame::VideoFrame;
pub use crate::render::pipeline::{FrameReport, RenderStats, VideoRenderer};
