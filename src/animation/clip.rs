use std::str::FromStr;
use std::sync::Arc;

use crate::assets::loader::ClipLoader;
use crate::foundation::error::KeeperError;

/// Dive direction predicted for the kick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Keeper dives to the left third.
    Left,
    /// Keeper stays in the center third.
    Center,
    /// Keeper dives to the right third.
    Right,
}

impl Direction {
    /// All directions in left-to-right order.
    pub const ALL: [Direction; 3] = [Direction::Left, Direction::Center, Direction::Right];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Center => "center",
            Direction::Right => "right",
        }
    }

    /// Resolve a collaborator-supplied label, case-insensitively.
    ///
    /// Anything other than `left`/`center`/`right` resolves to [`Direction::Center`] with a warning.
    /// Use [`str::parse`] instead to get an error for unknown labels.
    pub fn resolve(label: &str) -> Self {
        match label.parse() {
            Ok(d) => d,
            Err(_) => {
                tracing::warn!(label, "unknown direction label, using 'center'");
                Direction::Center
            }
        }
    }
}

impl FromStr for Direction {
    type Err = KeeperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Direction::Left),
            "center" => Ok(Direction::Center),
            "right" => Ok(Direction::Right),
            _ => Err(KeeperError::validation(format!(
                "unknown direction '{s}' (expected left, center or right)"
            ))),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pre-rendered sprite image, stored as straight-alpha RGBA8.
#[derive(Clone, Debug)]
pub struct SpriteFrame {
    pixels: image::RgbaImage,
    has_alpha: bool,
}

impl SpriteFrame {
    /// Wrap a decoded image, recording whether it carried an alpha channel.
    pub fn from_dynamic(img: image::DynamicImage) -> Self {
        let has_alpha = img.color().has_alpha();
        Self {
            pixels: img.into_rgba8(),
            has_alpha,
        }
    }

    /// Wrap an RGBA buffer; the alpha channel is taken as meaningful.
    pub fn from_rgba(pixels: image::RgbaImage) -> Self {
        Self {
            pixels,
            has_alpha: true,
        }
    }

    /// Wrap an RGB buffer with no alpha channel.
    pub fn from_rgb(pixels: image::RgbImage) -> Self {
        Self::from_dynamic(image::DynamicImage::ImageRgb8(pixels))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Whether the source image had an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// Straight-alpha RGBA8 pixels.
    pub fn pixels(&self) -> &image::RgbaImage {
        &self.pixels
    }
}

/// Ordered, immutable sprite sequence for one direction.
#[derive(Clone, Debug)]
pub struct AnimationClip {
    direction: Direction,
    frames: Vec<SpriteFrame>,
}

impl AnimationClip {
    /// Build a clip from frames in playback order.
    pub fn new(direction: Direction, frames: Vec<SpriteFrame>) -> Self {
        Self { direction, frames }
    }

    /// An empty clip; selecting from it always yields no overlay.
    pub fn empty(direction: Direction) -> Self {
        Self::new(direction, Vec::new())
    }

    /// Direction this clip animates.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of sprite frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the clip has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Sprite frame at `idx`.
    pub fn get(&self, idx: usize) -> Option<&SpriteFrame> {
        self.frames.get(idx)
    }
}

/// The three direction clips, loaded once and shared read-only.
///
/// Cloning is cheap; clips are reference counted and can back any number of concurrent renders.
#[derive(Clone, Debug)]
pub struct ClipLibrary {
    left: Arc<AnimationClip>,
    center: Arc<AnimationClip>,
    right: Arc<AnimationClip>,
}

impl ClipLibrary {
    /// Build a library from already-loaded clips.
    pub fn new(left: AnimationClip, center: AnimationClip, right: AnimationClip) -> Self {
        Self {
            left: Arc::new(left),
            center: Arc::new(center),
            right: Arc::new(right),
        }
    }

    /// Load all three clips through `loader`.
    ///
    /// A direction whose load fails gets an empty clip and a warning; the library itself always
    /// builds.
    pub fn load(loader: &dyn ClipLoader) -> Self {
        let load = |direction: Direction| match loader.load_clip(direction) {
            Ok(frames) => {
                tracing::debug!(%direction, frames = frames.len(), "loaded clip");
                if frames.is_empty() {
                    tracing::warn!(%direction, "clip has no frames; overlay disabled for it");
                }
                AnimationClip::new(direction, frames)
            }
            Err(err) => {
                tracing::warn!(%direction, error = %err, "clip load failed; using empty clip");
                AnimationClip::empty(direction)
            }
        };
        let [left, center, right] = Direction::ALL.map(load);
        Self::new(left, center, right)
    }

    /// Shared handle to the clip for `direction`.
    pub fn clip(&self, direction: Direction) -> Arc<AnimationClip> {
        match direction {
            Direction::Left => Arc::clone(&self.left),
            Direction::Center => Arc::clone(&self.center),
            Direction::Right => Arc::clone(&self.right),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clip.rs"]
mod tests;
