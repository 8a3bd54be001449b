use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::animation::clip::{Direction, SpriteFrame};
use crate::foundation::error::{KeeperError, KeeperResult};

/// Source of sprite sequences, one per dive direction.
///
/// Implementations return frames in playback order. Errors are not fatal to a render: the clip
/// library turns them into empty clips.
pub trait ClipLoader: Send + Sync {
    /// Load the ordered sprite frames for `direction`.
    fn load_clip(&self, direction: Direction) -> KeeperResult<Vec<SpriteFrame>>;
}

/// Loads clips from `<root>/dive_left`, `<root>/dive_center` and `<root>/dive_right`.
///
/// Each folder holds one PNG per sprite frame; frames play in file-name order. Files without a
/// `.png` extension are ignored and undecodable PNGs are skipped with a warning.
#[derive(Clone, Debug)]
pub struct FolderClipLoader {
    root: PathBuf,
}

impl FolderClipLoader {
    /// Loader rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Folder holding the frames for `direction`.
    pub fn clip_dir(&self, direction: Direction) -> PathBuf {
        self.root.join(format!("dive_{}", direction.as_str()))
    }
}

impl ClipLoader for FolderClipLoader {
    fn load_clip(&self, direction: Direction) -> KeeperResult<Vec<SpriteFrame>> {
        let dir = self.clip_dir(direction);
        if !dir.is_dir() {
            return Err(KeeperError::asset(format!(
                "clip folder '{}' not found",
                dir.display()
            )));
        }

        let mut files = Vec::new();
        let entries = std::fs::read_dir(&dir)
            .with_context(|| format!("read clip folder '{}'", dir.display()))?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && is_png(&path) {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut frames = Vec::with_capacity(files.len());
        for path in &files {
            match read_sprite(path) {
                Ok(sprite) => frames.push(sprite),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable sprite");
                }
            }
        }
        tracing::debug!(
            %direction,
            dir = %dir.display(),
            files = files.len(),
            frames = frames.len(),
            "read clip folder"
        );
        Ok(frames)
    }
}

/// Decode one encoded sprite image.
pub fn decode_sprite(bytes: &[u8]) -> KeeperResult<SpriteFrame> {
    let img = image::load_from_memory(bytes).context("decode sprite image from memory")?;
    Ok(SpriteFrame::from_dynamic(img))
}

fn read_sprite(path: &Path) -> KeeperResult<SpriteFrame> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read sprite '{}'", path.display()))?;
    decode_sprite(&bytes)
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

/// Loader serving clips from memory; directions without a clip fail to load.
#[derive(Clone, Debug, Default)]
pub struct InMemoryClipLoader {
    clips: HashMap<Direction, Vec<SpriteFrame>>,
}

impl InMemoryClipLoader {
    /// An empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the frames for `direction`.
    pub fn with_clip(mut self, direction: Direction, frames: Vec<SpriteFrame>) -> Self {
        self.clips.insert(direction, frames);
        self
    }
}

impl ClipLoader for InMemoryClipLoader {
    fn load_clip(&self, direction: Direction) -> KeeperResult<Vec<SpriteFrame>> {
        self.clips
            .get(&direction)
            .cloned()
            .ok_or_else(|| KeeperError::asset(format!("no in-memory clip for '{direction}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
