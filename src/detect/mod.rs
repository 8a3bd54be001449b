//! Goal-structure detection: color distance mask, morphological closing, region location.

/// Perceptual color distance and mask thresholding.
pub mod color_distance;
/// Connected-component location of the goal candidate.
pub mod locate;
/// Binary morphology on masks.
pub mod morphology;

use crate::foundation::core::{GoalBox, Rgb8};
use crate::foundation::error::{KeeperError, KeeperResult};
use crate::render::frame::VideoFrame;

/// Default goalpost paint color.
pub const DEFAULT_REFERENCE_COLOR: Rgb8 = Rgb8::new(220, 220, 220);
/// Default normalized-distance threshold.
pub const DEFAULT_THRESHOLD: u8 = 5;
/// Default closing kernel edge length.
pub const DEFAULT_CLOSE_KERNEL: u32 = 7;
/// Default minimum candidate bounding-box area, exclusive.
pub const DEFAULT_MIN_AREA: u64 = 1000;
/// Default minimum candidate aspect ratio (`w / h`), exclusive.
pub const DEFAULT_MIN_ASPECT: f64 = 1.2;

/// Tunables for goal detection.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectConfig {
    /// Color the goal structure is painted in.
    pub reference_color: Rgb8,
    /// A pixel is in the mask iff its normalized distance is strictly below this value.
    pub threshold: u8,
    /// Edge length of the square closing kernel. Must be odd.
    pub close_kernel: u32,
    /// Candidates need a bounding-box area strictly greater than this.
    pub min_area: u64,
    /// Candidates need an aspect ratio strictly greater than this.
    pub min_aspect: f64,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            reference_color: DEFAULT_REFERENCE_COLOR,
            threshold: DEFAULT_THRESHOLD,
            close_kernel: DEFAULT_CLOSE_KERNEL,
            min_area: DEFAULT_MIN_AREA,
            min_aspect: DEFAULT_MIN_ASPECT,
        }
    }
}

impl DetectConfig {
    /// Reject settings the detector cannot run with.
    pub fn validate(&self) -> KeeperResult<()> {
        if self.close_kernel == 0 || self.close_kernel.is_multiple_of(2) {
            return Err(KeeperError::validation(format!(
                "close_kernel must be odd and >= 1, got {}",
                self.close_kernel
            )));
        }
        if !self.min_aspect.is_finite() || self.min_aspect < 0.0 {
            return Err(KeeperError::validation(
                "min_aspect must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// A binary mask with one byte per pixel (`0` or `255`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMask {
    /// Mask width in pixels.
    pub width: u32,
    /// Mask height in pixels.
    pub height: u32,
    /// Row-major samples, `0` (off) or `255` (on).
    pub data: Vec<u8>,
}

impl BinaryMask {
    /// An all-off mask.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    /// Whether `(x, y)` is set.
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.data[(y as usize) * (self.width as usize) + (x as usize)] != 0
    }

    /// Set or clear `(x, y)`.
    pub fn set(&mut self, x: u32, y: u32, on: bool) {
        self.data[(y as usize) * (self.width as usize) + (x as usize)] = if on { 255 } else { 0 };
    }

    /// Number of set pixels.
    pub fn count_on(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

/// Run the full detection chain on one frame.
///
/// `None` means no goal is visible in this frame; it is not an error.
pub fn detect_goal(frame: &VideoFrame, cfg: &DetectConfig) -> Option<GoalBox> {
    let mask = detect_mask(frame, cfg);
    let goal = locate::locate_goal(&mask, cfg.min_area, cfg.min_aspect);
    tracing::trace!(?goal, mask_on = mask.count_on(), "goal detection");
    goal
}

/// Color mask followed by morphological closing.
pub fn detect_mask(frame: &VideoFrame, cfg: &DetectConfig) -> BinaryMask {
    let raw = color_distance::color_mask(frame, cfg.reference_color, cfg.threshold);
    morphology::close(&raw, cfg.close_kernel)
}

#[cfg(test)]
#[path = "../../tests/unit/detect/detect.rs"]
mod tests;
