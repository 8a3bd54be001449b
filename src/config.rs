use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::animation::sequencer::AnimationParams;
use crate::detect::DetectConfig;
use crate::foundation::error::{KeeperError, KeeperResult};
use crate::guide::overlay::RegionLabels;

/// Diagnostic guide settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuideConfig {
    /// Draw the goal outline and region separators on every frame.
    pub enabled: bool,
    /// Region labels drawn when guides are enabled.
    pub labels: RegionLabels,
}

/// Full overlay configuration, usually read from a JSON file.
///
/// Every field is optional; missing fields take their defaults and unknown fields are rejected.
///
/// ```json
/// {
///   "detection": { "threshold": 4, "close_kernel": 7 },
///   "animation": { "speed": 0.5, "y_offset_fraction": 0.25 },
///   "guides": { "enabled": true, "labels": { "left": "L", "right": "R" } }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    /// Goal detection settings.
    pub detection: DetectConfig,
    /// Sprite timeline settings.
    pub animation: AnimationParams,
    /// Diagnostic guide settings.
    pub guides: GuideConfig,
}

impl OverlayConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> KeeperResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| KeeperError::serde(format!("overlay config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: &Path) -> KeeperResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read overlay config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Validate every section.
    pub fn validate(&self) -> KeeperResult<()> {
        self.detection.validate()?;
        self.animation.validate()?;
        Ok(())
    }
}

/// `<dir>/<stem>_prediction.txt` for a video at `<dir>/<stem>.<ext>`.
pub fn prediction_sidecar_path(video_path: &Path) -> PathBuf {
    let stem = video_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    video_path.with_file_name(format!("{stem}_prediction.txt"))
}

/// Read a direction label from a prediction file.
///
/// Returns the trimmed file content, or `None` when the file does not exist. The label is not
/// validated here; [`crate::ClipLibrary::set_animation`] resolves it.
pub fn read_prediction(path: &Path) -> KeeperResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text.trim().to_owned())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(anyhow::Error::new(e)
            .context(format!("read prediction '{}'", path.display()))
            .into()),
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
