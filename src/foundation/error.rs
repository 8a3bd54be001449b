/// Convenience result type used across keeperviz.
pub type KeeperResult<T> = Result<T, KeeperError>;

/// Top-level error taxonomy used by keeperviz APIs.
///
/// Conditions the overlay pipeline treats as degraded-but-fine (no goal detected, empty clips,
/// sprites clipped away, missing alpha) are never reported through this type.
#[derive(thiserror::Error, Debug)]
pub enum KeeperError {
    /// Invalid user-provided configuration or call arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while reading or decoding sprite assets.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors from the video decode/encode collaborators (`ffmpeg`, `ffprobe`, in-memory streams).
    #[error("media error: {0}")]
    Media(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KeeperError {
    /// Build a [`KeeperError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`KeeperError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`KeeperError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`KeeperError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
