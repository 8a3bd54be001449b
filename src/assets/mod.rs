//! Sprite asset loading.

/// Clip loaders (folder-backed and in-memory).
pub mod loader;
