//! Tool configuration loaded from a JSON file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use crate::foundation::core::CanvasSize;
use crate::foundation::error::{StickerError, StickerResult};
use crate::sticker::spec::{StickerStyle, Theme};

/// Tool id the comment generator meters usage under.
pub const DEFAULT_TOOL_ID: &str = "instagram-comment-generator";
/// Free downloads per day for unauthenticated callers.
pub const DEFAULT_DAILY_LIMIT: u32 = 2;
/// Pause between render and capture of each batch entry.
pub const DEFAULT_SETTLE_MS: u64 = 100;

/// Every field is optional in the file; missing ones take their defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StickerConfig {
    pub tool_id: String,
    pub daily_limit: u32,
    /// JSON file backing the key/value store. `None` keeps state in memory.
    pub store_path: Option<PathBuf>,
    /// Font file for text. `None` resolves a system sans-serif.
    pub font_path: Option<PathBuf>,
    pub viewport_width: u32,
    pub theme: Theme,
    pub style: StickerStyle,
    pub settle_ms: u64,
}

impl Default for StickerConfig {
    fn default() -> Self {
        Self {
            tool_id: DEFAULT_TOOL_ID.to_string(),
            daily_limit: DEFAULT_DAILY_LIMIT,
            store_path: None,
            font_path: None,
            viewport_width: 1024,
            theme: Theme::Light,
            style: StickerStyle::Reels,
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }
}

impl StickerConfig {
    /// Read a config file. An empty file yields the defaults.
    pub fn from_path(path: &Path) -> StickerResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> StickerResult<()> {
        if self.tool_id.trim().is_empty() {
            return Err(StickerError::validation("tool_id must not be empty"));
        }
        Ok(())
    }

    pub fn canvas(&self) -> CanvasSize {
        self.style.canvas(self.viewport_width)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
