use std::sync::Arc;

use crate::assets::decode::{PreparedImage, decode_data_url, decode_image, placeholder_avatar};
use crate::foundation::core::{CanvasSize, Rgba8};
use crate::foundation::error::StickerResult;

/// Username shown in a fresh form.
pub const DEFAULT_USERNAME: &str = "username";
/// Body text shown in a fresh form.
pub const DEFAULT_BODY_TEXT: &str = "Change Text & see the Magic! 😀";

/// Edge length of the generated placeholder avatar.
const PLACEHOLDER_AVATAR_PX: u32 = 96;

/// Color scheme of the comment box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn background(self) -> Rgba8 {
        match self {
            Theme::Light => Rgba8::opaque_hex(0xffffff),
            Theme::Dark => Rgba8::opaque_hex(0x000000),
        }
    }

    pub fn foreground(self) -> Rgba8 {
        match self {
            Theme::Light => Rgba8::opaque_hex(0x000000),
            Theme::Dark => Rgba8::opaque_hex(0xffffff),
        }
    }
}

/// Sticker flavor. Each maps to its own geometry in [`crate::sticker::layout`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StickerStyle {
    /// Proportional geometry that scales with the canvas.
    #[default]
    Reels,
    /// Fixed-pixel geometry with a white box.
    Tiktok,
}

impl StickerStyle {
    /// Canvas this style renders on for a viewport width.
    ///
    /// Reels follows the viewport breakpoints. Tiktok's 300px box at x=50 needs its own
    /// fixed 500x500 canvas regardless of the viewport.
    pub fn canvas(self, viewport_width: u32) -> CanvasSize {
        match self {
            StickerStyle::Reels => CanvasSize::for_viewport(viewport_width),
            StickerStyle::Tiktok => CanvasSize::TIKTOK,
        }
    }
}

/// Where the avatar pixels come from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AvatarSource {
    /// No avatar; the avatar pass is skipped.
    None,
    /// Built-in placeholder silhouette.
    #[default]
    Default,
    /// Encoded image bytes (PNG, JPEG, ...).
    Bytes(Arc<Vec<u8>>),
    /// `data:image/...;base64,...` URL, as produced by a browser file read.
    DataUrl(String),
}

impl AvatarSource {
    pub fn is_none(&self) -> bool {
        matches!(self, AvatarSource::None)
    }

    /// Decode the source into pixels. `Ok(None)` for [`AvatarSource::None`].
    pub fn decode(&self) -> StickerResult<Option<PreparedImage>> {
        match self {
            AvatarSource::None => Ok(None),
            AvatarSource::Default => Ok(Some(placeholder_avatar(PLACEHOLDER_AVATAR_PX))),
            AvatarSource::Bytes(bytes) => decode_image(bytes).map(Some),
            AvatarSource::DataUrl(url) => decode_data_url(url).map(Some),
        }
    }
}

/// Everything that determines the rendered pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct CommentRenderSpec {
    pub username: String,
    pub body_text: String,
    pub avatar: AvatarSource,
    pub theme: Theme,
    pub canvas: CanvasSize,
    pub style: StickerStyle,
}

impl Default for CommentRenderSpec {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            body_text: DEFAULT_BODY_TEXT.to_string(),
            avatar: AvatarSource::Default,
            theme: Theme::Light,
            canvas: CanvasSize::default(),
            style: StickerStyle::Reels,
        }
    }
}

impl CommentRenderSpec {
    /// Default spec with the given text fields.
    pub fn with_text(username: impl Into<String>, body_text: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            body_text: body_text.into(),
            ..Self::default()
        }
    }
}

/// One queued comment in bulk mode. Identity is its position in the list.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BulkCommentEntry {
    pub username: String,
    #[serde(alias = "note")]
    pub body_text: String,
}

impl BulkCommentEntry {
    pub fn new(username: impl Into<String>, body_text: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            body_text: body_text.into(),
        }
    }
}
