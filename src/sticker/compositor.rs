use crate::assets::decode::PreparedImage;
use crate::foundation::core::Point;
use crate::foundation::error::StickerResult;
use crate::render::surface::Surface;
use crate::sticker::layout::{StickerGeometry, header_text, wrap_words};
use crate::sticker::spec::{AvatarSource, CommentRenderSpec};

/// Draws comment stickers onto a [`Surface`].
///
/// A render is split in two. The frame pass (box, border, header, body) runs synchronously
/// inside [`Compositor::render`]. The avatar needs an image decode, so `render` hands back an
/// [`AvatarPass`] that the caller decodes (possibly on another thread) and applies with
/// [`Compositor::apply_avatar`]. Every render bumps a generation counter, and a decoded
/// avatar from an older render is dropped instead of being drawn over newer content.
#[derive(Debug, Default)]
pub struct Compositor {
    generation: u64,
}

/// Deferred avatar draw produced by a frame pass.
#[derive(Clone, Debug, PartialEq)]
pub struct AvatarPass {
    generation: u64,
    source: AvatarSource,
    center: Point,
    diameter: f64,
}

/// Avatar pixels ready to be drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedAvatar {
    generation: u64,
    image: Option<PreparedImage>,
    center: Point,
    diameter: f64,
}

impl AvatarPass {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source(&self) -> &AvatarSource {
        &self.source
    }

    /// Decode the avatar source. A decode failure is logged and yields an avatar with no
    /// image, so applying it draws nothing.
    pub fn decode(self) -> DecodedAvatar {
        let image = match self.source.decode() {
            Ok(image) => image,
            Err(err) => {
                tracing::warn!(error = %err, "avatar decode failed; skipping avatar");
                None
            }
        };
        DecodedAvatar {
            generation: self.generation,
            image,
            center: self.center,
            diameter: self.diameter,
        }
    }
}

impl DecodedAvatar {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn image(&self) -> Option<&PreparedImage> {
        self.image.as_ref()
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation of the most recent render.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run the frame pass for `spec`.
    ///
    /// Never fails: a detached surface makes this a no-op, and a drawing error is logged.
    /// Returns the avatar pass still owed to the surface, if any.
    #[tracing::instrument(skip(self, spec, surface), fields(style = ?spec.style))]
    pub fn render(
        &mut self,
        spec: &CommentRenderSpec,
        surface: &mut dyn Surface,
    ) -> Option<AvatarPass> {
        self.generation += 1;
        if !surface.is_attached() {
            tracing::debug!("surface detached; render skipped");
            return None;
        }

        let geometry = match draw_frame(spec, surface) {
            Ok(g) => g,
            Err(err) => {
                tracing::warn!(error = %err, "frame pass failed");
                return None;
            }
        };

        if spec.avatar.is_none() {
            return None;
        }
        Some(AvatarPass {
            generation: self.generation,
            source: spec.avatar.clone(),
            center: geometry.avatar_center,
            diameter: geometry.avatar_diameter,
        })
    }

    /// Draw a decoded avatar. Returns whether anything was drawn.
    pub fn apply_avatar(&self, surface: &mut dyn Surface, avatar: &DecodedAvatar) -> bool {
        if avatar.generation != self.generation {
            tracing::debug!(
                stale = avatar.generation,
                current = self.generation,
                "dropping stale avatar"
            );
            return false;
        }
        let Some(image) = avatar.image.as_ref() else {
            return false;
        };
        if !surface.is_attached() {
            return false;
        }
        match surface.draw_image_circle(image, avatar.center, avatar.diameter) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "avatar draw failed");
                false
            }
        }
    }

    /// Frame pass followed immediately by the avatar pass.
    pub fn render_complete(&mut self, spec: &CommentRenderSpec, surface: &mut dyn Surface) {
        if let Some(pass) = self.render(spec, surface) {
            let decoded = pass.decode();
            self.apply_avatar(surface, &decoded);
        }
    }
}

fn draw_frame(
    spec: &CommentRenderSpec,
    surface: &mut dyn Surface,
) -> StickerResult<StickerGeometry> {
    if surface.size() != Some(spec.canvas) {
        surface.resize(spec.canvas)?;
    }
    surface.clear()?;

    let g = StickerGeometry::new(spec.style, spec.canvas, spec.theme);
    surface.fill_rect(g.box_rect, g.background)?;
    surface.stroke_rect(g.box_rect, g.border_width, g.border)?;

    surface.fill_text(
        &header_text(&spec.username),
        g.header_origin,
        g.header_size,
        g.header_color,
    )?;

    let lines = wrap_words(&spec.body_text, g.max_line_width, |s| {
        surface.measure_text(s, g.body_size)
    })?;
    for (i, line) in lines.iter().enumerate() {
        surface.fill_text(line, g.body_line_origin(i), g.body_size, g.body_color)?;
    }

    Ok(g)
}

#[cfg(test)]
#[path = "../../tests/unit/sticker/compositor.rs"]
mod tests;
