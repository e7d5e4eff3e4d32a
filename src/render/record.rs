use crate::assets::decode::PreparedImage;
use crate::foundation::core::{CanvasSize, Point, Rect, Rgba8};
use crate::foundation::error::{StickerError, StickerResult};
use crate::render::surface::{RasterFrame, Surface};

/// One recorded drawing command.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Clear,
    FillRect {
        rect: Rect,
        color: Rgba8,
    },
    StrokeRect {
        rect: Rect,
        line_width: f64,
        color: Rgba8,
    },
    ImageCircle {
        image_width: u32,
        image_height: u32,
        center: Point,
        diameter: f64,
    },
    Text {
        text: String,
        origin: Point,
        size_px: f32,
        color: Rgba8,
    },
}

/// Surface that records a display list instead of rasterizing.
///
/// Text is measured with a fixed advance per character (`advance_em * size_px`), which
/// keeps layout math reproducible without any installed fonts. Each
/// [`Surface::snapshot`] stores a copy of the display list in [`RecordingSurface::captures`].
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    size: Option<CanvasSize>,
    advance_em: f64,
    ops: Vec<DrawOp>,
    captures: Vec<Vec<DrawOp>>,
}

impl RecordingSurface {
    /// Attached surface with a half-em advance per character.
    pub fn new(size: CanvasSize) -> Self {
        Self {
            size: Some(size),
            advance_em: 0.5,
            ops: Vec::new(),
            captures: Vec::new(),
        }
    }

    /// Surface with no backing raster.
    pub fn detached() -> Self {
        Self {
            size: None,
            ..Self::new(CanvasSize::default())
        }
    }

    /// Override the per-character advance, in ems.
    pub fn with_advance_em(mut self, advance_em: f64) -> Self {
        self.advance_em = advance_em;
        self
    }

    pub fn detach(&mut self) {
        self.size = None;
        self.ops.clear();
    }

    /// Commands drawn since the last clear.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Display lists captured by each snapshot, in order.
    pub fn captures(&self) -> &[Vec<DrawOp>] {
        &self.captures
    }

    /// Text drawn since the last clear, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn push(&mut self, op: DrawOp) -> StickerResult<()> {
        if self.size.is_none() {
            return Err(StickerError::render("surface is detached"));
        }
        self.ops.push(op);
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Option<CanvasSize> {
        self.size
    }

    fn resize(&mut self, size: CanvasSize) -> StickerResult<()> {
        if self.size.is_none() {
            return Err(StickerError::render("surface is detached"));
        }
        self.size = Some(size);
        self.ops.clear();
        Ok(())
    }

    fn clear(&mut self) -> StickerResult<()> {
        if self.size.is_none() {
            return Err(StickerError::render("surface is detached"));
        }
        self.ops.clear();
        self.ops.push(DrawOp::Clear);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) -> StickerResult<()> {
        self.push(DrawOp::FillRect { rect, color })
    }

    fn stroke_rect(&mut self, rect: Rect, line_width: f64, color: Rgba8) -> StickerResult<()> {
        self.push(DrawOp::StrokeRect {
            rect,
            line_width,
            color,
        })
    }

    fn draw_image_circle(
        &mut self,
        image: &PreparedImage,
        center: Point,
        diameter: f64,
    ) -> StickerResult<()> {
        self.push(DrawOp::ImageCircle {
            image_width: image.width,
            image_height: image.height,
            center,
            diameter,
        })
    }

    fn measure_text(&mut self, text: &str, size_px: f32) -> StickerResult<f64> {
        Ok(text.chars().count() as f64 * self.advance_em * f64::from(size_px))
    }

    fn fill_text(
        &mut self,
        text: &str,
        origin: Point,
        size_px: f32,
        color: Rgba8,
    ) -> StickerResult<()> {
        self.push(DrawOp::Text {
            text: text.to_string(),
            origin,
            size_px,
            color,
        })
    }

    fn snapshot(&mut self) -> StickerResult<Option<RasterFrame>> {
        let Some(size) = self.size else {
            return Ok(None);
        };
        self.captures.push(self.ops.clone());
        Ok(Some(RasterFrame::transparent(size)))
    }
}
