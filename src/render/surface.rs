use crate::assets::decode::PreparedImage;
use crate::foundation::core::{CanvasSize, Point, Rect, Rgba8};
use crate::foundation::error::StickerResult;

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl RasterFrame {
    /// Fully transparent frame.
    pub fn transparent(size: CanvasSize) -> Self {
        Self {
            width: size.width(),
            height: size.height(),
            data: vec![0; size.rgba8_len()],
            premultiplied: true,
        }
    }

    /// Pixel at `(x, y)`, `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data
            .get(i..i + 4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }
}

/// Immediate-mode 2D drawing target.
///
/// Mirrors the small subset of a canvas 2D context the compositor needs. Text is positioned
/// by its alphabetic baseline, the way `fillText` does. A surface may be detached (before
/// mount / after teardown); drawing calls on a detached surface return
/// [`crate::StickerError::Render`].
pub trait Surface {
    /// Current size, `None` when detached.
    fn size(&self) -> Option<CanvasSize>;

    /// Reallocate the backing raster. Contents are discarded.
    fn resize(&mut self, size: CanvasSize) -> StickerResult<()>;

    /// Make every pixel transparent.
    fn clear(&mut self) -> StickerResult<()>;

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) -> StickerResult<()>;

    /// Stroke the outline of `rect` with a line centered on its edges.
    fn stroke_rect(&mut self, rect: Rect, line_width: f64, color: Rgba8) -> StickerResult<()>;

    /// Draw `image` scaled into the square of side `diameter` centered on `center`, clipped
    /// to the inscribed circle.
    fn draw_image_circle(
        &mut self,
        image: &PreparedImage,
        center: Point,
        diameter: f64,
    ) -> StickerResult<()>;

    /// Advance width of `text` at `size_px`, in pixels.
    fn measure_text(&mut self, text: &str, size_px: f32) -> StickerResult<f64>;

    /// Draw `text` with its baseline starting at `origin`.
    fn fill_text(
        &mut self,
        text: &str,
        origin: Point,
        size_px: f32,
        color: Rgba8,
    ) -> StickerResult<()>;

    /// Read back the current pixels, `None` when detached.
    fn snapshot(&mut self) -> StickerResult<Option<RasterFrame>>;

    /// Whether the surface currently has a backing raster.
    fn is_attached(&self) -> bool {
        self.size().is_some()
    }
}
