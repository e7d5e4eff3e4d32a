use std::sync::Arc;

use vello_cpu::kurbo::Shape as _;

use crate::assets::decode::PreparedImage;
use crate::assets::font::FontFace;
use crate::assets::text::{TextBrushRgba8, TextLayoutEngine};
use crate::foundation::core::{CanvasSize, Point, Rect, Rgba8};
use crate::foundation::error::{StickerError, StickerResult};
use crate::render::surface::{RasterFrame, Surface};

/// CPU raster surface backed by `vello_cpu`.
///
/// Draw calls accumulate in a retained render context; [`Surface::snapshot`] rasterizes
/// everything drawn since the last [`Surface::clear`] into a freshly cleared pixmap, so a
/// deferred pass (the avatar) can be added after the first readback.
pub struct CpuSurface {
    target: Option<CpuTarget>,
    text: TextLayoutEngine,
    font: vello_cpu::peniko::FontData,
}

struct CpuTarget {
    size: CanvasSize,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
}

impl CpuTarget {
    fn new(size: CanvasSize) -> StickerResult<Self> {
        let (w, h) = size_to_u16(size)?;
        Ok(Self {
            size,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }
}

impl CpuSurface {
    /// Attached surface of `size` drawing text with `face`.
    pub fn new(size: CanvasSize, face: &FontFace) -> StickerResult<Self> {
        let text = TextLayoutEngine::new(face)?;
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(face.data.as_ref().clone()),
            face.index,
        );
        Ok(Self {
            target: Some(CpuTarget::new(size)?),
            text,
            font,
        })
    }

    /// Drop the backing raster, as on unmount.
    pub fn detach(&mut self) {
        self.target = None;
    }

    /// Allocate a backing raster again after [`CpuSurface::detach`].
    pub fn attach(&mut self, size: CanvasSize) -> StickerResult<()> {
        self.target = Some(CpuTarget::new(size)?);
        Ok(())
    }

    /// Family name of the font used for text.
    pub fn font_family(&self) -> &str {
        self.text.family_name()
    }

    fn target_mut(&mut self) -> StickerResult<&mut CpuTarget> {
        self.target
            .as_mut()
            .ok_or_else(|| StickerError::render("surface is detached"))
    }
}

impl Surface for CpuSurface {
    fn size(&self) -> Option<CanvasSize> {
        self.target.as_ref().map(|t| t.size)
    }

    fn resize(&mut self, size: CanvasSize) -> StickerResult<()> {
        let target = self.target_mut()?;
        if target.size != size {
            *target = CpuTarget::new(size)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> StickerResult<()> {
        let target = self.target_mut()?;
        let (w, h) = size_to_u16(target.size)?;
        target.ctx = vello_cpu::RenderContext::new(w, h);
        clear_pixmap(&mut target.pixmap);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) -> StickerResult<()> {
        let ctx = &mut self.target_mut()?.ctx;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color_to_cpu(color));
        ctx.fill_rect(&rect_to_cpu(rect));
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, line_width: f64, color: Rgba8) -> StickerResult<()> {
        let ctx = &mut self.target_mut()?.ctx;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(line_width));
        ctx.set_paint(color_to_cpu(color));
        ctx.stroke_rect(&rect_to_cpu(rect));
        Ok(())
    }

    fn draw_image_circle(
        &mut self,
        image: &PreparedImage,
        center: Point,
        diameter: f64,
    ) -> StickerResult<()> {
        if !diameter.is_finite() || diameter <= 0.0 {
            return Err(StickerError::validation("avatar diameter must be > 0"));
        }
        let pixmap = image_premul_bytes_to_pixmap(&image.rgba8_premul, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        let radius = diameter / 2.0;
        let clip = vello_cpu::kurbo::Circle::new(point_to_cpu(center), radius).to_path(0.1);
        let placement = vello_cpu::kurbo::Affine::translate((center.x - radius, center.y - radius))
            * vello_cpu::kurbo::Affine::scale_non_uniform(
                diameter / f64::from(image.width),
                diameter / f64::from(image.height),
            );

        let ctx = &mut self.target_mut()?.ctx;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.push_clip_layer(&clip);
        ctx.set_transform(placement);
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width),
            f64::from(image.height),
        ));
        ctx.pop_layer();
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }

    fn measure_text(&mut self, text: &str, size_px: f32) -> StickerResult<f64> {
        Ok(f64::from(self.text.measure(text, size_px)?))
    }

    fn fill_text(
        &mut self,
        text: &str,
        origin: Point,
        size_px: f32,
        color: Rgba8,
    ) -> StickerResult<()> {
        let brush = TextBrushRgba8 {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        };
        let layout = self.text.layout_line(text, size_px, brush)?;
        let Some(first) = layout.lines().next() else {
            return Ok(());
        };
        let baseline = f64::from(first.metrics().baseline);

        let font = self.font.clone();
        let ctx = &mut self.target_mut()?.ctx;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            origin.x,
            origin.y - baseline,
        )));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }

    fn snapshot(&mut self) -> StickerResult<Option<RasterFrame>> {
        let Some(target) = self.target.as_mut() else {
            return Ok(None);
        };
        clear_pixmap(&mut target.pixmap);
        target.ctx.flush();
        target.ctx.render_to_pixmap(&mut target.pixmap);

        Ok(Some(RasterFrame {
            width: target.size.width(),
            height: target.size.height(),
            data: target.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }))
    }
}

fn size_to_u16(size: CanvasSize) -> StickerResult<(u16, u16)> {
    let w: u16 = size
        .width()
        .try_into()
        .map_err(|_| StickerError::render("surface width exceeds u16"))?;
    let h: u16 = size
        .height()
        .try_into()
        .map_err(|_| StickerError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> StickerResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| StickerError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| StickerError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(StickerError::render("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
