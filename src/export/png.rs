use std::io::Cursor;

use crate::assets::decode::png_data_url;
use crate::foundation::core::unpremultiply_rgba8_in_place;
use crate::foundation::error::{StickerError, StickerResult};
use crate::render::surface::{RasterFrame, Surface};

/// Encode a frame as a straight-alpha RGBA8 PNG.
pub fn encode_png(frame: &RasterFrame) -> StickerResult<Vec<u8>> {
    let mut data = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut data);
    }
    let img = image::RgbaImage::from_raw(frame.width, frame.height, data)
        .ok_or_else(|| StickerError::export("frame byte length does not match its size"))?;

    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| StickerError::export(format!("encode png: {e}")))?;
    Ok(buf)
}

/// Read back the surface and encode it. `Ok(None)` when the surface is detached.
pub fn capture_png(surface: &mut dyn Surface) -> StickerResult<Option<Vec<u8>>> {
    match surface.snapshot()? {
        Some(frame) => encode_png(&frame).map(Some),
        None => Ok(None),
    }
}

/// Current surface contents as a `data:image/png;base64,...` URL.
///
/// `None` when the surface has no backing raster; capture failures are logged and also
/// yield `None`.
pub fn to_data_url(surface: &mut dyn Surface) -> Option<String> {
    match capture_png(surface) {
        Ok(png) => png.map(|bytes| png_data_url(&bytes)),
        Err(err) => {
            tracing::warn!(error = %err, "surface capture failed");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/png.rs"]
mod tests;
