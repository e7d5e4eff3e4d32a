use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::core::premultiply_rgba8_in_place;
use crate::foundation::error::{StickerError, StickerResult};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode any raster format `image` understands (PNG, JPEG, GIF, WebP, ...).
pub fn decode_image(bytes: &[u8]) -> StickerResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(StickerError::decode("image has no pixels"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Extract the payload of a `data:<mime>;base64,<payload>` URL.
///
/// Only base64 data URLs are accepted; that is what a browser file read produces.
pub fn data_url_bytes(url: &str) -> StickerResult<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| StickerError::decode("data URL must start with 'data:'"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| StickerError::decode("data URL has no ',' separator"))?;
    if !meta.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(StickerError::decode("data URL is not base64 encoded"));
    }

    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| StickerError::decode(format!("data URL payload: {e}")))
}

/// Decode an image carried in a data URL.
pub fn decode_data_url(url: &str) -> StickerResult<PreparedImage> {
    let bytes = data_url_bytes(url)?;
    decode_image(&bytes)
}

/// Build a `data:image/png;base64,...` URL from encoded PNG bytes.
pub fn png_data_url(png: &[u8]) -> String {
    let mut out = String::from("data:image/png;base64,");
    base64::engine::general_purpose::STANDARD.encode_string(png, &mut out);
    out
}

/// Built-in placeholder avatar: a light silhouette on a gray tile.
pub fn placeholder_avatar(size: u32) -> PreparedImage {
    let size = size.max(1);
    let bg = [219u8, 219, 219, 255];
    let fg = [250u8, 250, 250, 255];

    let s = f64::from(size);
    let (head_cx, head_cy, head_r) = (s * 0.5, s * 0.38, s * 0.19);
    let (body_cx, body_cy, body_rx, body_ry) = (s * 0.5, s * 0.95, s * 0.36, s * 0.3);

    let mut data = Vec::with_capacity(size as usize * size as usize * 4);
    for y in 0..size {
        for x in 0..size {
            let px = f64::from(x) + 0.5;
            let py = f64::from(y) + 0.5;
            let in_head = (px - head_cx).powi(2) + (py - head_cy).powi(2) <= head_r * head_r;
            let in_body = ((px - body_cx) / body_rx).powi(2) + ((py - body_cy) / body_ry).powi(2)
                <= 1.0;
            data.extend_from_slice(if in_head || in_body { &fg } else { &bg });
        }
    }

    PreparedImage {
        width: size,
        height: size,
        rgba8_premul: Arc::new(data),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
