use std::io::{Cursor, Write as _};
use std::time::Duration;

use crate::export::png::capture_png;
use crate::foundation::error::{StickerError, StickerResult};
use crate::render::surface::Surface;
use crate::sticker::compositor::Compositor;
use crate::sticker::spec::{BulkCommentEntry, CommentRenderSpec};

/// File name of a single exported sticker.
pub const SINGLE_FILE_NAME: &str = "comment.png";
/// File name of a batch archive.
pub const BATCH_ARCHIVE_NAME: &str = "instagram_comments.zip";

/// Archive entry name for the entry at zero-based `index`.
pub fn batch_entry_name(index: usize) -> String {
    format!("comment_{}.png", index + 1)
}

/// Render `spec` completely (frame and avatar) and return it as PNG bytes.
#[tracing::instrument(skip_all)]
pub fn export_single(
    compositor: &mut Compositor,
    surface: &mut dyn Surface,
    spec: &CommentRenderSpec,
) -> StickerResult<Vec<u8>> {
    compositor.render_complete(spec, surface);
    capture_png(surface)?.ok_or_else(|| StickerError::export("surface is detached"))
}

/// Render every entry over `base` in order and pack the PNGs into one ZIP.
///
/// Entry `i` is stored as `comment_{i+1}.png`. Each entry's avatar pass completes before
/// capture, then `settle` is slept before reading the surface back.
#[tracing::instrument(skip(compositor, surface, base, entries), fields(count = entries.len()))]
pub fn export_batch(
    compositor: &mut Compositor,
    surface: &mut dyn Surface,
    base: &CommentRenderSpec,
    entries: &[BulkCommentEntry],
    settle: Duration,
) -> StickerResult<Vec<u8>> {
    if entries.is_empty() {
        return Err(StickerError::validation("batch export needs at least one entry"));
    }

    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));

    for (i, entry) in entries.iter().enumerate() {
        let spec = CommentRenderSpec {
            username: entry.username.clone(),
            body_text: entry.body_text.clone(),
            ..base.clone()
        };
        compositor.render_complete(&spec, surface);
        if !settle.is_zero() {
            std::thread::sleep(settle);
        }

        let png = capture_png(surface)?
            .ok_or_else(|| StickerError::export("surface detached during batch export"))?;
        let name = batch_entry_name(i);
        tracing::debug!(%name, bytes = png.len(), "adding batch entry");

        zip.start_file(name.as_str(), options)
            .map_err(|e| StickerError::export(format!("zip entry '{name}': {e}")))?;
        zip.write_all(&png)
            .map_err(|e| StickerError::export(format!("zip entry '{name}': {e}")))?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| StickerError::export(format!("finalize zip: {e}")))?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
#[path = "../../tests/unit/export/archive.rs"]
mod tests;
