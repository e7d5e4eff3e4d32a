//! Sticker geometry, header truncation, and measured word wrapping.

use crate::foundation::core::{CanvasSize, Point, Rect, Rgba8};
use crate::foundation::error::StickerResult;
use crate::sticker::spec::{StickerStyle, Theme};

/// Headers longer than this many characters are truncated.
pub const HEADER_MAX_CHARS: usize = 30;
/// Appended to a truncated header.
pub const ELLIPSIS: &str = "...";

const BORDER_GRAY: Rgba8 = Rgba8::opaque_hex(0xd1d5db);
const HEADER_GRAY: Rgba8 = Rgba8::opaque_hex(0x6b7280);

/// `Reply to @{username}'s comment`, cut to 30 characters plus `...` when longer.
pub fn header_text(username: &str) -> String {
    let full = format!("Reply to @{username}'s comment");
    if full.chars().count() > HEADER_MAX_CHARS {
        let mut cut: String = full.chars().take(HEADER_MAX_CHARS).collect();
        cut.push_str(ELLIPSIS);
        cut
    } else {
        full
    }
}

/// Resolved positions, sizes, and colors for one sticker.
#[derive(Clone, Debug, PartialEq)]
pub struct StickerGeometry {
    pub box_rect: Rect,
    pub background: Rgba8,
    pub border: Rgba8,
    pub border_width: f64,

    pub avatar_center: Point,
    pub avatar_diameter: f64,

    /// Baseline origin of the header line.
    pub header_origin: Point,
    pub header_size: f32,
    pub header_color: Rgba8,

    /// Baseline origin of the first body line.
    pub body_origin: Point,
    pub body_size: f32,
    pub body_color: Rgba8,
    /// Baseline-to-baseline distance between body lines.
    pub line_advance: f64,
    /// Widest a body line may measure before wrapping.
    pub max_line_width: f64,
}

impl StickerGeometry {
    pub fn new(style: StickerStyle, canvas: CanvasSize, theme: Theme) -> Self {
        match style {
            StickerStyle::Reels => Self::reels(canvas, theme),
            StickerStyle::Tiktok => Self::tiktok(canvas),
        }
    }

    /// Proportional layout: every measure is a fraction of the canvas, with floors that
    /// keep the avatar and text legible on small canvases.
    pub fn reels(canvas: CanvasSize, theme: Theme) -> Self {
        let (w, h) = (canvas.w(), canvas.h());

        let box_w = w * 0.6;
        let box_h = h * 0.14;
        let x = w * 0.1;
        let y = h / 2.0 - box_h / 2.0;

        let avatar = (w * 0.06).max(20.0);
        let header_size = (w * 0.02).max(8.0) as f32;
        let body_size = (w * 0.03).max(12.0) as f32;
        let text_x = x + avatar * 1.5;

        Self {
            box_rect: Rect::new(x, y, x + box_w, y + box_h),
            background: theme.background(),
            border: BORDER_GRAY,
            border_width: 1.0,

            avatar_center: Point::new(x + avatar * 0.75, y + box_h / 2.0),
            avatar_diameter: avatar,

            header_origin: Point::new(text_x, y + box_h * 0.3),
            header_size,
            header_color: HEADER_GRAY,

            body_origin: Point::new(text_x, y + box_h * 0.6),
            body_size,
            body_color: theme.foreground(),
            line_advance: f64::from(body_size) * 1.2,
            max_line_width: box_w - avatar * 2.0,
        }
    }

    /// Fixed-pixel layout: a 300x70 white box 50px from the left, vertically centered.
    pub fn tiktok(canvas: CanvasSize) -> Self {
        let (box_w, box_h) = (300.0, 70.0);
        let x = 50.0;
        let y = canvas.h() / 2.0 - box_h / 2.0;
        let ink = Rgba8::opaque_hex(0x111827);

        Self {
            box_rect: Rect::new(x, y, x + box_w, y + box_h),
            background: Rgba8::opaque_hex(0xffffff),
            border: ink,
            border_width: 1.0,

            avatar_center: Point::new(x + 23.0, y + box_h / 2.0),
            avatar_diameter: 30.0,

            header_origin: Point::new(x + 50.0, y + 20.0),
            header_size: 10.0,
            header_color: Rgba8::opaque_hex(0x374151),

            body_origin: Point::new(x + 50.0, y + 40.0),
            body_size: 15.0,
            body_color: ink,
            line_advance: 15.0,
            max_line_width: box_w - 60.0,
        }
    }

    /// Baseline origin of body line `index`.
    pub fn body_line_origin(&self, index: usize) -> Point {
        Point::new(
            self.body_origin.x,
            self.body_origin.y + self.line_advance * index as f64,
        )
    }
}

/// Greedy word wrap driven by measured widths.
///
/// Words are separated by single spaces and each word keeps one trailing space, so the
/// returned lines are exactly the strings to draw. A word starts a new line when appending
/// it would make the line wider than `max_width`, unless it is the first word. A single word
/// wider than `max_width` therefore stays on its own (overflowing) line. The result always
/// holds at least one line.
pub fn wrap_words<F>(text: &str, max_width: f64, mut measure: F) -> StickerResult<Vec<String>>
where
    F: FnMut(&str) -> StickerResult<f64>,
{
    let mut lines = Vec::new();
    let mut line = String::new();

    for (i, word) in text.split(' ').enumerate() {
        let candidate = format!("{line}{word} ");
        if measure(&candidate)? > max_width && i > 0 {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            line.push(' ');
        } else {
            line = candidate;
        }
    }
    lines.push(line);
    Ok(lines)
}

#[cfg(test)]
#[path = "../../tests/unit/sticker/layout.rs"]
mod tests;
