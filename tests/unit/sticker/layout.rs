use super::*;
use crate::foundation::error::StickerError;

fn char_width(s: &str) -> StickerResult<f64> {
    Ok(s.chars().count() as f64)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn rect_close(a: Rect, b: Rect) -> bool {
    close(a.x0, b.x0) && close(a.y0, b.y0) && close(a.x1, b.x1) && close(a.y1, b.y1)
}

fn canvas(w: u32, h: u32) -> CanvasSize {
    CanvasSize::new(w, h).unwrap()
}

#[test]
fn header_is_truncated_after_thirty_chars() {
    assert_eq!(
        header_text("a_very_long_username_example"),
        "Reply to @a_very_long_username..."
    );
    assert_eq!(header_text("bob"), "Reply to @bob's comment");
}

#[test]
fn header_at_exact_limit_is_kept() {
    let h = header_text("abcdefghij");
    assert_eq!(h.chars().count(), 30);
    assert_eq!(h, "Reply to @abcdefghij's comment");

    assert_eq!(
        header_text("abcdefghijk"),
        "Reply to @abcdefghijk's commen..."
    );
}

#[test]
fn header_counts_chars_not_bytes() {
    let h = header_text("😀😀😀😀😀😀😀😀😀😀😀😀");
    assert!(h.ends_with("..."));
    assert_eq!(h.chars().count(), 33);
    assert!(h.starts_with("Reply to @😀"));
}

#[test]
fn wrap_breaks_before_overflowing_word() {
    let lines = wrap_words("aaa bbb ccc", 10.0, char_width).unwrap();
    assert_eq!(lines, vec!["aaa bbb ", "ccc "]);
}

#[test]
fn unbreakable_word_stays_on_its_own_line() {
    let lines = wrap_words("supercalifragilistic x", 5.0, char_width).unwrap();
    assert_eq!(lines, vec!["supercalifragilistic ", "x "]);
}

#[test]
fn empty_body_yields_one_blank_line() {
    let lines = wrap_words("", 100.0, char_width).unwrap();
    assert_eq!(lines, vec![" "]);
}

#[test]
fn wrapped_lines_never_overflow_unless_single_word() {
    let texts = [
        "The quick brown fox jumps over the lazy dog",
        "lorem ipsum dolor sit amet consectetur adipiscing elit sed do eiusmod",
        "a bb ccc dddd eeeee ffffff ggggggg hhhhhhhh iiiiiiiii jjjjjjjjjj",
        "Change Text & see the Magic! 😀",
    ];
    for max in [4.0, 8.0, 13.0, 25.0] {
        for text in texts {
            let lines = wrap_words(text, max, char_width).unwrap();
            let rejoined: String = lines.concat();
            assert_eq!(rejoined.trim_end(), text);

            for line in &lines {
                let single_word = !line.trim_end_matches(' ').contains(' ');
                assert!(
                    char_width(line).unwrap() <= max || single_word,
                    "line {line:?} overflows {max}"
                );
            }
        }
    }
}

#[test]
fn wrap_propagates_measure_errors() {
    let err = wrap_words("a b", 10.0, |_| Err(StickerError::render("boom"))).unwrap_err();
    assert!(matches!(err, StickerError::Render(_)));
}

#[test]
fn reels_geometry_scales_with_canvas() {
    let g = StickerGeometry::reels(canvas(300, 300), Theme::Light);
    assert!(rect_close(g.box_rect, Rect::new(30.0, 129.0, 210.0, 171.0)));
    assert_eq!(g.avatar_diameter, 20.0);
    assert!(close(g.avatar_center.x, 45.0));
    assert!(close(g.avatar_center.y, 150.0));
    assert_eq!(g.header_size, 8.0);
    assert_eq!(g.body_size, 12.0);
    assert!(close(g.max_line_width, 140.0));
    assert!(close(g.header_origin.x, 60.0));
    assert!(close(g.header_origin.y, 141.6));
    assert!(close(g.body_origin.y, 154.2));
    assert!(close(g.line_advance, 14.4));
    assert_eq!(g.background, Rgba8::opaque_hex(0xffffff));
    assert_eq!(g.border, Rgba8::opaque_hex(0xd1d5db));
}

#[test]
fn reels_floors_apply_only_on_small_canvases() {
    let big = StickerGeometry::reels(canvas(1000, 1000), Theme::Dark);
    assert!(close(big.avatar_diameter, 60.0));
    assert!(close(f64::from(big.header_size), 20.0));
    assert!(close(f64::from(big.body_size), 30.0));
    assert_eq!(big.background, Rgba8::opaque_hex(0x000000));
    assert_eq!(big.body_color, Rgba8::opaque_hex(0xffffff));
    assert_eq!(big.header_color, Rgba8::opaque_hex(0x6b7280));
}

#[test]
fn tiktok_geometry_is_fixed_pixels() {
    let g = StickerGeometry::new(StickerStyle::Tiktok, canvas(400, 300), Theme::Dark);
    assert_eq!(g.box_rect, Rect::new(50.0, 115.0, 350.0, 185.0));
    assert_eq!(g.avatar_center, Point::new(73.0, 150.0));
    assert_eq!(g.avatar_diameter, 30.0);
    assert_eq!(g.header_origin, Point::new(100.0, 135.0));
    assert_eq!(g.body_origin, Point::new(100.0, 155.0));
    assert_eq!(g.max_line_width, 240.0);
    assert_eq!(g.background, Rgba8::opaque_hex(0xffffff));
    assert_eq!(g.body_line_origin(2), Point::new(100.0, 185.0));
}

#[test]
fn every_style_box_fits_its_canvas() {
    for style in [StickerStyle::Reels, StickerStyle::Tiktok] {
        for viewport in [320, 639, 640, 1920] {
            let c = style.canvas(viewport);
            let g = StickerGeometry::new(style, c, Theme::Light);
            let bounds = Rect::new(0.0, 0.0, c.w(), c.h());
            assert_eq!(
                bounds.intersect(g.box_rect),
                g.box_rect,
                "{style:?} box {:?} overflows {c:?}",
                g.box_rect
            );
        }
    }
}

#[test]
fn tiktok_box_is_centered_on_its_canvas() {
    let g = StickerGeometry::new(
        StickerStyle::Tiktok,
        StickerStyle::Tiktok.canvas(1024),
        Theme::Light,
    );
    assert_eq!(g.box_rect, Rect::new(50.0, 215.0, 350.0, 285.0));
    assert_eq!(g.avatar_center, Point::new(73.0, 250.0));
}
