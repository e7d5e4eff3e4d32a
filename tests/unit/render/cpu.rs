use super::*;
use crate::assets::decode::placeholder_avatar;

fn surface(w: u32, h: u32) -> Option<CpuSurface> {
    let face = FontFace::system_sans_serif().ok()?;
    CpuSurface::new(CanvasSize::new(w, h).ok()?, &face).ok()
}

#[test]
fn fill_rect_paints_opaque_pixels() {
    let Some(mut s) = surface(16, 16) else {
        return;
    };
    s.fill_rect(Rect::new(4.0, 4.0, 12.0, 12.0), Rgba8::opaque_hex(0xff0000))
        .unwrap();
    let frame = s.snapshot().unwrap().unwrap();
    assert_eq!(frame.pixel(8, 8), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 0]));
}

#[test]
fn clear_discards_previous_drawing() {
    let Some(mut s) = surface(8, 8) else {
        return;
    };
    s.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), Rgba8::opaque_hex(0x00ff00))
        .unwrap();
    s.clear().unwrap();
    let frame = s.snapshot().unwrap().unwrap();
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn image_circle_is_clipped() {
    let Some(mut s) = surface(40, 40) else {
        return;
    };
    let img = placeholder_avatar(16);
    s.draw_image_circle(&img, Point::new(20.0, 20.0), 30.0)
        .unwrap();
    let frame = s.snapshot().unwrap().unwrap();
    assert_eq!(frame.pixel(20, 20).unwrap()[3], 255);
    assert_eq!(frame.pixel(6, 6).unwrap()[3], 0);
    assert_eq!(frame.pixel(1, 20).unwrap()[3], 0);
}

#[test]
fn text_leaves_ink_near_its_baseline() {
    let Some(mut s) = surface(120, 40) else {
        return;
    };
    s.fill_text("Hello", Point::new(10.0, 28.0), 20.0, Rgba8::opaque_hex(0x000000))
        .unwrap();
    let frame = s.snapshot().unwrap().unwrap();
    let inked_rows: Vec<u32> = (0..40)
        .filter(|&y| (0..120).any(|x| frame.pixel(x, y).unwrap()[3] > 0))
        .collect();
    assert!(!inked_rows.is_empty());
    assert!(*inked_rows.first().unwrap() >= 8);
    assert!(*inked_rows.last().unwrap() <= 32);
}

#[test]
fn resize_and_detach() {
    let Some(mut s) = surface(10, 10) else {
        return;
    };
    s.resize(CanvasSize::new(20, 12).unwrap()).unwrap();
    let frame = s.snapshot().unwrap().unwrap();
    assert_eq!((frame.width, frame.height), (20, 12));

    s.detach();
    assert!(!s.is_attached());
    assert!(s.snapshot().unwrap().is_none());
    assert!(s.clear().is_err());

    s.attach(CanvasSize::new(5, 5).unwrap()).unwrap();
    assert_eq!(s.size(), Some(CanvasSize::new(5, 5).unwrap()));
}
