use super::*;

#[test]
fn viewport_breakpoints() {
    assert_eq!(CanvasSize::for_viewport(320), CanvasSize::new(250, 250).unwrap());
    assert_eq!(CanvasSize::for_viewport(639).width(), 250);
    assert_eq!(CanvasSize::for_viewport(640).width(), 300);
    assert_eq!(CanvasSize::for_viewport(700).width(), 300);
    assert_eq!(CanvasSize::for_viewport(1920).height(), 300);
}

#[test]
fn deserialized_canvas_is_validated() {
    let ok: CanvasSize = serde_json::from_str(r#"{"width":500,"height":500}"#).unwrap();
    assert_eq!(ok, CanvasSize::TIKTOK);
    assert!(serde_json::from_str::<CanvasSize>(r#"{"width":0,"height":10}"#).is_err());
    assert!(serde_json::from_str::<CanvasSize>(r#"{"width":10,"height":70000}"#).is_err());
}

#[test]
fn canvas_size_rejects_empty_and_oversized() {
    assert!(CanvasSize::new(0, 10).is_err());
    assert!(CanvasSize::new(10, 0).is_err());
    assert!(CanvasSize::new(70_000, 10).is_err());
    assert_eq!(CanvasSize::new(4, 3).unwrap().rgba8_len(), 48);
}

#[test]
fn parse_hex_colors() {
    assert_eq!(Rgba8::parse_hex("#d1d5db").unwrap(), Rgba8::opaque_hex(0xd1d5db));
    assert_eq!(Rgba8::parse_hex("#00000080").unwrap().a, 0x80);
    assert!(Rgba8::parse_hex("d1d5db").is_err());
    assert!(Rgba8::parse_hex("#zzzzzz").is_err());
    assert!(Rgba8::parse_hex("#123").is_err());
}

#[test]
fn premul_roundtrip_is_close() {
    let straight = Rgba8 {
        r: 200,
        g: 100,
        b: 50,
        a: 128,
    };
    let mut px = straight.premultiplied().to_vec();
    assert_eq!(px[3], 128);
    unpremultiply_rgba8_in_place(&mut px);
    assert!((i16::from(px[0]) - 200).abs() <= 1);
    assert!((i16::from(px[1]) - 100).abs() <= 1);
    assert!((i16::from(px[2]) - 50).abs() <= 1);
}

#[test]
fn transparent_pixels_unpremultiply_to_zero() {
    let mut px = vec![10u8, 20, 30, 0];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![0, 0, 0, 0]);
}
