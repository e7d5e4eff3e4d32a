use super::*;

#[test]
fn missing_fields_take_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("cfg.json");
    std::fs::write(&path, r#"{"daily_limit": 5, "theme": "dark"}"#).unwrap();

    let cfg = StickerConfig::from_path(&path).unwrap();
    assert_eq!(cfg.daily_limit, 5);
    assert_eq!(cfg.theme, Theme::Dark);
    assert_eq!(cfg.tool_id, DEFAULT_TOOL_ID);
    assert_eq!(cfg.settle(), Duration::from_millis(100));
    assert_eq!(cfg.canvas(), CanvasSize::new(300, 300).unwrap());
}

#[test]
fn empty_file_is_default() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("cfg.json");
    std::fs::write(&path, "  \n").unwrap();
    assert_eq!(StickerConfig::from_path(&path).unwrap(), StickerConfig::default());
}

#[test]
fn unknown_fields_and_blank_tool_are_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("cfg.json");

    std::fs::write(&path, r#"{"daily_limt": 5}"#).unwrap();
    assert!(StickerConfig::from_path(&path).is_err());

    std::fs::write(&path, r#"{"tool_id": " "}"#).unwrap();
    assert!(matches!(
        StickerConfig::from_path(&path).unwrap_err(),
        StickerError::Validation(_)
    ));
}

#[test]
fn narrow_viewport_shrinks_canvas() {
    let cfg = StickerConfig {
        viewport_width: 500,
        ..StickerConfig::default()
    };
    assert_eq!(cfg.canvas(), CanvasSize::new(250, 250).unwrap());
}

#[test]
fn tiktok_canvas_ignores_viewport() {
    for viewport_width in [320, 1024] {
        let cfg = StickerConfig {
            viewport_width,
            style: StickerStyle::Tiktok,
            ..StickerConfig::default()
        };
        assert_eq!(cfg.canvas(), CanvasSize::new(500, 500).unwrap());
    }
}
