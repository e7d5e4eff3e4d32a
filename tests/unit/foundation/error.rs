use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StickerError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(StickerError::storage("x").to_string().contains("storage error:"));
    assert!(StickerError::decode("x").to_string().contains("decode error:"));
    assert!(StickerError::render("x").to_string().contains("render error:"));
    assert!(StickerError::export("x").to_string().contains("export error:"));
    assert!(StickerError::font("x").to_string().contains("font error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StickerError::from(base);
    assert!(matches!(err, StickerError::Other(_)));
    assert!(err.to_string().contains("boom"));
}
