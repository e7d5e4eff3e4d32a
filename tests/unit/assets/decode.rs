use std::io::Cursor;

use super::*;

fn tiny_png(rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(1, 1, rgba.to_vec()).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let prepared = decode_image(&tiny_png([100, 50, 200, 128])).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_rejects_garbage() {
    assert!(decode_image(b"definitely not an image").is_err());
}

#[test]
fn data_url_round_trip() {
    let png = tiny_png([1, 2, 3, 255]);
    let url = png_data_url(&png);
    assert!(url.starts_with("data:image/png;base64,"));
    assert_eq!(data_url_bytes(&url).unwrap(), png);

    let img = decode_data_url(&url).unwrap();
    assert_eq!(img.rgba8_premul.as_slice(), &[1, 2, 3, 255]);
}

#[test]
fn data_url_validation() {
    assert!(data_url_bytes("http://example.com/a.png").is_err());
    assert!(data_url_bytes("data:image/png;base64").is_err());
    assert!(data_url_bytes("data:text/plain,hello").is_err());
    assert!(data_url_bytes("data:image/png;base64,@@@").is_err());
}

#[test]
fn placeholder_has_silhouette_and_background() {
    let img = placeholder_avatar(32);
    assert_eq!((img.width, img.height), (32, 32));
    assert_eq!(img.rgba8_premul.len(), 32 * 32 * 4);

    let px = |x: usize, y: usize| {
        let i = (y * 32 + x) * 4;
        img.rgba8_premul[i]
    };
    assert_eq!(px(0, 0), 219);
    assert_eq!(px(16, 12), 250);
}
