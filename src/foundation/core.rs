use crate::foundation::error::{StickerError, StickerResult};

pub use kurbo::{Point, Rect};

/// Output canvas dimensions in pixels.
///
/// Always non-zero and within [`CanvasSize::MAX_EDGE`] on both axes; the fields are only
/// reachable through the validating constructors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawCanvasSize")]
pub struct CanvasSize {
    width: u32,
    height: u32,
}

#[derive(serde::Deserialize)]
struct RawCanvasSize {
    width: u32,
    height: u32,
}

impl TryFrom<RawCanvasSize> for CanvasSize {
    type Error = StickerError;

    fn try_from(raw: RawCanvasSize) -> StickerResult<Self> {
        Self::new(raw.width, raw.height)
    }
}

impl CanvasSize {
    /// Largest edge the CPU raster accepts (pixmaps are `u16`-sized).
    pub const MAX_EDGE: u32 = u16::MAX as u32;

    /// Reels canvas below the 640px viewport breakpoint.
    pub const NARROW: Self = Self::square(250);
    /// Reels canvas at and above the 640px viewport breakpoint.
    pub const WIDE: Self = Self::square(300);
    /// Fixed canvas of the Tiktok layout.
    pub const TIKTOK: Self = Self::square(500);

    const fn square(edge: u32) -> Self {
        Self {
            width: edge,
            height: edge,
        }
    }

    /// Create a validated, non-empty canvas size.
    pub fn new(width: u32, height: u32) -> StickerResult<Self> {
        if width == 0 || height == 0 {
            return Err(StickerError::validation("canvas size must be non-zero"));
        }
        if width > Self::MAX_EDGE || height > Self::MAX_EDGE {
            return Err(StickerError::validation("canvas edge exceeds u16"));
        }
        Ok(Self { width, height })
    }

    /// Pick the Reels canvas size for a viewport width.
    ///
    /// Narrow viewports (`< 640`) get 250x250; everything wider renders at 300x300.
    pub fn for_viewport(viewport_width: u32) -> Self {
        if viewport_width < 640 {
            Self::NARROW
        } else {
            Self::WIDE
        }
    }

    /// Width in pixels.
    pub fn width(self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(self) -> u32 {
        self.height
    }

    /// Width as `f64` for geometry math.
    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64` for geometry math.
    pub fn h(self) -> f64 {
        f64::from(self.height)
    }

    /// Byte length of a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::for_viewport(1024)
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn opaque_hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: 255,
        }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn parse_hex(s: &str) -> StickerResult<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| StickerError::validation(format!("color '{s}' must start with '#'")))?;
        let byte = |i: usize| -> StickerResult<u8> {
            hex.get(i..i + 2)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| StickerError::validation(format!("invalid color '{s}'")))
        };
        match hex.len() {
            6 => Ok(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: 255,
            }),
            8 => Ok(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => Err(StickerError::validation(format!("invalid color '{s}'"))),
        }
    }

    /// Convert into premultiplied form.
    pub fn premultiplied(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

/// Convert premultiplied RGBA8 pixels to straight alpha in place.
pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Convert straight-alpha RGBA8 pixels to premultiplied in place.
pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
