use std::path::Path;
use std::sync::Arc;

use usvg::fontdb;

use crate::foundation::error::{StickerError, StickerResult};

/// Families tried, in order, when resolving the default sans-serif face.
pub const SANS_SERIF_PREFERENCE: &[&str] = &[
    "Arial",
    "Helvetica",
    "Liberation Sans",
    "Arimo",
    "DejaVu Sans",
    "Noto Sans",
];

/// Raw font file bytes plus the face index inside the file.
#[derive(Clone, Debug)]
pub struct FontFace {
    /// TTF/OTF/TTC bytes.
    pub data: Arc<Vec<u8>>,
    /// Face index for collections, `0` for single-face files.
    pub index: u32,
}

impl FontFace {
    /// Wrap font bytes already in memory.
    pub fn from_bytes(data: Vec<u8>, index: u32) -> StickerResult<Self> {
        if data.is_empty() {
            return Err(StickerError::font("font data is empty"));
        }
        Ok(Self {
            data: Arc::new(data),
            index,
        })
    }

    /// Load a font file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> StickerResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| StickerError::font(format!("read font '{}': {e}", path.display())))?;
        Self::from_bytes(data, 0)
    }

    /// Resolve an Arial-compatible face from the fonts installed on the host.
    ///
    /// Falls back to fontdb's generic sans-serif mapping and finally to any installed face.
    pub fn system_sans_serif() -> StickerResult<Self> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        Self::resolve_in(&db)
    }

    fn resolve_in(db: &fontdb::Database) -> StickerResult<Self> {
        let mut families: Vec<fontdb::Family<'_>> = SANS_SERIF_PREFERENCE
            .iter()
            .map(|name| fontdb::Family::Name(name))
            .collect();
        families.push(fontdb::Family::SansSerif);

        let query = fontdb::Query {
            families: &families,
            ..fontdb::Query::default()
        };
        let id = db
            .query(&query)
            .or_else(|| db.faces().next().map(|face| face.id))
            .ok_or_else(|| StickerError::font("no fonts installed on this system"))?;

        if let Some(face) = db.face(id) {
            let family = face.families.first().map(|(name, _)| name.as_str());
            tracing::debug!(family, index = face.index, "resolved system font");
        }

        let (data, index) = db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| StickerError::font("system font face could not be loaded"))?;
        Self::from_bytes(data, index)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
