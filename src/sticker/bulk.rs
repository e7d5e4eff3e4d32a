use crate::foundation::error::{StickerError, StickerResult};
use crate::sticker::spec::BulkCommentEntry;

/// Ordered list of queued comments. Entries are identified by position only; duplicates are
/// allowed.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct BulkQueue {
    entries: Vec<BulkCommentEntry>,
}

impl BulkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: BulkCommentEntry) {
        self.entries.push(entry);
    }

    /// Remove and return the entry at `index`, shifting later entries down.
    pub fn remove(&mut self, index: usize) -> StickerResult<BulkCommentEntry> {
        if index >= self.entries.len() {
            return Err(StickerError::validation(format!(
                "bulk entry index {index} out of range (len {})",
                self.entries.len()
            )));
        }
        Ok(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[BulkCommentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<BulkCommentEntry>> for BulkQueue {
    fn from(entries: Vec<BulkCommentEntry>) -> Self {
        Self { entries }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sticker/bulk.rs"]
mod tests;
