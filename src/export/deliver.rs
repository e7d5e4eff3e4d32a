use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{StickerError, StickerResult};

/// Destination for exported bytes, the "save as" step of a download.
pub trait FileSaver {
    /// Store `bytes` under `name` and report where they went.
    fn save(&mut self, name: &str, bytes: &[u8]) -> StickerResult<PathBuf>;
}

impl<F: FileSaver + ?Sized> FileSaver for &mut F {
    fn save(&mut self, name: &str, bytes: &[u8]) -> StickerResult<PathBuf> {
        (**self).save(name, bytes)
    }
}

impl<F: FileSaver + ?Sized> FileSaver for Box<F> {
    fn save(&mut self, name: &str, bytes: &[u8]) -> StickerResult<PathBuf> {
        (**self).save(name, bytes)
    }
}

/// Writes files into a directory, creating it on first use.
#[derive(Clone, Debug)]
pub struct DirSaver {
    dir: PathBuf,
}

impl DirSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSaver for DirSaver {
    fn save(&mut self, name: &str, bytes: &[u8]) -> StickerResult<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(StickerError::validation(format!("invalid file name '{name}'")));
        }
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        let path = self.dir.join(name);
        std::fs::write(&path, bytes).with_context(|| format!("write '{}'", path.display()))?;
        Ok(path)
    }
}

/// Save through `primary`; on failure log it and try `fallback` once.
pub fn deliver_with_fallback(
    primary: &mut dyn FileSaver,
    fallback: Option<&mut dyn FileSaver>,
    name: &str,
    bytes: &[u8],
) -> StickerResult<PathBuf> {
    match primary.save(name, bytes) {
        Ok(path) => Ok(path),
        Err(err) => {
            let Some(fallback) = fallback else {
                return Err(err);
            };
            tracing::warn!(error = %err, %name, "primary save failed; trying fallback");
            fallback.save(name, bytes)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/deliver.rs"]
mod tests;
