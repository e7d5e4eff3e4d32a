//! Namespaced key/value string storage.
//!
//! Components never talk to a concrete backend: they take any [`KeyValueStore`] and usually
//! wrap it in [`SafeStore`], which turns backend failures into logged fallbacks.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::foundation::error::{StickerError, StickerResult};

/// Synchronous string storage with no transactions and no expiry.
///
/// Methods take `&self`; backends provide their own interior mutability so one store can be
/// shared by several components (the usage gate and the promo cadence share one key space).
pub trait KeyValueStore {
    /// Read `key`, `Ok(None)` when absent.
    fn get(&self, key: &str) -> StickerResult<Option<String>>;
    /// Write `value` under `key`.
    fn set(&self, key: &str, value: &str) -> StickerResult<()>;
    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> StickerResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StickerResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StickerResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StickerResult<()> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> StickerResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StickerResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StickerResult<()> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StickerResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StickerResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StickerResult<()> {
        (**self).remove(key)
    }
}

/// In-process store, the test double for browser storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries, sorted by key.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    fn with_map<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>) -> T,
    ) -> StickerResult<T> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| StickerError::storage("memory store lock poisoned"))?;
        Ok(f(&mut guard))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StickerResult<Option<String>> {
        self.with_map(|m| m.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StickerResult<()> {
        self.with_map(|m| {
            m.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> StickerResult<()> {
        self.with_map(|m| {
            m.remove(key);
        })
    }
}

/// Store persisted as one JSON object file (`{"key": "value", ...}`).
///
/// The file is re-read on every access, so writes made by another process become visible
/// on the next read. Concurrent writers are last-write-wins.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StickerResult<BTreeMap<String, String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StickerError::storage(format!(
                    "read '{}': {e}",
                    self.path.display()
                )));
            }
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            StickerError::storage(format!("parse '{}': {e}", self.path.display()))
        })
    }

    fn save(&self, map: &BTreeMap<String, String>) -> StickerResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                StickerError::storage(format!("create dir '{}': {e}", parent.display()))
            })?;
        }
        let json = serde_json::to_string_pretty(map)
            .map_err(|e| StickerError::storage(format!("serialize store: {e}")))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| StickerError::storage(format!("write '{}': {e}", tmp.display())))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            StickerError::storage(format!("replace '{}': {e}", self.path.display()))
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> StickerResult<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StickerResult<()> {
        let mut map = self.load()?;
        map.insert(key.to_string(), value.to_string());
        self.save(&map)
    }

    fn remove(&self, key: &str) -> StickerResult<()> {
        let mut map = self.load()?;
        if map.remove(key).is_some() {
            self.save(&map)?;
        }
        Ok(())
    }
}

/// Failure-absorbing wrapper around a [`KeyValueStore`].
///
/// Reads that fail return `None` (callers treat that as "nothing stored"); writes that fail
/// are dropped. Both are logged at `warn`.
#[derive(Clone, Debug)]
pub struct SafeStore<S> {
    inner: S,
}

impl<S: KeyValueStore> SafeStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Read `key`, or `None` if absent or the store failed.
    pub fn read(&self, key: &str) -> Option<String> {
        match self.inner.get(key) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(key, %err, "storage read failed; using default");
                None
            }
        }
    }

    /// Write `key`; returns whether the write reached the backend.
    pub fn write(&self, key: &str, value: &str) -> bool {
        match self.inner.set(key, value) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(key, %err, "storage write failed; value dropped");
                false
            }
        }
    }

    /// Delete `key`; returns whether the delete reached the backend.
    pub fn clear(&self, key: &str) -> bool {
        match self.inner.remove(key) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(key, %err, "storage delete failed");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storage/store.rs"]
mod tests;
