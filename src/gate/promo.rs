use crate::storage::{KeyValueStore, SafeStore};

/// Storage key for the lifetime download counter.
pub const DOWNLOAD_COUNT_KEY: &str = "ig_download_count";
/// Storage key for the "don't show again" flag.
pub const DONT_SHOW_KEY: &str = "ig_popup_dont_show";

/// How often the promo prompt appears, counted in downloads.
pub const PROMO_EVERY: u64 = 5;

/// Cadence for the post-download promo prompt.
///
/// The prompt shows on the first download and then on every fifth, until the user opts out.
pub struct PromoCadence<S> {
    store: SafeStore<S>,
}

impl<S: KeyValueStore> PromoCadence<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: SafeStore::new(store),
        }
    }

    /// Downloads recorded so far. Missing or unparsable values count as zero.
    pub fn download_count(&self) -> u64 {
        self.store
            .read(DOWNLOAD_COUNT_KEY)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0)
    }

    /// Whether the prompt should accompany the download about to happen.
    pub fn should_show(&self) -> bool {
        if self.store.read(DONT_SHOW_KEY).as_deref() == Some("1") {
            return false;
        }
        let upcoming = self.download_count() + 1;
        upcoming == 1 || upcoming % PROMO_EVERY == 0
    }

    /// Record one completed download.
    pub fn record_download(&self) -> u64 {
        let next = self.download_count() + 1;
        self.store.write(DOWNLOAD_COUNT_KEY, &next.to_string());
        next
    }

    /// Permanently suppress the prompt.
    pub fn dont_show_again(&self) {
        self.store.write(DONT_SHOW_KEY, "1");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gate/promo.rs"]
mod tests;
