use crate::foundation::day::{Clock, today_key};
use crate::storage::{KeyValueStore, SafeStore};

/// Why the caller is being asked to authenticate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptReason {
    /// The tool's free daily quota is used up.
    LimitReached,
}

/// Login/signup collaborator.
///
/// `request` blocks until the user finishes or dismisses the prompt and reports whether
/// they are now authenticated.
pub trait AuthPrompt {
    fn request(&mut self, reason: PromptReason) -> bool;
}

/// Prompt that records requests and always declines. Useful for headless callers.
#[derive(Clone, Debug, Default)]
pub struct DeclinePrompt {
    pub requests: Vec<PromptReason>,
}

impl AuthPrompt for DeclinePrompt {
    fn request(&mut self, reason: PromptReason) -> bool {
        self.requests.push(reason);
        false
    }
}

/// Per-tool daily counter as persisted in storage.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UsageCounter {
    /// Invocations used on `date`.
    pub count: u32,
    /// Calendar-day key the count applies to.
    pub date: String,
}

impl UsageCounter {
    /// Fresh counter for `date`.
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            count: 0,
            date: date.into(),
        }
    }

    /// A counter only counts on the day it was written for.
    pub fn is_valid_for(&self, today: &str) -> bool {
        self.date == today
    }
}

/// Storage key for a tool's counter.
pub fn usage_key(tool_id: &str) -> String {
    format!("{tool_id}_dailyUsage")
}

/// Daily free-use quota for unauthenticated callers.
///
/// State lives entirely in the store; every call re-reads it so a stale in-memory copy can
/// never survive a day boundary. Storage read failures fail open (an empty counter).
pub struct UsageGate<S, C> {
    store: SafeStore<S>,
    clock: C,
}

impl<S: KeyValueStore, C: Clock> UsageGate<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store: SafeStore::new(store),
            clock,
        }
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        self.store.inner()
    }

    /// Today's counter for `tool_id`.
    ///
    /// A missing, corrupt, or out-of-date counter is replaced by `{0, today}`, and the
    /// replacement is written back immediately.
    pub fn load_counter(&self, tool_id: &str) -> UsageCounter {
        let key = usage_key(tool_id);
        let today = today_key(&self.clock);

        let stored = self.store.read(&key).and_then(|raw| {
            serde_json::from_str::<UsageCounter>(&raw)
                .inspect_err(|err| tracing::warn!(tool_id, %err, "discarding corrupt usage counter"))
                .ok()
        });

        match stored {
            Some(counter) if counter.is_valid_for(&today) => counter,
            _ => {
                let fresh = UsageCounter::empty(today);
                self.persist(&key, &fresh);
                fresh
            }
        }
    }

    /// Decide whether one more invocation of `tool_id` is allowed.
    ///
    /// Authenticated callers always pass and are never metered. Unauthenticated callers at
    /// or over `daily_limit` trigger `prompt` with [`PromptReason::LimitReached`] and are
    /// refused. Passing does not consume quota; call [`UsageGate::increment_usage`] once the
    /// action has succeeded.
    pub fn check_usage_limit(
        &self,
        tool_id: &str,
        daily_limit: u32,
        is_authenticated: bool,
        prompt: &mut dyn AuthPrompt,
    ) -> bool {
        if is_authenticated {
            return true;
        }

        let counter = self.load_counter(tool_id);
        if counter.count >= daily_limit {
            tracing::info!(tool_id, count = counter.count, daily_limit, "daily limit reached");
            prompt.request(PromptReason::LimitReached);
            return false;
        }
        true
    }

    /// Count one successful invocation of `tool_id` against today's quota.
    pub fn increment_usage(&self, tool_id: &str) -> UsageCounter {
        let mut counter = self.load_counter(tool_id);
        counter.count = counter.count.saturating_add(1);
        self.persist(&usage_key(tool_id), &counter);
        tracing::debug!(tool_id, count = counter.count, "usage incremented");
        counter
    }

    /// Free uses left today, for display only.
    pub fn remaining_uses(&self, tool_id: &str, daily_limit: u32) -> u32 {
        daily_limit.saturating_sub(self.load_counter(tool_id).count)
    }

    /// Forget today's counter for `tool_id`.
    pub fn reset_usage(&self, tool_id: &str) -> bool {
        self.store.clear(&usage_key(tool_id))
    }

    fn persist(&self, key: &str, counter: &UsageCounter) {
        match serde_json::to_string(counter) {
            Ok(json) => {
                self.store.write(key, &json);
            }
            Err(err) => tracing::warn!(key, %err, "serialize usage counter"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gate/usage.rs"]
mod tests;
