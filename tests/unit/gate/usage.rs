use chrono::NaiveDate;

use super::*;
use crate::foundation::day::{FixedClock, day_key};
use crate::foundation::error::{StickerError, StickerResult};
use crate::storage::MemoryStore;

fn jan(day: u32) -> FixedClock {
    FixedClock(NaiveDate::from_ymd_opt(2026, 1, day).unwrap())
}

fn seed(store: &MemoryStore, tool: &str, count: u32, date: &str) {
    let json = serde_json::to_string(&UsageCounter {
        count,
        date: date.to_string(),
    })
    .unwrap();
    store.set(&usage_key(tool), &json).unwrap();
}

fn stored(store: &MemoryStore, tool: &str) -> UsageCounter {
    serde_json::from_str(&store.get(&usage_key(tool)).unwrap().unwrap()).unwrap()
}

struct UnreadableStore;

impl KeyValueStore for UnreadableStore {
    fn get(&self, _key: &str) -> StickerResult<Option<String>> {
        Err(StickerError::storage("access denied"))
    }

    fn set(&self, _key: &str, _value: &str) -> StickerResult<()> {
        Err(StickerError::storage("access denied"))
    }

    fn remove(&self, _key: &str) -> StickerResult<()> {
        Err(StickerError::storage("access denied"))
    }
}

#[test]
fn key_is_namespaced_by_tool() {
    assert_eq!(usage_key("password-generator"), "password-generator_dailyUsage");
}

#[test]
fn first_read_creates_and_persists_empty_counter() {
    let store = MemoryStore::new();
    let gate = UsageGate::new(&store, jan(1));

    let c = gate.load_counter("lorem");
    assert_eq!(c, UsageCounter::empty(day_key(jan(1).0)));
    assert_eq!(stored(&store, "lorem"), c);
}

#[test]
fn date_rollover_resets_quota() {
    let store = MemoryStore::new();
    seed(&store, "tool", 3, &day_key(jan(1).0));

    let gate = UsageGate::new(&store, jan(2));
    let mut prompt = DeclinePrompt::default();
    assert!(gate.check_usage_limit("tool", 3, false, &mut prompt));
    assert!(prompt.requests.is_empty());

    let after = stored(&store, "tool");
    assert_eq!(after.count, 0);
    assert_eq!(after.date, day_key(jan(2).0));
}

#[test]
fn authenticated_bypass_never_touches_storage() {
    let store = MemoryStore::new();
    seed(&store, "tool", 99, &day_key(jan(1).0));
    let before = store.entries();

    let gate = UsageGate::new(&store, jan(1));
    let mut prompt = DeclinePrompt::default();
    for _ in 0..5 {
        assert!(gate.check_usage_limit("tool", 3, true, &mut prompt));
    }
    assert!(gate.check_usage_limit("fresh-tool", 0, true, &mut prompt));

    assert_eq!(store.entries(), before);
    assert!(prompt.requests.is_empty());
}

#[test]
fn quota_boundary() {
    let store = MemoryStore::new();
    seed(&store, "tool", 2, &day_key(jan(5).0));
    let gate = UsageGate::new(&store, jan(5));
    let mut prompt = DeclinePrompt::default();

    assert!(gate.check_usage_limit("tool", 3, false, &mut prompt));
    assert_eq!(gate.increment_usage("tool").count, 3);
    assert_eq!(stored(&store, "tool").count, 3);

    assert!(!gate.check_usage_limit("tool", 3, false, &mut prompt));
    assert_eq!(prompt.requests, vec![PromptReason::LimitReached]);
    assert_eq!(gate.remaining_uses("tool", 3), 0);
}

#[test]
fn check_does_not_consume_quota() {
    let store = MemoryStore::new();
    let gate = UsageGate::new(&store, jan(3));
    let mut prompt = DeclinePrompt::default();

    for _ in 0..10 {
        assert!(gate.check_usage_limit("tool", 1, false, &mut prompt));
    }
    assert_eq!(gate.remaining_uses("tool", 1), 1);
}

#[test]
fn remaining_uses_saturates() {
    let store = MemoryStore::new();
    seed(&store, "tool", 7, &day_key(jan(3).0));
    let gate = UsageGate::new(&store, jan(3));
    assert_eq!(gate.remaining_uses("tool", 2), 0);
    assert_eq!(gate.remaining_uses("tool", 10), 3);
    assert_eq!(gate.remaining_uses("other", 2), 2);
}

#[test]
fn tools_are_counted_independently() {
    let store = MemoryStore::new();
    let gate = UsageGate::new(&store, jan(3));
    gate.increment_usage("a");
    gate.increment_usage("a");
    gate.increment_usage("b");
    assert_eq!(gate.load_counter("a").count, 2);
    assert_eq!(gate.load_counter("b").count, 1);
}

#[test]
fn corrupt_counter_is_treated_as_missing() {
    let store = MemoryStore::new();
    store.set(&usage_key("tool"), "{not json").unwrap();
    let gate = UsageGate::new(&store, jan(3));
    assert_eq!(gate.load_counter("tool").count, 0);
    assert_eq!(stored(&store, "tool").count, 0);
}

#[test]
fn unreadable_storage_fails_open() {
    let gate = UsageGate::new(UnreadableStore, jan(3));
    let mut prompt = DeclinePrompt::default();
    assert!(gate.check_usage_limit("tool", 1, false, &mut prompt));
    assert_eq!(gate.increment_usage("tool").count, 1);
    assert_eq!(gate.remaining_uses("tool", 1), 1);
}

#[test]
fn reset_clears_todays_count() {
    let store = MemoryStore::new();
    let gate = UsageGate::new(&store, jan(4));
    gate.increment_usage("tool");
    assert!(gate.reset_usage("tool"));
    assert!(store.get(&usage_key("tool")).unwrap().is_none());
    assert_eq!(gate.remaining_uses("tool", 2), 2);

    assert!(!UsageGate::new(UnreadableStore, jan(4)).reset_usage("tool"));
}
