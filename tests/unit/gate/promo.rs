use super::*;
use crate::storage::MemoryStore;

#[test]
fn shows_on_first_and_every_fifth_download() {
    let store = MemoryStore::new();
    let promo = PromoCadence::new(&store);

    let mut shown_at = Vec::new();
    for n in 1..=12u64 {
        if promo.should_show() {
            shown_at.push(n);
        }
        assert_eq!(promo.record_download(), n);
    }
    assert_eq!(shown_at, vec![1, 5, 10]);
    assert_eq!(store.get(DOWNLOAD_COUNT_KEY).unwrap().as_deref(), Some("12"));
}

#[test]
fn opt_out_suppresses_prompt() {
    let store = MemoryStore::new();
    let promo = PromoCadence::new(&store);
    assert!(promo.should_show());
    promo.dont_show_again();
    assert!(!promo.should_show());
    assert_eq!(store.get(DONT_SHOW_KEY).unwrap().as_deref(), Some("1"));
}

#[test]
fn garbage_count_reads_as_zero() {
    let store = MemoryStore::new();
    store.set(DOWNLOAD_COUNT_KEY, "lots").unwrap();
    let promo = PromoCadence::new(&store);
    assert_eq!(promo.download_count(), 0);
    assert!(promo.should_show());
}
