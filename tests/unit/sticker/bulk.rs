use super::*;

#[test]
fn keeps_insertion_order_and_duplicates() {
    let mut q = BulkQueue::new();
    q.push(BulkCommentEntry::new("a", "one"));
    q.push(BulkCommentEntry::new("b", "two"));
    q.push(BulkCommentEntry::new("a", "one"));
    assert_eq!(q.len(), 3);
    assert_eq!(q.entries()[0], q.entries()[2]);
}

#[test]
fn remove_by_index_shifts_later_entries() {
    let mut q = BulkQueue::from(vec![
        BulkCommentEntry::new("a", "1"),
        BulkCommentEntry::new("b", "2"),
        BulkCommentEntry::new("c", "3"),
    ]);
    assert_eq!(q.remove(1).unwrap().username, "b");
    assert_eq!(q.entries()[1].username, "c");

    let err = q.remove(5).unwrap_err();
    assert!(matches!(err, StickerError::Validation(_)));
    assert_eq!(q.len(), 2);

    q.clear();
    assert!(q.is_empty());
}

#[test]
fn deserializes_from_json_array() {
    let q: BulkQueue = serde_json::from_str(
        r#"[{"username":"a","body_text":"x"},{"username":"b","note":"y"}]"#,
    )
    .unwrap();
    assert_eq!(q.entries()[1], BulkCommentEntry::new("b", "y"));
}
