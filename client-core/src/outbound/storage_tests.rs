//! Tests for the key-value store adapters.

use rstest::rstest;

use super::*;

#[rstest]
fn in_memory_round_trips_and_removes() {
    let store = InMemoryKeyValueStore::new();
    assert_eq!(store.get("token").expect("get"), None);

    store.put("token", "abc").expect("put");
    assert_eq!(store.get("token").expect("get"), Some("abc".to_owned()));

    store.put("token", "def").expect("overwrite");
    assert_eq!(store.get("token").expect("get"), Some("def".to_owned()));

    store.remove("token").expect("remove");
    assert_eq!(store.get("token").expect("get"), None);
    store.remove("token").expect("removing an absent key is fine");
}

#[rstest]
fn json_file_store_persists_across_opens() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cache.json");

    {
        let store = JsonFileKeyValueStore::open(&path).expect("open fresh");
        store.put("note_draft_1", "sealed").expect("put");
        store.put("token", "abc").expect("put");
        store.remove("token").expect("remove");
    }

    let reopened = JsonFileKeyValueStore::open(&path).expect("reopen");
    assert_eq!(
        reopened.get("note_draft_1").expect("get"),
        Some("sealed".to_owned())
    );
    assert_eq!(reopened.get("token").expect("get"), None);
}

#[rstest]
fn json_file_store_starts_empty_when_the_file_is_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileKeyValueStore::open(dir.path().join("absent.json")).expect("open");
    assert_eq!(store.get("anything").expect("get"), None);
}

#[rstest]
fn json_file_store_rejects_a_malformed_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cache.json");
    std::fs::write(&path, "not json at all").expect("seed file");

    let error = JsonFileKeyValueStore::open(&path).expect_err("open fails");
    assert!(matches!(
        error,
        crate::domain::ports::KeyValueStoreError::Serialization { .. }
    ));
}
