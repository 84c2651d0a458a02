//! Tests for the secure store's encrypt-write / read-erase contract.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::outbound::storage::InMemoryKeyValueStore;

type TestStore = (SecureStore<InMemoryKeyValueStore>, Arc<InMemoryKeyValueStore>);

#[fixture]
fn store() -> TestStore {
    let backing = Arc::new(InMemoryKeyValueStore::new());
    let secure = SecureStore::new(
        Arc::new(CipherEngine::new([5u8; 32])),
        Arc::clone(&backing),
    );
    (secure, backing)
}

#[rstest]
fn string_round_trip(store: TestStore) {
    let (secure, _) = store;
    secure.put_string("greeting", "hello").expect("put succeeds");
    assert_eq!(
        secure.get_string("greeting").expect("get succeeds"),
        Some("hello".to_owned())
    );
}

#[rstest]
fn object_round_trip(store: TestStore) {
    let (secure, _) = store;
    let value = json!({"clientName": "John Doe", "sessionCount": 4});
    secure.put_object("note", &value).expect("put succeeds");
    let read: Option<serde_json::Value> = secure.get_object("note").expect("get succeeds");
    assert_eq!(read, Some(value));
}

#[rstest]
fn stored_value_is_not_plaintext(store: TestStore) {
    let (secure, backing) = store;
    secure.put_string("phi", "sensitive detail").expect("put succeeds");
    let raw = backing.get("phi").expect("raw get succeeds").expect("entry exists");
    assert!(!raw.contains("sensitive detail"));
}

#[rstest]
fn missing_key_reads_as_none(store: TestStore) {
    let (secure, _) = store;
    assert_eq!(secure.get_string("never_written").expect("get succeeds"), None);
}

#[rstest]
fn corrupted_entry_is_erased_and_reads_as_none(store: TestStore) {
    let (secure, backing) = store;
    backing
        .put("note_draft_9", "definitely-not-ciphertext")
        .expect("raw put succeeds");

    let read: Option<serde_json::Value> =
        secure.get_object("note_draft_9").expect("get succeeds");
    assert_eq!(read, None);
    assert_eq!(
        backing.get("note_draft_9").expect("raw get succeeds"),
        None,
        "corrupted entry must be deleted, not preserved"
    );
}

#[rstest]
fn truncated_ciphertext_is_erased(store: TestStore) {
    let (secure, backing) = store;
    secure.put_string("draft", "some content").expect("put succeeds");
    let raw = backing.get("draft").expect("raw get succeeds").expect("entry exists");
    let truncated: String = raw.chars().take(raw.len() / 2).collect();
    backing.put("draft", &truncated).expect("raw put succeeds");

    assert_eq!(secure.get_string("draft").expect("get succeeds"), None);
    assert_eq!(backing.get("draft").expect("raw get succeeds"), None);
}

#[rstest]
fn decryptable_but_unparsable_entry_is_erased(store: TestStore) {
    let (secure, backing) = store;
    // Valid ciphertext of invalid JSON for the requested shape.
    secure.put_string("slot", "plain text, not an object").expect("put succeeds");

    #[derive(serde::Deserialize)]
    struct Shaped {
        #[expect(dead_code, reason = "shape only matters for parse failure")]
        id: u32,
    }
    let read: Option<Shaped> = secure.get_object("slot").expect("get succeeds");
    assert!(read.is_none());
    assert_eq!(backing.get("slot").expect("raw get succeeds"), None);
}

#[rstest]
fn remove_deletes_the_entry(store: TestStore) {
    let (secure, backing) = store;
    secure.put_string("token", "abc").expect("put succeeds");
    secure.remove("token").expect("remove succeeds");
    assert_eq!(backing.get("token").expect("raw get succeeds"), None);
}
