//! Tests for the draft lifecycle service.

use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::crypto::CipherEngine;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    FixtureNoteApi, KeyValueStoreError, MockAuditSink, MockKeyValueStore, MockNoteApi,
    NoopAuditSink,
};
use crate::outbound::storage::InMemoryKeyValueStore;

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn note_id(raw: &str) -> NoteId {
    NoteId::new(raw).expect("valid note id")
}

struct Bench {
    secure: SecureStore<InMemoryKeyValueStore>,
    backing: Arc<InMemoryKeyValueStore>,
}

impl Bench {
    fn new() -> Self {
        let backing = Arc::new(InMemoryKeyValueStore::new());
        let secure = SecureStore::new(
            Arc::new(CipherEngine::new([11u8; 32])),
            Arc::clone(&backing),
        );
        Self { secure, backing }
    }

    fn service<N: NoteApi, A: AuditSink>(
        &self,
        note_api: N,
        audit: A,
    ) -> DraftService<InMemoryKeyValueStore, N, A> {
        DraftService::new(
            self.secure.clone(),
            Arc::new(note_api),
            Arc::new(audit),
            Arc::new(FixtureClock {
                utc_now: fixture_timestamp(),
            }),
            ClientInfo::new("1.0.0-test", "test-harness"),
        )
    }

    fn cached_draft(&self, key: &str) -> Option<DraftRecord> {
        self.secure.get_object(key).expect("cache readable")
    }
}

#[tokio::test]
async fn save_draft_writes_primary_and_syncs() {
    let bench = Bench::new();
    let mut api = MockNoteApi::new();
    api.expect_save_note().times(1).returning(|_, _| Ok(()));
    let service = bench.service(api, NoopAuditSink);
    let id = note_id("123");

    service
        .save_draft(&id, json!({"clientName": "John Doe"}))
        .await
        .expect("save succeeds");

    let primary = bench.cached_draft(&id.draft_key()).expect("primary cached");
    assert_eq!(primary.content, json!({"clientName": "John Doe"}));
    assert_eq!(primary.saved_at, fixture_timestamp());
    assert!(bench.cached_draft(&id.recovery_key()).is_none());
}

#[tokio::test]
async fn offline_save_preserves_a_recovery_draft() {
    let bench = Bench::new();
    let mut api = MockNoteApi::new();
    api.expect_save_note()
        .times(1)
        .returning(|_, _| Err(NoteApiError::network("connection refused")));
    let service = bench.service(api, NoopAuditSink);
    let id = note_id("123");

    let err = service
        .save_draft(&id, json!({"clientName": "John Doe"}))
        .await
        .expect_err("server save fails");
    assert_eq!(err.code(), ErrorCode::Network);
    assert!(err.message().contains("preserved on this device"));

    let recovery = bench
        .cached_draft(&id.recovery_key())
        .expect("recovery cached");
    assert_eq!(recovery.content, json!({"clientName": "John Doe"}));

    let recovered = service
        .recover_draft(&id)
        .expect("recover succeeds")
        .expect("draft survives");
    assert_eq!(recovered.content, json!({"clientName": "John Doe"}));
}

#[tokio::test]
async fn offline_save_that_cannot_cache_says_so() {
    let mut backing = MockKeyValueStore::new();
    backing
        .expect_put()
        .times(2)
        .returning(|_, _| Err(KeyValueStoreError::io("quota exceeded")));
    let secure = SecureStore::new(Arc::new(CipherEngine::new([11u8; 32])), Arc::new(backing));
    let mut api = MockNoteApi::new();
    api.expect_save_note()
        .times(1)
        .returning(|_, _| Err(NoteApiError::network("connection refused")));
    let service = DraftService::new(
        secure,
        Arc::new(api),
        Arc::new(NoopAuditSink),
        Arc::new(FixtureClock {
            utc_now: fixture_timestamp(),
        }),
        ClientInfo::new("1.0.0-test", "test-harness"),
    );
    let id = note_id("123");

    let err = service
        .save_draft(&id, json!({"clientName": "John Doe"}))
        .await
        .expect_err("server save fails");
    assert_eq!(err.code(), ErrorCode::Network);
    assert!(err.message().contains("could not be cached"));
}

#[tokio::test]
async fn failed_save_emits_a_warning_audit_event() {
    let bench = Bench::new();
    let mut api = MockNoteApi::new();
    api.expect_save_note()
        .times(1)
        .returning(|_, _| Err(NoteApiError::network("offline")));
    let mut sink = MockAuditSink::new();
    sink.expect_record()
        .withf(|event| {
            event.action == "NOTE_DRAFT_SAVE_FAILED"
                && event.severity == Severity::Warning
                && event.entity_id.as_deref() == Some("77")
        })
        .times(1)
        .returning(|_| ());
    let service = bench.service(api, sink);

    let _ = service.save_draft(&note_id("77"), json!({})).await;
}

#[tokio::test]
async fn recover_prefers_primary_over_recovery() {
    let bench = Bench::new();
    let id = note_id("9");
    bench
        .secure
        .put_object(
            &id.recovery_key(),
            &DraftRecord::new(id.clone(), json!({"v": 1}), fixture_timestamp()),
        )
        .expect("seed recovery");
    bench
        .secure
        .put_object(
            &id.draft_key(),
            &DraftRecord::new(id.clone(), json!({"v": 2}), fixture_timestamp()),
        )
        .expect("seed primary");
    let service = bench.service(FixtureNoteApi, NoopAuditSink);

    let recovered = service
        .recover_draft(&id)
        .expect("recover succeeds")
        .expect("draft present");
    assert_eq!(recovered.content, json!({"v": 2}));
}

#[tokio::test]
async fn corrupted_primary_falls_back_to_recovery() {
    let bench = Bench::new();
    let id = note_id("9");
    bench
        .secure
        .put_object(
            &id.recovery_key(),
            &DraftRecord::new(id.clone(), json!({"v": 1}), fixture_timestamp()),
        )
        .expect("seed recovery");
    bench
        .backing
        .put(&id.draft_key(), "garbled ciphertext")
        .expect("seed corruption");
    let service = bench.service(FixtureNoteApi, NoopAuditSink);

    let recovered = service
        .recover_draft(&id)
        .expect("recover succeeds")
        .expect("recovery survives");
    assert_eq!(recovered.content, json!({"v": 1}));
    // The corrupted primary entry must be gone after the read.
    assert_eq!(
        bench.backing.get(&id.draft_key()).expect("raw get succeeds"),
        None
    );
}

#[tokio::test]
async fn recover_with_no_cached_draft_returns_none() {
    let bench = Bench::new();
    let service = bench.service(FixtureNoteApi, NoopAuditSink);
    assert_eq!(
        service.recover_draft(&note_id("404")).expect("recover succeeds"),
        None
    );
}

#[tokio::test]
async fn finalize_purges_both_cache_entries() {
    let bench = Bench::new();
    let mut api = MockNoteApi::new();
    api.expect_finalize_note()
        .withf(|id, signature, fingerprint| {
            id.as_str() == "123" && signature == "Dr. John Smith" && fingerprint.len() == 64
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    let service = bench.service(api, NoopAuditSink);
    let id = note_id("123");
    let record = DraftRecord::new(id.clone(), json!({"v": 1}), fixture_timestamp());
    bench
        .secure
        .put_object(&id.draft_key(), &record)
        .expect("seed primary");
    bench
        .secure
        .put_object(&id.recovery_key(), &record)
        .expect("seed recovery");

    service
        .finalize_note(&id, "Dr. John Smith")
        .await
        .expect("finalize succeeds");

    assert_eq!(bench.backing.get(&id.draft_key()).expect("raw get"), None);
    assert_eq!(bench.backing.get(&id.recovery_key()).expect("raw get"), None);
}

#[tokio::test]
async fn finalize_rejects_a_blank_signature() {
    let bench = Bench::new();
    let service = bench.service(FixtureNoteApi, NoopAuditSink);
    let err = service
        .finalize_note(&note_id("123"), "   ")
        .await
        .expect_err("blank signature rejected");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn failed_finalize_keeps_cached_drafts() {
    let bench = Bench::new();
    let mut api = MockNoteApi::new();
    api.expect_finalize_note()
        .times(1)
        .returning(|_, _, _| Err(NoteApiError::rejected("note already signed")));
    let service = bench.service(api, NoopAuditSink);
    let id = note_id("55");
    bench
        .secure
        .put_object(
            &id.draft_key(),
            &DraftRecord::new(id.clone(), json!({"v": 1}), fixture_timestamp()),
        )
        .expect("seed primary");

    let err = service
        .finalize_note(&id, "Dr. Jane Smith")
        .await
        .expect_err("finalize refused");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert!(bench.cached_draft(&id.draft_key()).is_some());
}

#[tokio::test]
async fn discard_deletes_server_side_then_purges_cache() {
    let bench = Bench::new();
    let mut api = MockNoteApi::new();
    api.expect_delete_note().times(1).returning(|_| Ok(()));
    let service = bench.service(api, NoopAuditSink);
    let id = note_id("8");
    bench
        .secure
        .put_object(
            &id.draft_key(),
            &DraftRecord::new(id.clone(), json!({"v": 1}), fixture_timestamp()),
        )
        .expect("seed primary");

    service.discard_note(&id).await.expect("discard succeeds");
    assert_eq!(bench.backing.get(&id.draft_key()).expect("raw get"), None);
    assert_eq!(bench.backing.get(&id.recovery_key()).expect("raw get"), None);
}
