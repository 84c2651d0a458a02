//! Draft lifecycle service: save, recover, finalize, discard.

use std::sync::Arc;

use mockable::Clock;
use serde_json::Value;
use tracing::warn;

use crate::domain::Error;
use crate::domain::audit::{AuditEvent, ClientInfo, Severity};
use crate::domain::drafts::{DraftRecord, DraftSlot, NoteId};
use crate::domain::ports::{AuditSink, KeyValueStore, NoteApi, NoteApiError};
use crate::domain::secure_store::SecureStore;

const ACTION_DRAFT_SAVED: &str = "NOTE_DRAFT_SAVED";
const ACTION_DRAFT_SAVE_FAILED: &str = "NOTE_DRAFT_SAVE_FAILED";
const ACTION_NOTE_FINALIZED: &str = "NOTE_FINALIZED";
const ACTION_NOTE_FINALIZE_FAILED: &str = "NOTE_FINALIZE_FAILED";
const ACTION_NOTE_DISCARDED: &str = "NOTE_DISCARDED";

const OFFLINE_SAVE_MESSAGE: &str =
    "Unable to reach the server. Your draft is preserved on this device.";
const OFFLINE_UNCACHED_MESSAGE: &str =
    "Unable to reach the server, and the draft could not be cached on this device. \
     Keep this note open and retry.";

fn map_note_api_error(error: NoteApiError) -> Error {
    match error {
        NoteApiError::Network { .. } => Error::network(OFFLINE_SAVE_MESSAGE),
        NoteApiError::Unauthorized { message } => Error::unauthorized(message),
        NoteApiError::Rejected { message } => Error::invalid_request(message),
    }
}

/// Like [`map_note_api_error`], but only promises local preservation when a
/// cache write actually succeeded.
fn map_save_error(error: NoteApiError, locally_cached: bool) -> Error {
    match error {
        NoteApiError::Network { .. } if !locally_cached => {
            Error::network(OFFLINE_UNCACHED_MESSAGE)
        }
        other => map_note_api_error(other),
    }
}

/// Client-side draft lifecycle for clinical notes.
///
/// States per note: `NO_DRAFT -> DRAFT_SAVED -> (FINALIZED | DELETED)`.
/// Every save rewrites the primary cache entry; a save whose authoritative
/// server write fails additionally writes the recovery entry, so both can
/// coexist. Finalizing or discarding removes both entries unconditionally.
///
/// Known limitation: the cache is tab-global with no locking, so concurrent
/// tabs or devices editing the same note clobber each other's drafts; the
/// last write observed wins and no merge or conflict detection is attempted.
pub struct DraftService<S, N, A> {
    secure: SecureStore<S>,
    note_api: Arc<N>,
    audit: Arc<A>,
    clock: Arc<dyn Clock>,
    client_info: ClientInfo,
}

impl<S, N, A> DraftService<S, N, A>
where
    S: KeyValueStore,
    N: NoteApi,
    A: AuditSink,
{
    /// Wire the draft lifecycle to its collaborators.
    pub fn new(
        secure: SecureStore<S>,
        note_api: Arc<N>,
        audit: Arc<A>,
        clock: Arc<dyn Clock>,
        client_info: ClientInfo,
    ) -> Self {
        Self {
            secure,
            note_api,
            audit,
            clock,
            client_info,
        }
    }

    /// Cache the draft locally and push it to the server.
    ///
    /// The primary cache entry is always written first. When the server
    /// write then fails, the same record is written to the recovery entry
    /// and the error is returned with a display-ready message; the caller
    /// can tell the user their work is preserved on this device.
    ///
    /// # Errors
    ///
    /// Returns the mapped server error when the authoritative write fails.
    /// Local cache failures alone never fail the save; the cache is
    /// best-effort.
    pub async fn save_draft(&self, note_id: &NoteId, content: Value) -> Result<(), Error> {
        let record = DraftRecord::new(note_id.clone(), content, self.clock.utc());

        let primary_cached = match self.secure.put_object(&note_id.draft_key(), &record) {
            Ok(()) => true,
            Err(err) => {
                warn!(note_id = %note_id, error = %err, "failed to cache draft locally");
                false
            }
        };

        match self.note_api.save_note(note_id, &record.content).await {
            Ok(()) => {
                self.emit(
                    ACTION_DRAFT_SAVED,
                    format!("Draft for note {note_id} synced to server"),
                    Severity::Info,
                    note_id,
                )
                .await;
                Ok(())
            }
            Err(err) => {
                let recovery_cached =
                    match self.secure.put_object(&note_id.recovery_key(), &record) {
                        Ok(()) => true,
                        Err(cache_err) => {
                            warn!(
                                note_id = %note_id,
                                error = %cache_err,
                                "failed to write recovery draft entry"
                            );
                            false
                        }
                    };
                self.emit(
                    ACTION_DRAFT_SAVE_FAILED,
                    format!("Server save failed for note {note_id}: {err}"),
                    Severity::Warning,
                    note_id,
                )
                .await;
                Err(map_save_error(err, primary_cached || recovery_cached))
            }
        }
    }

    /// Read both cache entries for a note as one versioned slot.
    ///
    /// Corrupted entries are erased by the secure store and read as absent.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the backing store fails.
    pub fn load_slot(&self, note_id: &NoteId) -> Result<DraftSlot, Error> {
        let primary = self
            .secure
            .get_object(&note_id.draft_key())
            .map_err(|err| Error::internal(format!("draft cache unavailable: {err}")))?;
        let recovery = self
            .secure
            .get_object(&note_id.recovery_key())
            .map_err(|err| Error::internal(format!("draft cache unavailable: {err}")))?;
        Ok(DraftSlot { primary, recovery })
    }

    /// The draft to restore into the editor, if any survived locally.
    ///
    /// Primary entry first, then recovery; `None` means the caller falls
    /// back to server-fetched content.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the backing store fails.
    pub fn recover_draft(&self, note_id: &NoteId) -> Result<Option<DraftRecord>, Error> {
        Ok(self.load_slot(note_id)?.into_latest())
    }

    /// Sign and lock a note, then purge both cache entries.
    ///
    /// The signature is fingerprinted with the shared cipher's digest before
    /// it is sent. After the server accepts, both draft entries are removed
    /// whether or not they existed.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request error for a blank signature, the mapped
    /// server error when finalization is refused, or an internal error when
    /// the cache purge fails.
    pub async fn finalize_note(&self, note_id: &NoteId, signature: &str) -> Result<(), Error> {
        if signature.trim().is_empty() {
            return Err(Error::invalid_request("A signature is required to finalize a note"));
        }
        let fingerprint = self.secure.cipher().hash(signature);

        if let Err(err) = self
            .note_api
            .finalize_note(note_id, signature, &fingerprint)
            .await
        {
            self.emit(
                ACTION_NOTE_FINALIZE_FAILED,
                format!("Finalize failed for note {note_id}: {err}"),
                Severity::Warning,
                note_id,
            )
            .await;
            return Err(map_note_api_error(err));
        }

        self.clear_local(note_id)?;
        self.emit(
            ACTION_NOTE_FINALIZED,
            format!("Note {note_id} signed and locked"),
            Severity::Info,
            note_id,
        )
        .await;
        Ok(())
    }

    /// Delete a note server-side, then purge both cache entries.
    ///
    /// # Errors
    ///
    /// Returns the mapped server error when deletion is refused, or an
    /// internal error when the cache purge fails.
    pub async fn discard_note(&self, note_id: &NoteId) -> Result<(), Error> {
        self.note_api
            .delete_note(note_id)
            .await
            .map_err(map_note_api_error)?;

        self.clear_local(note_id)?;
        self.emit(
            ACTION_NOTE_DISCARDED,
            format!("Note {note_id} deleted"),
            Severity::Info,
            note_id,
        )
        .await;
        Ok(())
    }

    fn clear_local(&self, note_id: &NoteId) -> Result<(), Error> {
        // Both removals are attempted even if the first fails; cached PHI
        // must not outlive its note.
        let primary = self.secure.remove(&note_id.draft_key());
        let recovery = self.secure.remove(&note_id.recovery_key());
        primary
            .and(recovery)
            .map_err(|err| Error::internal(format!("failed to purge cached drafts: {err}")))
    }

    async fn emit(&self, action: &str, description: String, severity: Severity, note_id: &NoteId) {
        let event = AuditEvent::new(
            action,
            description,
            severity,
            self.clock.utc(),
            self.client_info.clone(),
        )
        .with_entity("note", note_id.as_str());
        self.audit.record(event).await;
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
