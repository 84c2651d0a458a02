//! Port abstraction for the authoritative note endpoints.
//!
//! The server is the source of truth for note content; the local draft cache
//! only preserves work the server has not yet accepted. [`NoteApi`] covers
//! the three server interactions the draft lifecycle depends on.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::drafts::NoteId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by note API adapters.
    pub enum NoteApiError {
        /// The request never produced a server response.
        Network { message: String } => "note API request failed: {message}",
        /// The server rejected the caller's credentials.
        Unauthorized { message: String } => "note API rejected credentials: {message}",
        /// The server refused the request (validation, conflict, or policy).
        Rejected { message: String } => "note API rejected the request: {message}",
    }
}

/// Port for authoritative note writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteApi: Send + Sync {
    /// Persist structured note content server-side.
    async fn save_note(&self, note_id: &NoteId, content: &Value) -> Result<(), NoteApiError>;

    /// Sign and lock a note. `fingerprint` is the SHA-256 digest of the
    /// clinician signature; the server stores both.
    async fn finalize_note(
        &self,
        note_id: &NoteId,
        signature: &str,
        fingerprint: &str,
    ) -> Result<(), NoteApiError>;

    /// Delete a note server-side.
    async fn delete_note(&self, note_id: &NoteId) -> Result<(), NoteApiError>;
}

/// Fixture implementation that accepts every call.
///
/// Use it in tests where server behaviour is not under test.
#[derive(Debug, Default)]
pub struct FixtureNoteApi;

#[async_trait]
impl NoteApi for FixtureNoteApi {
    async fn save_note(&self, _note_id: &NoteId, _content: &Value) -> Result<(), NoteApiError> {
        Ok(())
    }

    async fn finalize_note(
        &self,
        _note_id: &NoteId,
        _signature: &str,
        _fingerprint: &str,
    ) -> Result<(), NoteApiError> {
        Ok(())
    }

    async fn delete_note(&self, _note_id: &NoteId) -> Result<(), NoteApiError> {
        Ok(())
    }
}
