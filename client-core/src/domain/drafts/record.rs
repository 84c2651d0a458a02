//! Draft record and the versioned primary/recovery slot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validation errors for [`NoteId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoteIdValidationError {
    /// The identifier was empty or whitespace.
    #[error("note id must not be empty")]
    Empty,
}

/// Identifier of a clinical note.
///
/// Server-assigned and opaque to the client; drafts are keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Validate and wrap a note identifier.
    ///
    /// # Errors
    ///
    /// Returns [`NoteIdValidationError::Empty`] for empty or all-whitespace
    /// input.
    pub fn new(id: impl Into<String>) -> Result<Self, NoteIdValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(NoteIdValidationError::Empty);
        }
        Ok(Self(id))
    }

    /// The raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage key for the primary draft entry.
    #[must_use]
    pub fn draft_key(&self) -> String {
        format!("note_draft_{}", self.0)
    }

    /// Storage key for the recovery draft entry, written when the
    /// authoritative server save fails.
    #[must_use]
    pub fn recovery_key(&self) -> String {
        format!("note_draft_recovery_{}", self.0)
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Locally cached, not-yet-finalized structured content of a clinical note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    /// Note the draft belongs to.
    pub note_id: NoteId,
    /// Opaque structured note content as the form produced it.
    pub content: serde_json::Value,
    /// When this draft was captured, per the client clock.
    pub saved_at: DateTime<Utc>,
}

impl DraftRecord {
    /// Capture a draft of `content` at `saved_at`.
    #[must_use]
    pub fn new(note_id: NoteId, content: serde_json::Value, saved_at: DateTime<Utc>) -> Self {
        Self {
            note_id,
            content,
            saved_at,
        }
    }
}

/// The two cached drafts a note may have, read together.
///
/// `primary` is rewritten on every edit; `recovery` only exists when an
/// authoritative server save failed after the primary write. Reading the
/// slot makes the fallback order explicit: primary wins, recovery fills in,
/// an empty slot means the caller falls back to server-fetched content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftSlot {
    /// Draft under the primary key, if present and readable.
    pub primary: Option<DraftRecord>,
    /// Draft under the recovery key, if present and readable.
    pub recovery: Option<DraftRecord>,
}

impl DraftSlot {
    /// The draft recovery should present: primary first, then recovery.
    #[must_use]
    pub fn into_latest(self) -> Option<DraftRecord> {
        self.primary.or(self.recovery)
    }

    /// Whether neither entry is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.recovery.is_none()
    }
}
