//! Encrypted local draft cache for clinical notes.
//!
//! The server owns note content; this module only preserves in-progress
//! work against crashes and lost connectivity. Each note has a primary
//! cache entry rewritten on every edit and a recovery entry written when
//! the authoritative server save fails. Finalizing or deleting the note
//! purges both. Entries that fail to decrypt are silently discarded.

mod record;
mod service;

pub use record::{DraftRecord, DraftSlot, NoteId, NoteIdValidationError};
pub use service::DraftService;
