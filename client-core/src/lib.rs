//! Fernwood client core.
//!
//! This crate implements the client-side core of the Fernwood mental-health
//! EHR: the encrypted local draft cache used while composing clinical notes,
//! the fire-and-forget audit emitter with its bounded retry queue, the
//! session context, the note supervision workflow, and the static RBAC
//! matrix. It is a library consumed by a UI shell; the authoritative note
//! state always lives on the server, and everything cached here is a
//! best-effort recovery aid.
//!
//! The crate follows a hexagonal layout: `domain` holds services and the
//! ports they depend on, `outbound` holds the storage and HTTP adapters that
//! implement those ports, and `crypto` wraps the symmetric cipher shared by
//! both.

pub mod config;
pub mod crypto;
pub mod domain;
pub mod outbound;

pub use config::CoreSettings;
pub use crypto::CipherEngine;
