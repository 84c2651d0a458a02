//! Domain services, ports, and primitives.
//!
//! Purpose: hold everything that defines the client's behaviour without
//! touching platform storage or HTTP. Outbound adapters implement the
//! trait ports declared under [`ports`]; the services here stay testable
//! against in-memory and mock implementations.
//!
//! Public surface:
//! - `Error` / `ErrorCode` — the user-facing error payload every service
//!   returns.
//! - `SecureStore` — encrypt-at-rest wrapper over a key-value port.
//! - `DraftService` — two-key note draft lifecycle with audit emission.
//! - `AuditService` — fire-and-forget audit delivery with a bounded
//!   retry queue.
//! - `SessionContext` — bearer token and idle-timeout bookkeeping.
//! - `SecureApi` — audited HTTP client with optional payload sealing.
//! - `supervision` / `rbac` — note review workflow and the permission
//!   matrix.

pub mod audit;
pub mod drafts;
pub mod error;
pub mod ports;
pub mod rbac;
pub mod secure_api;
pub mod secure_store;
pub mod session;
pub mod supervision;

pub use self::audit::{AuditEvent, AuditService, ClientInfo, Severity};
pub use self::drafts::{DraftRecord, DraftService, DraftSlot, NoteId};
pub use self::error::{Error, ErrorCode};
pub use self::secure_api::{PayloadMode, SecureApi};
pub use self::secure_store::{SecureStore, SecureStoreError};
pub use self::session::SessionContext;

/// Convenient client result alias.
pub type ClientResult<T> = Result<T, Error>;
