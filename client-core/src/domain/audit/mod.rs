//! Audit event emission.
//!
//! Audit logging is best-effort telemetry for HIPAA-style traceability:
//! every cache and network operation of consequence produces an
//! [`AuditEvent`], delivery happens through an injected transport, and
//! failures land in a bounded retry queue instead of propagating back into
//! clinical workflows.

mod event;
mod service;

pub use event::{AuditEvent, ClientInfo, Severity};
pub use service::{AuditService, FAILED_AUDIT_LOG_KEY, RetryOutcome};
