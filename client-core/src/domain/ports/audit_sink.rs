//! Driving port for components that emit audit events.
//!
//! Services that need to audit (draft lifecycle, API client) depend on this
//! narrow sink rather than on the full audit service. Recording never fails:
//! the implementation is responsible for queueing undeliverable events.

use async_trait::async_trait;

use crate::domain::audit::AuditEvent;

/// Port for fire-and-forget audit emission.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Record one event. Infallible from the caller's perspective.
    async fn record(&self, event: AuditEvent);
}

/// Sink that discards every event.
///
/// Use it in tests where audit emission is not under test.
#[derive(Debug, Default)]
pub struct NoopAuditSink;

#[async_trait]
impl AuditSink for NoopAuditSink {
    async fn record(&self, _event: AuditEvent) {}
}
