//! Port abstraction for delivering audit events to the server.

use async_trait::async_trait;

use crate::domain::audit::AuditEvent;

use super::define_port_error;

define_port_error! {
    /// Errors raised by audit transport adapters.
    pub enum AuditTransportError {
        /// The request never produced a server response.
        Network { message: String } => "audit delivery failed: {message}",
        /// The server refused the event.
        Rejected { message: String } => "audit event rejected: {message}",
    }
}

/// Port for best-effort audit event delivery.
///
/// Delivery failures are expected and recoverable; the audit service queues
/// the event and retries later rather than surfacing the error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditTransport: Send + Sync {
    /// Attempt to deliver one event.
    async fn deliver(&self, event: &AuditEvent) -> Result<(), AuditTransportError>;
}

/// Fixture transport that accepts every event.
#[derive(Debug, Default)]
pub struct FixtureAuditTransport;

#[async_trait]
impl AuditTransport for FixtureAuditTransport {
    async fn deliver(&self, _event: &AuditEvent) -> Result<(), AuditTransportError> {
        Ok(())
    }
}
