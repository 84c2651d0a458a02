//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod api_transport;
mod audit_sink;
mod audit_transport;
mod key_value_store;
mod note_api;
mod token_source;

#[cfg(test)]
pub use api_transport::MockApiTransport;
pub use api_transport::{ApiMethod, ApiRequest, ApiResponse, ApiTransport, ApiTransportError};
#[cfg(test)]
pub use audit_sink::MockAuditSink;
pub use audit_sink::{AuditSink, NoopAuditSink};
#[cfg(test)]
pub use audit_transport::MockAuditTransport;
pub use audit_transport::{AuditTransport, AuditTransportError, FixtureAuditTransport};
#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
pub use key_value_store::{KeyValueStore, KeyValueStoreError};
#[cfg(test)]
pub use note_api::MockNoteApi;
pub use note_api::{FixtureNoteApi, NoteApi, NoteApiError};
pub use token_source::BearerTokenSource;
