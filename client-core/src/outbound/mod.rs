//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Adapters are thin translators between domain types and the storage or
//! HTTP surface they wrap. They contain no business logic:
//!
//! - **storage**: in-memory and JSON-file key-value stores.
//! - **http**: reqwest-backed API, note, and audit transports.

pub mod http;
pub mod storage;

pub use self::http::HttpApiTransport;
pub use self::storage::{InMemoryKeyValueStore, JsonFileKeyValueStore};
