//! Port abstraction for string-keyed client-persistent storage.
//!
//! [`KeyValueStore`] is the browser-storage analogue: synchronous,
//! tab-global, last-write-wins. The secure store, session context, and audit
//! queue all persist through it. Adapters live in
//! [`crate::outbound::storage`].

use super::define_port_error;

define_port_error! {
    /// Errors raised by key-value store adapters.
    pub enum KeyValueStoreError {
        /// The backing medium could not be read or written.
        Io { message: String } => "key-value store I/O failed: {message}",
        /// The backing document could not be serialized or parsed.
        Serialization { message: String } => "key-value store serialization failed: {message}",
    }
}

/// Port for client-persistent keyed storage.
///
/// Operations are synchronous to mirror the storage surface the client runs
/// against; there is no locking across concurrent writers, and the last
/// write observed wins.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError>;

    /// Write `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError>;

    /// Remove the entry under `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError>;
}
