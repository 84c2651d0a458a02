//! Encrypted keyed storage over an injected [`KeyValueStore`].
//!
//! [`SecureStore`] serializes (objects to JSON), encrypts, and writes; reads
//! decrypt and parse. A read that hits an entry it cannot decrypt or parse
//! **deletes that entry and returns `None`**: corrupted local state is
//! discarded, never surfaced as a blocking error. The cache is a
//! non-authoritative recovery aid, so losing an entry is always acceptable
//! and blocking the user on one never is.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::crypto::{CipherEngine, CryptoError};
use crate::domain::ports::{KeyValueStore, KeyValueStoreError};

/// Errors raised by [`SecureStore`].
///
/// Decrypt and parse failures on read never appear here; they are handled
/// by erasure. Only storage I/O and encrypt-side failures propagate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SecureStoreError {
    /// The underlying key-value store failed.
    #[error(transparent)]
    Storage(#[from] KeyValueStoreError),
    /// Encryption of the outgoing value failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Encrypting facade over a [`KeyValueStore`].
#[derive(Debug)]
pub struct SecureStore<S> {
    cipher: Arc<CipherEngine>,
    store: Arc<S>,
}

impl<S> Clone for SecureStore<S> {
    fn clone(&self) -> Self {
        Self {
            cipher: Arc::clone(&self.cipher),
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> SecureStore<S>
where
    S: KeyValueStore,
{
    /// Create a secure store over the given cipher and backing store.
    pub fn new(cipher: Arc<CipherEngine>, store: Arc<S>) -> Self {
        Self { cipher, store }
    }

    /// Encrypt and store a string value.
    ///
    /// # Errors
    ///
    /// Returns an error when encryption or the backing write fails.
    pub fn put_string(&self, key: &str, value: &str) -> Result<(), SecureStoreError> {
        let sealed = self.cipher.encrypt(value)?;
        self.store.put(key, &sealed)?;
        Ok(())
    }

    /// Serialize a value to JSON, encrypt it, and store it.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization, encryption, or the backing
    /// write fails.
    pub fn put_object<T: Serialize>(&self, key: &str, value: &T) -> Result<(), SecureStoreError> {
        let sealed = self.cipher.encrypt_object(value)?;
        self.store.put(key, &sealed)?;
        Ok(())
    }

    /// Retrieve and decrypt a string value.
    ///
    /// Returns `None` when the key was never written, and also when the
    /// stored entry fails to decrypt; in the latter case the entry is
    /// deleted first.
    ///
    /// # Errors
    ///
    /// Returns an error only when the backing store itself fails.
    pub fn get_string(&self, key: &str) -> Result<Option<String>, SecureStoreError> {
        let Some(sealed) = self.store.get(key)? else {
            return Ok(None);
        };
        match self.cipher.decrypt(&sealed) {
            Ok(value) => Ok(Some(value)),
            Err(_) => self.erase_corrupted(key).map(|()| None),
        }
    }

    /// Retrieve, decrypt, and parse a JSON value.
    ///
    /// Same erasure contract as [`SecureStore::get_string`]: an entry that
    /// decrypts but fails to parse is treated as corrupted and removed.
    ///
    /// # Errors
    ///
    /// Returns an error only when the backing store itself fails.
    pub fn get_object<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SecureStoreError> {
        let Some(sealed) = self.store.get(key)? else {
            return Ok(None);
        };
        match self.cipher.decrypt_to_object(&sealed) {
            Ok(value) => Ok(Some(value)),
            Err(_) => self.erase_corrupted(key).map(|()| None),
        }
    }

    /// Remove the entry under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store fails.
    pub fn remove(&self, key: &str) -> Result<(), SecureStoreError> {
        self.store.remove(key)?;
        Ok(())
    }

    /// Shared cipher, for callers that also fingerprint or tokenize.
    #[must_use]
    pub fn cipher(&self) -> &Arc<CipherEngine> {
        &self.cipher
    }

    fn erase_corrupted(&self, key: &str) -> Result<(), SecureStoreError> {
        warn!(key, "erasing unreadable secure cache entry");
        self.store.remove(key)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "secure_store_tests.rs"]
mod tests;
