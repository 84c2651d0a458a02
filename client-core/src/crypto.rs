//! Symmetric cipher wrapper shared by the secure store and API client.
//!
//! [`CipherEngine`] holds the single process-wide 256-bit key supplied by
//! configuration and exposes string/object encryption, one-way digests for
//! signature fingerprints, and a randomness source for request identifiers.
//! All operations are synchronous and stateless apart from the key.
//!
//! Ciphertexts are AES-256-GCM with a random 12-byte nonce prepended to the
//! sealed bytes, then base64-encoded for storage and transport. Cipher
//! failures collapse to generic encrypt/decrypt errors: callers must not
//! assume partial success or inspect failure detail.

use std::fmt;

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Errors raised by [`CipherEngine`].
///
/// Encrypt and decrypt failures are deliberately opaque; the underlying AEAD
/// error carries no information a caller should branch on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    /// Encryption (including serialization of object payloads) failed.
    #[error("failed to encrypt data")]
    Encrypt,
    /// Decryption (including parsing of object payloads) failed.
    #[error("failed to decrypt data")]
    Decrypt,
    /// The configured key was not 32 bytes of valid base64.
    #[error("cipher key must decode to {KEY_LEN} bytes: {message}")]
    InvalidKey {
        /// Description of the key problem.
        message: String,
    },
}

/// AES-256-GCM cipher over a fixed configuration-supplied key.
///
/// # Examples
/// ```
/// use client_core::crypto::CipherEngine;
///
/// # fn main() -> Result<(), client_core::crypto::CryptoError> {
/// let engine = CipherEngine::new([7u8; 32]);
/// let sealed = engine.encrypt("progress note body")?;
/// assert_eq!(engine.decrypt(&sealed)?, "progress note body");
/// # Ok(())
/// # }
/// ```
pub struct CipherEngine {
    key: Zeroizing<[u8; KEY_LEN]>,
}

impl fmt::Debug for CipherEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material must never reach logs.
        f.debug_struct("CipherEngine").finish_non_exhaustive()
    }
}

impl CipherEngine {
    /// Construct an engine from raw key bytes.
    #[must_use]
    pub fn new(key: [u8; KEY_LEN]) -> Self {
        Self {
            key: Zeroizing::new(key),
        }
    }

    /// Construct an engine from a base64-encoded key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] when the input is not valid
    /// base64 or does not decode to exactly 32 bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let raw = BASE64
            .decode(encoded.trim().as_bytes())
            .map_err(|err| CryptoError::InvalidKey {
                message: err.to_string(),
            })?;
        let key: [u8; KEY_LEN] = raw.try_into().map_err(|raw: Vec<u8>| CryptoError::InvalidKey {
            message: format!("decoded to {} bytes", raw.len()),
        })?;
        Ok(Self::new(key))
    }

    /// Encrypt a string, returning the base64 envelope `nonce || ciphertext`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Encrypt`] on any cipher failure.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let cipher =
            Aes256Gcm::new_from_slice(self.key.as_ref()).map_err(|_| CryptoError::Encrypt)?;
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);
        let sealed = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::Encrypt)?;

        let mut envelope = Vec::with_capacity(NONCE_LEN + sealed.len());
        envelope.extend_from_slice(&nonce_bytes);
        envelope.extend_from_slice(&sealed);
        Ok(BASE64.encode(envelope))
    }

    /// Decrypt a base64 envelope produced by [`CipherEngine::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Decrypt`] when the envelope is malformed, the
    /// ciphertext fails authentication, or the plaintext is not UTF-8.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, CryptoError> {
        let envelope = BASE64
            .decode(ciphertext.as_bytes())
            .map_err(|_| CryptoError::Decrypt)?;
        if envelope.len() <= NONCE_LEN {
            return Err(CryptoError::Decrypt);
        }
        let (nonce_bytes, sealed) = envelope.split_at(NONCE_LEN);
        let cipher =
            Aes256Gcm::new_from_slice(self.key.as_ref()).map_err(|_| CryptoError::Decrypt)?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), sealed)
            .map_err(|_| CryptoError::Decrypt)?;
        String::from_utf8(plaintext).map_err(|_| CryptoError::Decrypt)
    }

    /// Serialize a value to JSON and encrypt the result.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Encrypt`] when serialization or encryption
    /// fails.
    pub fn encrypt_object<T: Serialize>(&self, value: &T) -> Result<String, CryptoError> {
        let json = serde_json::to_string(value).map_err(|_| CryptoError::Encrypt)?;
        self.encrypt(&json)
    }

    /// Decrypt a base64 envelope and parse the plaintext as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Decrypt`] when decryption or parsing fails.
    pub fn decrypt_to_object<T: DeserializeOwned>(
        &self,
        ciphertext: &str,
    ) -> Result<T, CryptoError> {
        let json = self.decrypt(ciphertext)?;
        serde_json::from_str(&json).map_err(|_| CryptoError::Decrypt)
    }

    /// Deterministic SHA-256 hex digest of the input.
    ///
    /// Used to fingerprint clinician signatures before they are sent to the
    /// server; the digest carries no key material.
    #[must_use]
    pub fn hash(&self, input: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Random hex token of `bytes` random bytes (twice as many hex digits).
    ///
    /// Used for request identifiers on outbound API calls.
    #[must_use]
    pub fn generate_token(&self, bytes: usize) -> String {
        let mut raw = vec![0u8; bytes];
        OsRng.fill_bytes(&mut raw);
        hex::encode(raw)
    }
}

#[cfg(test)]
#[path = "crypto_tests.rs"]
mod tests;
