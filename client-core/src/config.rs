//! Client core configuration loaded via OrthoConfig.
//!
//! Settings can come from the environment (prefix `FERNWOOD_`), a config
//! file, or CLI-style overrides; the host shell decides which sources to
//! wire up. Defaults match the behaviour of the production client: a fixed
//! 30-second request timeout, a 30-minute idle window, and a 100-entry cap
//! on the failed audit log queue.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::crypto::{CipherEngine, CryptoError};

const DEFAULT_API_BASE_URL: &str = "http://localhost:4000/api";

/// Configuration values for the Fernwood client core.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FERNWOOD")]
pub struct CoreSettings {
    /// Base URL of the Fernwood REST API.
    pub api_base_url: Option<String>,
    /// Base64-encoded 256-bit key for the local draft cache cipher.
    pub cipher_key: Option<String>,
    /// Outbound request timeout in seconds.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
    /// Idle window in minutes after which the session is treated as expired.
    #[ortho_config(default = 30)]
    pub idle_timeout_mins: u64,
    /// Maximum number of failed audit events retained for retry.
    #[ortho_config(default = 100)]
    pub audit_queue_capacity: usize,
}

impl CoreSettings {
    /// Return the configured API base URL, falling back to the default.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    /// Outbound request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Idle session window as a [`Duration`].
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_mins * 60)
    }

    /// Build the cipher engine from the configured key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] when the key is absent or does
    /// not decode to 32 bytes. There is no ephemeral-key fallback: running
    /// without a stable key would make every cached draft unrecoverable
    /// across restarts.
    pub fn cipher_engine(&self) -> Result<CipherEngine, CryptoError> {
        let encoded = self.cipher_key.as_deref().ok_or(CryptoError::InvalidKey {
            message: "FERNWOOD_CIPHER_KEY is not set".to_owned(),
        })?;
        CipherEngine::from_base64(encoded)
    }
}
