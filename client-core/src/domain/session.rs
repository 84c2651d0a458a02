//! Explicit session context with injected storage and clock.
//!
//! The production client kept its auth token and activity timestamps in
//! ambient browser storage touched from module scope. Here the same state
//! is an object with injected dependencies, so idle-timeout behaviour is
//! deterministic under test and nothing reaches for globals.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::warn;

use crate::domain::Error;
use crate::domain::ports::{BearerTokenSource, KeyValueStore};

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the last-activity timestamp (RFC 3339).
pub const LAST_ACTIVITY_KEY: &str = "last_activity";

fn storage_error(err: impl std::fmt::Display) -> Error {
    Error::internal(format!("session storage unavailable: {err}"))
}

/// Client session state: bearer token and idle tracking.
#[derive(Clone)]
pub struct SessionContext<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    idle_window: TimeDelta,
}

impl<S> SessionContext<S>
where
    S: KeyValueStore,
{
    /// Create a session context that treats the session as idle after
    /// `idle_timeout` without recorded activity.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, idle_timeout: Duration) -> Self {
        let idle_window = TimeDelta::from_std(idle_timeout).unwrap_or(TimeDelta::MAX);
        Self {
            store,
            clock,
            idle_window,
        }
    }

    /// The stored bearer token, if a session exists.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the backing store fails.
    pub fn token(&self) -> Result<Option<String>, Error> {
        self.store.get(TOKEN_KEY).map_err(storage_error)
    }

    /// Store a bearer token and mark the session active now.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the backing store fails.
    pub fn set_token(&self, token: &str) -> Result<(), Error> {
        self.store.put(TOKEN_KEY, token).map_err(storage_error)?;
        self.record_activity()
    }

    /// Drop the token and activity state, ending the session.
    ///
    /// Called on logout and whenever the server answers 401.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the backing store fails.
    pub fn clear(&self) -> Result<(), Error> {
        self.store.remove(TOKEN_KEY).map_err(storage_error)?;
        self.store.remove(LAST_ACTIVITY_KEY).map_err(storage_error)
    }

    /// Record user activity at the current clock time.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the backing store fails.
    pub fn record_activity(&self) -> Result<(), Error> {
        let now = self.clock.utc().to_rfc3339();
        self.store
            .put(LAST_ACTIVITY_KEY, &now)
            .map_err(storage_error)
    }

    /// When activity was last recorded, if known.
    ///
    /// An unparsable stored timestamp is erased and read as absent, the
    /// same policy the secure cache applies to unreadable entries.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the backing store fails.
    pub fn last_activity(&self) -> Result<Option<DateTime<Utc>>, Error> {
        let Some(raw) = self.store.get(LAST_ACTIVITY_KEY).map_err(storage_error)? else {
            return Ok(None);
        };
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(parsed) => Ok(Some(parsed.with_timezone(&Utc))),
            Err(err) => {
                warn!(error = %err, "erasing unparsable activity timestamp");
                self.store.remove(LAST_ACTIVITY_KEY).map_err(storage_error)?;
                Ok(None)
            }
        }
    }

    /// Whether the session has been idle beyond the configured window.
    ///
    /// A session with no recorded activity is not considered idle; there is
    /// nothing to time out.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the backing store fails.
    pub fn is_idle_expired(&self) -> Result<bool, Error> {
        let Some(last) = self.last_activity()? else {
            return Ok(false);
        };
        Ok(self.clock.utc() - last > self.idle_window)
    }
}

impl<S> BearerTokenSource for SessionContext<S>
where
    S: KeyValueStore,
{
    fn bearer_token(&self) -> Option<String> {
        match self.token() {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "failed to read session token for outbound call");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
