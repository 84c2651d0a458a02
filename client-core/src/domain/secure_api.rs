//! Audited API client with optional payload encryption.
//!
//! [`SecureApi`] is the one path the client uses to talk to the server. It
//! attaches the session bearer token and a random request identifier,
//! optionally encrypts request bodies, unwraps the `{ "data": ... }`
//! response envelope, and maps every failure onto the domain error
//! taxonomy: 401 ends the session, 403 and server errors are audit-logged,
//! connectivity failures are audit-logged at critical severity. Messages on
//! returned errors are display-ready, preferring what the server said.

use std::sync::Arc;

use mockable::Clock;
use serde_json::Value;
use tracing::warn;

use crate::crypto::CipherEngine;
use crate::domain::Error;
use crate::domain::audit::{AuditEvent, ClientInfo, Severity};
use crate::domain::ports::{
    ApiMethod, ApiRequest, ApiResponse, ApiTransport, AuditSink, KeyValueStore,
};
use crate::domain::session::SessionContext;

const ACTION_ACCESS_DENIED: &str = "ACCESS_DENIED";
const ACTION_SERVER_ERROR: &str = "SERVER_ERROR";
const ACTION_NETWORK_FAILURE: &str = "NETWORK_FAILURE";
const ACTION_API_MUTATION: &str = "API_MUTATION";

const REQUEST_ID_BYTES: usize = 8;

const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";
const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action.";
const NOT_FOUND_MESSAGE: &str = "The requested record could not be found.";
const INVALID_MESSAGE: &str = "The request was invalid.";
const SERVER_ERROR_MESSAGE: &str = "Something went wrong on the server. Please try again.";
const NETWORK_MESSAGE: &str = "Unable to reach the server. Please check your connection.";

/// Whether a request body travels encrypted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadMode {
    /// Send the JSON body as-is.
    Plain,
    /// Encrypt the body and send `{ "encryptedPayload": "<envelope>" }`.
    Encrypted,
}

/// Audited, session-aware API client.
pub struct SecureApi<T, S, A> {
    transport: Arc<T>,
    session: SessionContext<S>,
    cipher: Arc<CipherEngine>,
    audit: Arc<A>,
    clock: Arc<dyn Clock>,
    client_info: ClientInfo,
}

impl<T, S, A> SecureApi<T, S, A>
where
    T: ApiTransport,
    S: KeyValueStore,
    A: AuditSink,
{
    /// Wire the client to its collaborators.
    pub fn new(
        transport: Arc<T>,
        session: SessionContext<S>,
        cipher: Arc<CipherEngine>,
        audit: Arc<A>,
        clock: Arc<dyn Clock>,
        client_info: ClientInfo,
    ) -> Self {
        Self {
            transport,
            session,
            cipher,
            audit,
            clock,
            client_info,
        }
    }

    /// Read a resource.
    ///
    /// # Errors
    ///
    /// Returns a mapped domain error; see [`SecureApi`].
    pub async fn get(&self, path: &str) -> Result<Value, Error> {
        self.call(ApiMethod::Get, path, None, PayloadMode::Plain).await
    }

    /// Create a resource.
    ///
    /// # Errors
    ///
    /// Returns a mapped domain error; see [`SecureApi`].
    pub async fn post(&self, path: &str, body: Value, mode: PayloadMode) -> Result<Value, Error> {
        self.call(ApiMethod::Post, path, Some(body), mode).await
    }

    /// Replace or update a resource.
    ///
    /// # Errors
    ///
    /// Returns a mapped domain error; see [`SecureApi`].
    pub async fn put(&self, path: &str, body: Value, mode: PayloadMode) -> Result<Value, Error> {
        self.call(ApiMethod::Put, path, Some(body), mode).await
    }

    /// Remove a resource.
    ///
    /// # Errors
    ///
    /// Returns a mapped domain error; see [`SecureApi`].
    pub async fn delete(&self, path: &str) -> Result<Value, Error> {
        self.call(ApiMethod::Delete, path, None, PayloadMode::Plain)
            .await
    }

    async fn call(
        &self,
        method: ApiMethod,
        path: &str,
        body: Option<Value>,
        mode: PayloadMode,
    ) -> Result<Value, Error> {
        let body = match (body, mode) {
            (Some(raw), PayloadMode::Encrypted) => Some(self.seal(&raw)?),
            (raw, PayloadMode::Plain | PayloadMode::Encrypted) => raw,
        };
        let request = ApiRequest {
            method,
            path: path.to_owned(),
            body,
            bearer_token: self.session.token()?,
            request_id: self.cipher.generate_token(REQUEST_ID_BYTES),
        };

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                self.emit(
                    ACTION_NETWORK_FAILURE,
                    format!("{method:?} {path} produced no response: {err}"),
                    Severity::Critical,
                )
                .await;
                return Err(Error::network(NETWORK_MESSAGE));
            }
        };

        self.interpret(method, path, response).await
    }

    async fn interpret(
        &self,
        method: ApiMethod,
        path: &str,
        response: ApiResponse,
    ) -> Result<Value, Error> {
        let server_message = response
            .body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let message_or = |fallback: &str| server_message.clone().unwrap_or_else(|| fallback.to_owned());

        match response.status {
            200..=299 => {
                if let Err(err) = self.session.record_activity() {
                    warn!(error = %err, "failed to record session activity");
                }
                if method.is_mutating() {
                    self.emit(
                        ACTION_API_MUTATION,
                        format!("{method:?} {path} succeeded"),
                        Severity::Info,
                    )
                    .await;
                }
                let data = response
                    .body
                    .get("data")
                    .cloned()
                    .unwrap_or(response.body);
                Ok(data)
            }
            401 => {
                if let Err(err) = self.session.clear() {
                    warn!(error = %err, "failed to clear session after 401");
                }
                Err(Error::unauthorized(message_or(SESSION_EXPIRED_MESSAGE)))
            }
            403 => {
                self.emit(
                    ACTION_ACCESS_DENIED,
                    format!("{method:?} {path} was denied"),
                    Severity::Warning,
                )
                .await;
                Err(Error::forbidden(message_or(FORBIDDEN_MESSAGE)))
            }
            404 => Err(Error::not_found(message_or(NOT_FOUND_MESSAGE))),
            400 | 422 => Err(Error::invalid_request(message_or(INVALID_MESSAGE))),
            status => {
                self.emit(
                    ACTION_SERVER_ERROR,
                    format!("{method:?} {path} returned status {status}"),
                    Severity::Critical,
                )
                .await;
                Err(Error::internal(message_or(SERVER_ERROR_MESSAGE)))
            }
        }
    }

    fn seal(&self, body: &Value) -> Result<Value, Error> {
        let envelope = self
            .cipher
            .encrypt_object(body)
            .map_err(|err| Error::internal(format!("failed to encrypt request payload: {err}")))?;
        Ok(serde_json::json!({ "encryptedPayload": envelope }))
    }

    async fn emit(&self, action: &str, description: String, severity: Severity) {
        let event = AuditEvent::new(
            action,
            description,
            severity,
            self.clock.utc(),
            self.client_info.clone(),
        );
        self.audit.record(event).await;
    }
}

#[cfg(test)]
#[path = "secure_api_tests.rs"]
mod tests;
