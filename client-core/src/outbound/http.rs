//! Reqwest-backed API adapters.
//!
//! [`HttpApiTransport`] owns transport details only: URL assembly, header
//! and timeout handling, JSON decoding, and the mapping from HTTP failures
//! onto the port error types. Status interpretation beyond that belongs to
//! the domain services.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, header};
use serde_json::Value;

use crate::config::CoreSettings;
use crate::domain::audit::AuditEvent;
use crate::domain::drafts::NoteId;
use crate::domain::ports::{
    ApiMethod, ApiRequest, ApiResponse, ApiTransport, ApiTransportError, AuditTransport,
    AuditTransportError, BearerTokenSource, NoteApi, NoteApiError,
};

/// Header carrying the per-request correlation identifier.
const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Reqwest adapter implementing the raw transport plus the note and audit
/// ports against one REST base URL.
///
/// Raw [`ApiTransport`] requests carry their own bearer token; the note and
/// audit ports authenticate with the attached [`BearerTokenSource`]. Every
/// server endpoint is token guarded, so production wiring must call
/// [`HttpApiTransport::with_token_source`].
#[derive(Clone)]
pub struct HttpApiTransport {
    client: Client,
    base_url: String,
    tokens: Option<Arc<dyn BearerTokenSource>>,
}

impl fmt::Debug for HttpApiTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpApiTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpApiTransport {
    /// Build an adapter with an explicit base URL and request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self {
            client,
            base_url,
            tokens: None,
        })
    }

    /// Authenticate note and audit calls with tokens read from `tokens`.
    #[must_use]
    pub fn with_token_source(mut self, tokens: Arc<dyn BearerTokenSource>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Build an adapter from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn from_settings(settings: &CoreSettings) -> Result<Self, reqwest::Error> {
        Self::new(settings.api_base_url(), settings.request_timeout())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn session_token(&self) -> Option<String> {
        self.tokens.as_ref().and_then(|tokens| tokens.bearer_token())
    }

    async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        bearer_token: Option<&str>,
        request_id: Option<&str>,
    ) -> Result<(StatusCode, Value), reqwest::Error> {
        let mut builder = self
            .client
            .request(method, self.url(path))
            .header(header::ACCEPT, "application/json");
        if let Some(token) = bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(id) = request_id {
            builder = builder.header(REQUEST_ID_HEADER, id);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(bytes.as_ref()).unwrap_or(Value::Null)
        };
        Ok((status, body))
    }
}

impl From<ApiMethod> for Method {
    fn from(method: ApiMethod) -> Self {
        match method {
            ApiMethod::Get => Self::GET,
            ApiMethod::Post => Self::POST,
            ApiMethod::Put => Self::PUT,
            ApiMethod::Delete => Self::DELETE,
        }
    }
}

#[async_trait]
impl ApiTransport for HttpApiTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiTransportError> {
        let (status, body) = self
            .send_json(
                request.method.into(),
                &request.path,
                request.body.as_ref(),
                request.bearer_token.as_deref(),
                Some(&request.request_id),
            )
            .await
            .map_err(map_transport_error)?;
        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl NoteApi for HttpApiTransport {
    async fn save_note(&self, note_id: &NoteId, content: &Value) -> Result<(), NoteApiError> {
        let path = format!("/notes/{}", note_id.as_str());
        let token = self.session_token();
        let (status, body) = self
            .send_json(Method::PUT, &path, Some(content), token.as_deref(), None)
            .await
            .map_err(|error| NoteApiError::network(error.to_string()))?;
        interpret_note_status(status, &body)
    }

    async fn finalize_note(
        &self,
        note_id: &NoteId,
        signature: &str,
        fingerprint: &str,
    ) -> Result<(), NoteApiError> {
        let path = format!("/notes/{}/finalize", note_id.as_str());
        let payload = serde_json::json!({
            "signature": signature,
            "signatureFingerprint": fingerprint,
        });
        let token = self.session_token();
        let (status, body) = self
            .send_json(Method::POST, &path, Some(&payload), token.as_deref(), None)
            .await
            .map_err(|error| NoteApiError::network(error.to_string()))?;
        interpret_note_status(status, &body)
    }

    async fn delete_note(&self, note_id: &NoteId) -> Result<(), NoteApiError> {
        let path = format!("/notes/{}", note_id.as_str());
        let token = self.session_token();
        let (status, body) = self
            .send_json(Method::DELETE, &path, None, token.as_deref(), None)
            .await
            .map_err(|error| NoteApiError::network(error.to_string()))?;
        interpret_note_status(status, &body)
    }
}

#[async_trait]
impl AuditTransport for HttpApiTransport {
    async fn deliver(&self, event: &AuditEvent) -> Result<(), AuditTransportError> {
        let payload = serde_json::to_value(event)
            .map_err(|error| AuditTransportError::rejected(error.to_string()))?;
        let token = self.session_token();
        let (status, body) = self
            .send_json(
                Method::POST,
                "/audit-logs",
                Some(&payload),
                token.as_deref(),
                None,
            )
            .await
            .map_err(|error| AuditTransportError::network(error.to_string()))?;
        if status.is_success() {
            Ok(())
        } else {
            Err(AuditTransportError::rejected(status_message(status, body)))
        }
    }
}

fn map_transport_error(error: reqwest::Error) -> ApiTransportError {
    if error.is_timeout() {
        ApiTransportError::timeout(error.to_string())
    } else {
        ApiTransportError::network(error.to_string())
    }
}

fn interpret_note_status(status: StatusCode, body: &Value) -> Result<(), NoteApiError> {
    if status.is_success() {
        return Ok(());
    }
    let message = status_message(status, body.clone());
    if status == StatusCode::UNAUTHORIZED {
        Err(NoteApiError::unauthorized(message))
    } else {
        Err(NoteApiError::rejected(message))
    }
}

fn status_message(status: StatusCode, body: Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .map_or_else(|| format!("status {}", status.as_u16()), str::to_owned)
}
