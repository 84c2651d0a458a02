//! Port abstraction for raw REST round-trips.
//!
//! [`ApiTransport`] carries one prepared request to the server and returns
//! the raw status and body. Interpreting the status, unwrapping the response
//! envelope, and mapping failures onto the domain error taxonomy is the
//! job of [`crate::domain::secure_api::SecureApi`]; the transport stays
//! mechanical so it can be swapped for a mock in tests.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

define_port_error! {
    /// Errors raised by API transport adapters.
    pub enum ApiTransportError {
        /// The request never produced a server response.
        Network { message: String } => "API request failed: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } => "API request timed out: {message}",
    }
}

/// HTTP method subset the client uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    /// Read a resource.
    Get,
    /// Create a resource.
    Post,
    /// Replace or update a resource.
    Put,
    /// Remove a resource.
    Delete,
}

impl ApiMethod {
    /// Whether the method mutates server state.
    #[must_use]
    pub const fn is_mutating(self) -> bool {
        !matches!(self, Self::Get)
    }
}

/// A prepared request, ready for one transport round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: ApiMethod,
    /// Path relative to the API base URL, e.g. `/notes/123/finalize`.
    pub path: String,
    /// JSON body, if any. Already encrypted when the caller asked for it.
    pub body: Option<Value>,
    /// Bearer token attached as `Authorization`, when a session exists.
    pub bearer_token: Option<String>,
    /// Random per-request identifier for server-side correlation.
    pub request_id: String,
}

/// Raw response from one transport round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body; `Value::Null` when the body was empty.
    pub body: Value,
}

/// Port for raw REST round-trips.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Execute one request and return the raw response.
    ///
    /// Non-2xx statuses are returned as responses, not errors; only the
    /// absence of a response (connection failure, timeout) is an error.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiTransportError>;
}
