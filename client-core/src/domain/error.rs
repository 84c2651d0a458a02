//! Domain-level error types.
//!
//! These errors are transport agnostic: the UI shell decides how to present
//! them (inline form feedback, redirect to login, generic failure banner).
//! Each carries a stable machine-readable code and a human-readable message
//! suitable for direct display.

use serde::{Deserialize, Serialize};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing; the session has been cleared.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The server never responded (connectivity or timeout).
    Network,
    /// The server responded with an unexpected failure.
    Internal,
}

/// Domain error carrying a code and a display-ready message.
///
/// # Examples
/// ```
/// use client_core::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("note 123 not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.to_string(), "note 123 not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
}

impl Error {
    /// Create an error with an explicit code.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Validation or malformed-request failure.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Missing or rejected credentials.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Permitted identity, forbidden action.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Absent resource.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// No server response.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Network, message)
    }

    /// Unexpected server-side failure.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message for direct display.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    //! Unit tests for error construction and serialization.

    use super::*;

    #[test]
    fn constructors_set_matching_codes() {
        assert_eq!(Error::invalid_request("m").code(), ErrorCode::InvalidRequest);
        assert_eq!(Error::unauthorized("m").code(), ErrorCode::Unauthorized);
        assert_eq!(Error::forbidden("m").code(), ErrorCode::Forbidden);
        assert_eq!(Error::not_found("m").code(), ErrorCode::NotFound);
        assert_eq!(Error::network("m").code(), ErrorCode::Network);
        assert_eq!(Error::internal("m").code(), ErrorCode::Internal);
    }

    #[test]
    fn display_is_the_bare_message() {
        let err = Error::network("Unable to reach the server");
        assert_eq!(err.to_string(), "Unable to reach the server");
    }

    #[test]
    fn serializes_with_snake_case_code() {
        let err = Error::forbidden("no access to claims");
        let json = serde_json::to_value(&err).expect("serializes");
        assert_eq!(json["code"], "forbidden");
        assert_eq!(json["message"], "no access to claims");
    }
}
