//! Port for reading the current session bearer token.
//!
//! Outbound HTTP adapters authenticate every call against the server, but
//! must not depend on the full session context. This narrow read-only port
//! is what they hold; [`crate::domain::session::SessionContext`] implements
//! it.

/// Source of the bearer token outbound calls should authenticate with.
pub trait BearerTokenSource: Send + Sync {
    /// The current token, or `None` when no session exists.
    ///
    /// Implementations must not fail: an unreadable token reads as absent
    /// and the server answers the unauthenticated call with 401.
    fn bearer_token(&self) -> Option<String>;
}
