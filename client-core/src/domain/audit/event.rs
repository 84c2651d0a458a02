//! Audit event record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How serious the audited action is for compliance review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Routine activity.
    Info,
    /// Denied or degraded activity worth reviewing.
    Warning,
    /// Failures and security-relevant events needing attention.
    Critical,
}

/// Details about the client that emitted an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    /// Application version string.
    pub app_version: String,
    /// Host platform description.
    pub platform: String,
}

impl ClientInfo {
    /// Describe the emitting client.
    pub fn new(app_version: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            app_version: app_version.into(),
            platform: platform.into(),
        }
    }
}

/// One security- or compliance-relevant action, recorded for HIPAA-style
/// traceability.
///
/// Events are append-only from the client's perspective and carry a
/// client-generated identifier so the server can trace duplicates from
/// retried deliveries (the emitter itself never dedupes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    /// Client-generated event identifier.
    pub event_id: Uuid,
    /// Machine-readable action name, e.g. `NOTE_FINALIZED`.
    pub action: String,
    /// Human-readable description of what happened.
    pub description: String,
    /// Acting user, when a session exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Affected entity identifier, when one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// Affected entity type, e.g. `note`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    /// Compliance severity.
    pub severity: Severity,
    /// When the action happened, per the emitting client's clock.
    pub timestamp: DateTime<Utc>,
    /// Emitting client details.
    pub client_info: ClientInfo,
}

impl AuditEvent {
    /// Create an event with a fresh identifier and no subject references.
    pub fn new(
        action: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        timestamp: DateTime<Utc>,
        client_info: ClientInfo,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            action: action.into(),
            description: description.into(),
            user_id: None,
            entity_id: None,
            entity_type: None,
            severity,
            timestamp,
            client_info,
        }
    }

    /// Attach the acting user.
    #[must_use]
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Attach the affected entity.
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }
}
