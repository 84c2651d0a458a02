//! Static role-based access control matrix.
//!
//! A fixed role -> resource -> actions lookup with no dynamic policy
//! composition, caching, or delegation. The matrix is the single source of
//! truth for what the UI offers and what requests the client will attempt;
//! the server enforces its own copy regardless.

use serde::{Deserialize, Serialize};

/// Staff role within the practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Practice administrator.
    Admin,
    /// Licensed supervisor reviewing and approving notes.
    Supervisor,
    /// Treating clinician.
    Clinician,
    /// Pre-licensed clinician working under supervision.
    Intern,
    /// Billing staff.
    Biller,
    /// Reception and scheduling staff.
    FrontDesk,
}

/// Resource category guarded by the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Client demographic and chart records.
    Clients,
    /// Clinical notes.
    Notes,
    /// Calendar and appointments.
    Appointments,
    /// Billing claims.
    Claims,
    /// Secure messaging.
    Messages,
    /// CRM leads and waitlist.
    Leads,
    /// Dashboards and reports.
    Reports,
    /// Audit trail.
    Audit,
}

/// Action attempted against a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// View.
    Read,
    /// Create.
    Create,
    /// Modify.
    Update,
    /// Remove.
    Delete,
    /// Approve a submitted note.
    Approve,
    /// Sign and lock a note.
    Sign,
}

use Action::{Approve, Create, Delete, Read, Sign, Update};

const FULL: &[Action] = &[Read, Create, Update, Delete];
const READ_WRITE: &[Action] = &[Read, Create, Update];
const READ_ONLY: &[Action] = &[Read];
const NONE: &[Action] = &[];

/// Actions `role` may take on `resource`.
#[must_use]
pub const fn allowed_actions(role: Role, resource: Resource) -> &'static [Action] {
    match (role, resource) {
        (Role::Admin, Resource::Notes) => &[Read, Create, Update, Delete, Approve, Sign],
        (Role::Admin, _) => FULL,

        (Role::Supervisor, Resource::Notes) => &[Read, Create, Update, Approve, Sign],
        (Role::Supervisor, Resource::Clients | Resource::Appointments) => READ_WRITE,
        (Role::Supervisor, Resource::Messages) => READ_WRITE,
        (Role::Supervisor, Resource::Reports | Resource::Audit) => READ_ONLY,
        (Role::Supervisor, Resource::Claims | Resource::Leads) => READ_ONLY,

        (Role::Clinician, Resource::Notes) => &[Read, Create, Update, Sign],
        (Role::Clinician, Resource::Clients | Resource::Appointments | Resource::Messages) => {
            READ_WRITE
        }
        (Role::Clinician, Resource::Reports) => READ_ONLY,
        (Role::Clinician, Resource::Claims | Resource::Leads | Resource::Audit) => NONE,

        // Interns write notes but cannot sign them; their supervisor does.
        (Role::Intern, Resource::Notes) => READ_WRITE,
        (Role::Intern, Resource::Clients | Resource::Appointments | Resource::Messages) => {
            READ_WRITE
        }
        (Role::Intern, _) => NONE,

        (Role::Biller, Resource::Claims) => FULL,
        (Role::Biller, Resource::Clients | Resource::Reports) => READ_ONLY,
        (Role::Biller, Resource::Appointments) => READ_ONLY,
        (Role::Biller, _) => NONE,

        (Role::FrontDesk, Resource::Appointments) => FULL,
        (Role::FrontDesk, Resource::Clients | Resource::Leads) => READ_WRITE,
        (Role::FrontDesk, Resource::Messages) => READ_WRITE,
        (Role::FrontDesk, _) => NONE,
    }
}

/// Whether `role` may take `action` on `resource`.
#[must_use]
pub fn is_allowed(role: Role, resource: Resource, action: Action) -> bool {
    allowed_actions(role, resource).contains(&action)
}
