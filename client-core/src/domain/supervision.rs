//! Note supervision workflow.
//!
//! Clinical notes written by supervised clinicians travel through review
//! before they can be signed: `Draft -> Submitted -> (Approved | Rejected)`,
//! with rejected notes revised and resubmitted and approved notes signed.
//! A signed note is immutable. The production client expressed this as
//! string fields compared in conditionals; here the transitions are
//! validated explicitly so an illegal move is a typed error instead of a
//! silent state overwrite.

use serde::{Deserialize, Serialize};

/// Review state of a clinical note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupervisionStatus {
    /// Being written; not yet visible to the supervisor.
    Draft,
    /// Submitted for supervisor review.
    Submitted,
    /// Approved by the supervisor; ready to sign.
    Approved,
    /// Returned for revision.
    Rejected,
    /// Signed and locked. Terminal.
    Signed,
}

/// Error raised for a transition the workflow does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot move note from {from:?} to {to:?}")]
pub struct InvalidTransition {
    /// State the note is in.
    pub from: SupervisionStatus,
    /// State the caller requested.
    pub to: SupervisionStatus,
}

impl SupervisionStatus {
    /// Whether a move from `self` to `to` is allowed.
    #[must_use]
    pub const fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Draft, Self::Submitted)
                | (Self::Submitted, Self::Approved)
                | (Self::Submitted, Self::Rejected)
                | (Self::Rejected, Self::Submitted)
                | (Self::Approved, Self::Signed)
        )
    }

    /// Validate and apply a transition.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] when the workflow does not allow the
    /// move, including any move out of [`SupervisionStatus::Signed`].
    pub fn transition(self, to: Self) -> Result<Self, InvalidTransition> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(InvalidTransition { from: self, to })
        }
    }

    /// Whether the note can no longer change state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Signed)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for workflow transitions.

    use rstest::rstest;

    use super::SupervisionStatus::{Approved, Draft, Rejected, Signed, Submitted};
    use super::*;

    #[rstest]
    #[case(Draft, Submitted)]
    #[case(Submitted, Approved)]
    #[case(Submitted, Rejected)]
    #[case(Rejected, Submitted)]
    #[case(Approved, Signed)]
    fn allowed_transitions_apply(
        #[case] from: SupervisionStatus,
        #[case] to: SupervisionStatus,
    ) {
        assert_eq!(from.transition(to), Ok(to));
    }

    #[rstest]
    #[case(Draft, Approved)]
    #[case(Draft, Signed)]
    #[case(Submitted, Signed)]
    #[case(Rejected, Approved)]
    #[case(Approved, Rejected)]
    #[case(Signed, Draft)]
    #[case(Signed, Submitted)]
    fn disallowed_transitions_are_rejected(
        #[case] from: SupervisionStatus,
        #[case] to: SupervisionStatus,
    ) {
        assert_eq!(from.transition(to), Err(InvalidTransition { from, to }));
    }

    #[rstest]
    fn signed_is_the_only_terminal_state() {
        assert!(Signed.is_terminal());
        for state in [Draft, Submitted, Approved, Rejected] {
            assert!(!state.is_terminal());
        }
    }

    #[rstest]
    fn serializes_to_the_wire_strings() {
        let json = serde_json::to_string(&Submitted).expect("serializes");
        assert_eq!(json, "\"SUBMITTED\"");
        let back: SupervisionStatus =
            serde_json::from_str("\"REJECTED\"").expect("parses");
        assert_eq!(back, Rejected);
    }
}
