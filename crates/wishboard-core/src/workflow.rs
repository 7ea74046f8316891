//! # Request Workflow
//!
//! The status state machine for feature requests.
//!
//! - Transitions are strictly forward: a request can never return to an
//!   earlier stage.
//! - `Rejected` and `Completed` are terminal; no transition leaves them.
//! - There is no rollback transition. When enrichment fails, the status
//!   simply remains at its current stage until an operator acts.

use crate::types::{Status, WishboardError};

// =============================================================================
// STAGE RANKING
// =============================================================================

/// Ordinal position of a status in the workflow.
///
/// `Approved` and `Rejected` share a rank: both are decisions made at
/// review, and neither can be reached from the other.
#[must_use]
pub const fn rank(status: Status) -> u8 {
    match status {
        Status::Submitted => 0,
        Status::Analyzing => 1,
        Status::Reviewed => 2,
        Status::Approved | Status::Rejected => 3,
        Status::InProgress => 4,
        Status::Completed => 5,
    }
}

/// Check whether a status admits no outgoing transitions.
#[must_use]
pub const fn is_terminal(status: Status) -> bool {
    matches!(status, Status::Rejected | Status::Completed)
}

// =============================================================================
// TRANSITIONS
// =============================================================================

/// Check whether `from -> to` is a legal workflow transition.
///
/// Legal means: `from` is not terminal and `to` is strictly further along
/// the workflow than `from`.
#[must_use]
pub const fn can_transition(from: Status, to: Status) -> bool {
    !is_terminal(from) && rank(to) > rank(from)
}

/// Validate a transition, returning `InvalidTransition` when illegal.
pub fn check_transition(from: Status, to: Status) -> Result<(), WishboardError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(WishboardError::InvalidTransition { from, to })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Status; 7] = [
        Status::Submitted,
        Status::Analyzing,
        Status::Reviewed,
        Status::Approved,
        Status::Rejected,
        Status::InProgress,
        Status::Completed,
    ];

    #[test]
    fn forward_transitions_allowed() {
        assert!(can_transition(Status::Submitted, Status::Analyzing));
        assert!(can_transition(Status::Analyzing, Status::Reviewed));
        assert!(can_transition(Status::Reviewed, Status::Approved));
        assert!(can_transition(Status::Reviewed, Status::Rejected));
        assert!(can_transition(Status::Approved, Status::InProgress));
        assert!(can_transition(Status::InProgress, Status::Completed));
    }

    #[test]
    fn skipping_stages_allowed() {
        // Forward jumps are legal; operators may fast-track requests.
        assert!(can_transition(Status::Submitted, Status::Completed));
        assert!(can_transition(Status::Analyzing, Status::Rejected));
    }

    #[test]
    fn backward_transitions_rejected() {
        assert!(!can_transition(Status::Reviewed, Status::Analyzing));
        assert!(!can_transition(Status::InProgress, Status::Reviewed));
        assert!(!can_transition(Status::Analyzing, Status::Submitted));
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for to in ALL {
            assert!(!can_transition(Status::Rejected, to));
            assert!(!can_transition(Status::Completed, to));
        }
    }

    #[test]
    fn approved_rejected_not_interchangeable() {
        assert!(!can_transition(Status::Approved, Status::Rejected));
        assert!(!can_transition(Status::Rejected, Status::Approved));
    }

    #[test]
    fn self_transitions_rejected() {
        for status in ALL {
            assert!(!can_transition(status, status));
        }
    }

    #[test]
    fn check_transition_reports_pair() {
        let err = check_transition(Status::Completed, Status::Submitted)
            .expect_err("terminal exit must fail");
        match err {
            WishboardError::InvalidTransition { from, to } => {
                assert_eq!(from, Status::Completed);
                assert_eq!(to, Status::Submitted);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
