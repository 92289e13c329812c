//! Release status transition graph

use crate::contract::{DistributionError, ReleaseStatus};

/// Statuses reachable from `from` in one step
pub fn allowed_transitions(from: ReleaseStatus) -> &'static [ReleaseStatus] {
    use ReleaseStatus::*;
    match from {
        Draft => &[Submitted],
        Submitted => &[InReview, Rejected],
        // in_review may be sent back to the artist for changes
        InReview => &[Approved, Rejected, Submitted],
        Approved => &[Completed, Rejected],
        Completed => &[Live],
        Live => &[],
        Rejected => &[Submitted],
    }
}

pub fn can_transition(from: ReleaseStatus, to: ReleaseStatus) -> bool {
    allowed_transitions(from).contains(&to)
}

/// Validate a status change, returning `InvalidTransition` when it is not in the graph
pub fn validate_status_transition(
    from: ReleaseStatus,
    to: ReleaseStatus,
) -> Result<(), DistributionError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(DistributionError::InvalidTransition { from, to })
    }
}

/// Statuses in which the release metadata is frozen and edits go through change requests
pub fn accepts_change_requests(status: ReleaseStatus) -> bool {
    matches!(
        status,
        ReleaseStatus::InReview | ReleaseStatus::Completed | ReleaseStatus::Live
    )
}

/// Statuses that warrant notifying the artist
pub fn notifies_artist(status: ReleaseStatus) -> bool {
    matches!(
        status,
        ReleaseStatus::Approved
            | ReleaseStatus::Rejected
            | ReleaseStatus::Completed
            | ReleaseStatus::Live
    )
}

/// User facing message for a newly entered status
pub fn status_message(status: ReleaseStatus) -> &'static str {
    match status {
        ReleaseStatus::Submitted => "Your release has been submitted for review.",
        ReleaseStatus::InReview => {
            "Your release is currently under review by our distribution team."
        }
        ReleaseStatus::Approved => {
            "Congratulations! Your release has been approved and will be distributed to platforms."
        }
        ReleaseStatus::Rejected => {
            "Your release needs some changes before it can be approved. Please check the notes and resubmit."
        }
        ReleaseStatus::Completed => {
            "Your release has been distributed to all platforms and will go live soon."
        }
        ReleaseStatus::Live => "Your release is now live on all streaming platforms!",
        ReleaseStatus::Draft => "Release status has been updated.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReleaseStatus::*;

    #[test]
    fn test_transition_table() {
        let allowed = [
            (Draft, Submitted),
            (Submitted, InReview),
            (Submitted, Rejected),
            (InReview, Approved),
            (InReview, Rejected),
            (InReview, Submitted),
            (Approved, Completed),
            (Approved, Rejected),
            (Completed, Live),
            (Rejected, Submitted),
        ];

        for from in ReleaseStatus::ALL {
            for to in ReleaseStatus::ALL {
                let expected = allowed.contains(&(from, to));
                assert_eq!(
                    can_transition(from, to),
                    expected,
                    "{from} -> {to} should be {}",
                    if expected { "allowed" } else { "rejected" }
                );
            }
        }
    }

    #[test]
    fn test_live_is_terminal() {
        assert!(allowed_transitions(Live).is_empty());
        assert_eq!(
            validate_status_transition(Live, Draft),
            Err(DistributionError::InvalidTransition { from: Live, to: Draft })
        );
    }

    #[test]
    fn test_self_transition_rejected() {
        assert!(validate_status_transition(Draft, Draft).is_err());
    }

    #[test]
    fn test_error_message_names_both_statuses() {
        let err = validate_status_transition(Draft, Live).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid status transition: Cannot transition from draft to live"
        );
    }

    #[test]
    fn test_change_request_window() {
        assert!(!accepts_change_requests(Draft));
        assert!(!accepts_change_requests(Submitted));
        assert!(accepts_change_requests(InReview));
        assert!(!accepts_change_requests(Approved));
        assert!(accepts_change_requests(Completed));
        assert!(accepts_change_requests(Live));
    }

    #[test]
    fn test_messages() {
        assert!(status_message(Approved).starts_with("Congratulations"));
        assert_eq!(status_message(Draft), "Release status has been updated.");
        assert!(notifies_artist(Live));
        assert!(!notifies_artist(InReview));
    }
}
