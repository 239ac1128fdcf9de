//! Quorum policy for bid decisions.
//!
//! A single rejection is final. Approval needs `min(3, org_size)` approving
//! votes, where `org_size` is the number of responsible members of the
//! voting user's organization at the time of the vote.

use crate::status::{BidDecision, DecisionKind};

/// Upper bound on the number of approvals a bid ever needs.
pub const MAX_QUORUM: i64 = 3;

/// Number of approving votes required for an organization of `org_size`.
///
/// Small organizations need every member; larger ones need [`MAX_QUORUM`].
/// Never below one.
pub fn quorum_threshold(org_size: i64) -> i64 {
    org_size.min(MAX_QUORUM).max(1)
}

/// What a recorded vote does to the bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuorumOutcome {
    /// Not enough approvals yet; the bid stays `Active`.
    Pending { approvals: i64, threshold: i64 },
    /// Quorum reached: bid becomes `Approved` and its tender `Closed`.
    Approve,
    /// Unilateral rejection: bid becomes `Rejected`.
    Reject,
    /// The bid was already terminal; the vote is recorded but changes nothing.
    Inert(BidDecision),
}

impl QuorumOutcome {
    /// The bid decision to persist, if any.
    pub fn transition(self) -> Option<BidDecision> {
        match self {
            QuorumOutcome::Approve => Some(BidDecision::Approved),
            QuorumOutcome::Reject => Some(BidDecision::Rejected),
            QuorumOutcome::Pending { .. } | QuorumOutcome::Inert(_) => None,
        }
    }
}

/// Decide the effect of a vote that has just been recorded.
///
/// `approvals` counts approving votes on the bid including this one.
pub fn evaluate(
    current: BidDecision,
    vote: DecisionKind,
    approvals: i64,
    org_size: i64,
) -> QuorumOutcome {
    if current.is_terminal() {
        return QuorumOutcome::Inert(current);
    }
    match vote {
        DecisionKind::Rejected => QuorumOutcome::Reject,
        DecisionKind::Approved => {
            let threshold = quorum_threshold(org_size);
            if approvals >= threshold {
                QuorumOutcome::Approve
            } else {
                QuorumOutcome::Pending {
                    approvals,
                    threshold,
                }
            }
        }
    }
}
