//! Lifecycle enums for tenders, bids and decisions.
//!
//! Each enum is stored as TEXT in the database; the variant name is the
//! stored value (`"Created"`, `"Published"`, ...). The CHECK constraints in
//! the migrations must list exactly the values in `ALL`.

define_text_enum! {
    /// Publication status shared by tenders and bids.
    ///
    /// The two entities use the same domain but move through it independently.
    EntityStatus as "status" {
        Created,
        Published,
        Closed,
    }
}

define_text_enum! {
    /// Quorum outcome of a bid, tracked separately from its status.
    BidDecision as "bid decision" {
        Active,
        Approved,
        Rejected,
    }
}

define_text_enum! {
    /// A single vote cast on a bid.
    DecisionKind as "decision" {
        Approved,
        Rejected,
    }
}

impl EntityStatus {
    /// Only `Published` entities are visible without ownership.
    pub fn is_public(self) -> bool {
        self == EntityStatus::Published
    }
}

impl BidDecision {
    /// `Approved` and `Rejected` are final; no vote may move a bid out of them.
    pub fn is_terminal(self) -> bool {
        self != BidDecision::Active
    }
}

impl From<DecisionKind> for BidDecision {
    fn from(kind: DecisionKind) -> Self {
        match kind {
            DecisionKind::Approved => BidDecision::Approved,
            DecisionKind::Rejected => BidDecision::Rejected,
        }
    }
}
