//! Bid decision (vote) model.

use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use tender_core::status::{BidDecision, DecisionKind};
use tender_core::types::{DbId, Timestamp};

use super::decode_text;

/// A row from the `decision_list` table. At most one per `(user_id, bid_id)`.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub id: DbId,
    pub bid_id: DbId,
    pub user_id: DbId,
    pub tender_id: DbId,
    pub decision: DecisionKind,
    pub created_at: Timestamp,
}

impl<'r> FromRow<'r, PgRow> for Decision {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            bid_id: row.try_get("bid_id")?,
            user_id: row.try_get("user_id")?,
            tender_id: row.try_get("tender_id")?,
            decision: decode_text(row, "decision")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Input for casting a vote.
#[derive(Debug, Clone)]
pub struct SubmitDecision {
    pub user_id: DbId,
    pub bid_id: DbId,
    pub tender_id: DbId,
    pub decision: DecisionKind,
}

/// A recorded vote together with the bid's decision after it was applied.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionReceipt {
    #[serde(flatten)]
    pub decision: Decision,
    pub bid_decision: BidDecision,
}
