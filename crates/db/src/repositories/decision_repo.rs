//! Decision quorum engine over `decision_list`.
//!
//! All votes on one bid are serialized by locking the bid row for the
//! duration of the submitting transaction. Counting approvals, sizing the
//! quorum and writing the terminal state therefore happen atomically, and
//! votes on different bids never wait on each other.

use sqlx::{PgExecutor, PgPool};
use tender_core::error::CoreError;
use tender_core::quorum::{self, QuorumOutcome};
use tender_core::status::DecisionKind;
use tender_core::types::DbId;

use super::{BidRepo, IdentityRepo, TenderRepo};
use crate::error::{is_unique_violation, RepoError, RepoResult, StorageContext};
use crate::models::decision::{Decision, DecisionReceipt, SubmitDecision};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, bid_id, user_id, tender_id, decision, created_at";

/// One vote per `(user_id, bid_id)`.
const UNIQUE_VOTE: &str = "uq_decision_user_bid";

/// Records votes and applies the quorum policy.
pub struct DecisionRepo;

impl DecisionRepo {
    /// Record a vote and apply its effect on the bid and its tender.
    ///
    /// Fails with `NotFound` if the bid does not exist, `Validation` if
    /// `tender_id` is not the bid's tender, and `Conflict` if this user has
    /// already voted on the bid. A vote on a bid that already reached a
    /// terminal decision is stored but changes nothing.
    pub async fn submit(pool: &PgPool, input: &SubmitDecision) -> RepoResult<DecisionReceipt> {
        const OP: &str = "decision.submit";
        let mut tx = pool.begin().await.op(OP)?;

        let bid = BidRepo::lock(&mut tx, input.bid_id, OP).await?;
        if bid.tender_id != input.tender_id {
            return Err(CoreError::Validation(format!(
                "Bid {} does not belong to tender {}",
                bid.id, input.tender_id
            ))
            .into());
        }

        if Self::exists(&mut *tx, input.user_id, input.bid_id).await? {
            return Err(already_submitted().into());
        }

        let query = format!(
            "INSERT INTO decision_list (bid_id, user_id, tender_id, decision)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let decision = sqlx::query_as::<_, Decision>(&query)
            .bind(input.bid_id)
            .bind(input.user_id)
            .bind(bid.tender_id)
            .bind(input.decision.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| {
                if is_unique_violation(&err, UNIQUE_VOTE) {
                    RepoError::from(already_submitted())
                } else {
                    RepoError::Storage { op: OP, source: err }
                }
            })?;

        let outcome = match input.decision {
            DecisionKind::Approved if !bid.bid_decision.is_terminal() => {
                let approvals = Self::count(&mut *tx, input.bid_id, DecisionKind::Approved).await?;
                let organization_id =
                    IdentityRepo::resolve_organization(&mut *tx, input.user_id).await?;
                let org_size = IdentityRepo::count_responsible(&mut *tx, organization_id).await?;
                quorum::evaluate(bid.bid_decision, input.decision, approvals, org_size)
            }
            _ => quorum::evaluate(bid.bid_decision, input.decision, 0, 0),
        };

        let mut bid_decision = bid.bid_decision;
        if let Some(next) = outcome.transition() {
            if BidRepo::set_decision(&mut *tx, bid.id, next).await? {
                bid_decision = next;
            }
            if outcome == QuorumOutcome::Approve {
                TenderRepo::close(&mut *tx, bid.tender_id).await?;
            }
        }

        tx.commit().await.op(OP)?;

        tracing::info!(
            user_id = %input.user_id,
            bid_id = %input.bid_id,
            decision = %input.decision,
            outcome = ?outcome,
            "Decision submitted"
        );

        Ok(DecisionReceipt {
            decision,
            bid_decision,
        })
    }

    /// Whether `user_id` has already voted on `bid_id`.
    pub async fn exists<'e, E>(executor: E, user_id: DbId, bid_id: DbId) -> RepoResult<bool>
    where
        E: PgExecutor<'e>,
    {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM decision_list WHERE user_id = $1 AND bid_id = $2)",
        )
        .bind(user_id)
        .bind(bid_id)
        .fetch_one(executor)
        .await
        .op("decision.exists")?;
        Ok(exists)
    }

    /// Number of votes of kind `decision` on `bid_id`.
    pub async fn count<'e, E>(executor: E, bid_id: DbId, decision: DecisionKind) -> RepoResult<i64>
    where
        E: PgExecutor<'e>,
    {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM decision_list WHERE bid_id = $1 AND decision = $2")
                .bind(bid_id)
                .bind(decision.as_str())
                .fetch_one(executor)
                .await
                .op("decision.count")?;
        Ok(count)
    }

    /// All votes on a bid, oldest first.
    pub async fn list_for_bid(pool: &PgPool, bid_id: DbId) -> RepoResult<Vec<Decision>> {
        let query = format!(
            "SELECT {COLUMNS} FROM decision_list
             WHERE bid_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Decision>(&query)
            .bind(bid_id)
            .fetch_all(pool)
            .await
            .op("decision.list_for_bid")
    }
}

fn already_submitted() -> CoreError {
    CoreError::Conflict("Decision already submitted for this bid".into())
}
