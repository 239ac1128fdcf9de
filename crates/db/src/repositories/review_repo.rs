//! Repository for the `bid_review` append log.

use sqlx::PgPool;
use tender_core::types::DbId;

use crate::error::{RepoResult, StorageContext};
use crate::models::review::{CreateReview, Review};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, bid_id, author_id, feedback, created_at";

pub struct ReviewRepo;

impl ReviewRepo {
    /// Append a review to a bid.
    pub async fn create(pool: &PgPool, input: &CreateReview) -> RepoResult<Review> {
        let query = format!(
            "INSERT INTO bid_review (bid_id, author_id, feedback)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(input.bid_id)
            .bind(input.author_id)
            .bind(&input.feedback)
            .fetch_one(pool)
            .await
            .op("review.create")
    }

    /// Reviews attached to any of `bid_ids`, newest first.
    pub async fn list_for_bids(
        pool: &PgPool,
        bid_ids: &[DbId],
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Review>> {
        if bid_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM bid_review
             WHERE bid_id = ANY($1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(bid_ids)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
            .op("review.list_for_bids")
    }
}
