//! Bid review (feedback) model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tender_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `bid_review` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub bid_id: DbId,
    pub author_id: DbId,
    pub feedback: String,
    pub created_at: Timestamp,
}

/// DTO for appending a review to a bid.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReview {
    pub bid_id: DbId,
    pub author_id: DbId,
    #[validate(length(min = 1, max = 1000))]
    pub feedback: String,
}
