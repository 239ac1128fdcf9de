//! Bid model, its rollback snapshot, and request DTOs.

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use tender_core::author::{AuthorType, BidAuthor};
use tender_core::status::{BidDecision, EntityStatus};
use tender_core::types::{DbId, Timestamp, Version};
use validator::Validate;

use super::decode_text;

/// A row from the `bid` table.
#[derive(Debug, Clone, Serialize)]
pub struct Bid {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub status: EntityStatus,
    pub tender_id: DbId,
    #[serde(flatten)]
    pub author: BidAuthor,
    pub bid_decision: BidDecision,
    pub version: Version,
    pub created_at: Timestamp,
}

fn decode_author(row: &PgRow) -> Result<BidAuthor, sqlx::Error> {
    let author_type: AuthorType = decode_text(row, "author_type")?;
    Ok(BidAuthor::from_parts(author_type, row.try_get("author_id")?))
}

impl<'r> FromRow<'r, PgRow> for Bid {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            status: decode_text(row, "status")?,
            tender_id: row.try_get("tender_id")?,
            author: decode_author(row)?,
            bid_decision: decode_text(row, "bid_decision")?,
            version: row.try_get("version")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// A row from the `bid_rollback` table.
#[derive(Debug, Clone, Serialize)]
pub struct BidSnapshot {
    pub id: DbId,
    pub bid_id: DbId,
    pub name: String,
    pub description: String,
    pub status: EntityStatus,
    #[serde(flatten)]
    pub author: BidAuthor,
    pub version: Version,
    pub created_at: Timestamp,
}

impl<'r> FromRow<'r, PgRow> for BidSnapshot {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            bid_id: row.try_get("bid_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            status: decode_text(row, "status")?,
            author: decode_author(row)?,
            version: row.try_get("version")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl BidSnapshot {
    /// The content fields replayed by a rollback. Authorship never changes.
    pub fn to_patch(&self) -> UpdateBid {
        UpdateBid {
            name: Some(self.name.clone()),
            description: Some(self.description.clone()),
        }
    }
}

/// DTO for creating a new bid.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBid {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub tender_id: DbId,
    pub author_type: AuthorType,
    pub author_id: DbId,
}

impl CreateBid {
    pub fn author(&self) -> BidAuthor {
        BidAuthor::from_parts(self.author_type, self.author_id)
    }
}

/// Sparse patch for a bid. `None` or blank fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBid {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}
