//! Tender model, its rollback snapshot, and request DTOs.

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use tender_core::status::EntityStatus;
use tender_core::types::{DbId, Timestamp, Version};
use validator::Validate;

use super::decode_text;

/// A row from the `tender` table.
#[derive(Debug, Clone, Serialize)]
pub struct Tender {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub service_type: String,
    pub status: EntityStatus,
    pub organization_id: DbId,
    pub creator_username: String,
    pub version: Version,
    pub created_at: Timestamp,
}

impl<'r> FromRow<'r, PgRow> for Tender {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            service_type: row.try_get("service_type")?,
            status: decode_text(row, "status")?,
            organization_id: row.try_get("organization_id")?,
            creator_username: row.try_get("creator_username")?,
            version: row.try_get("version")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// A row from the `tender_rollback` table: tender fields as they were
/// immediately before the edit that produced `version + 1`.
#[derive(Debug, Clone, Serialize)]
pub struct TenderSnapshot {
    pub id: DbId,
    pub tender_id: DbId,
    pub name: String,
    pub description: String,
    pub service_type: String,
    pub status: EntityStatus,
    pub version: Version,
    pub created_at: Timestamp,
}

impl<'r> FromRow<'r, PgRow> for TenderSnapshot {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            tender_id: row.try_get("tender_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            service_type: row.try_get("service_type")?,
            status: decode_text(row, "status")?,
            version: row.try_get("version")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl TenderSnapshot {
    /// The content fields replayed by a rollback. Status is not part of a
    /// rollback; it has its own transition endpoint.
    pub fn to_patch(&self) -> UpdateTender {
        UpdateTender {
            name: Some(self.name.clone()),
            description: Some(self.description.clone()),
            service_type: Some(self.service_type.clone()),
        }
    }
}

/// DTO for creating a new tender.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTender {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub service_type: String,
    pub organization_id: DbId,
    #[validate(length(min = 1, max = 50))]
    pub creator_username: String,
}

/// Sparse patch for a tender. `None` or blank fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTender {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub service_type: Option<String>,
}
