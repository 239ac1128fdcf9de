//! Organization and responsible-member models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tender_core::types::{DbId, Timestamp};

/// A row from the `organization` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Organization {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// One of `IE`, `LLC`, `JSC`.
    pub organization_type: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new organization.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrganization {
    pub name: String,
    pub description: Option<String>,
    pub organization_type: Option<String>,
}

/// A row from the `organization_responsible` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrganizationResponsible {
    pub id: DbId,
    pub organization_id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
}
