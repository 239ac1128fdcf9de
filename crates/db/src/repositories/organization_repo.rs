//! Repository for the `organization` and `organization_responsible` tables.

use sqlx::PgPool;
use tender_core::types::DbId;

use crate::error::{RepoResult, StorageContext};
use crate::models::organization::{CreateOrganization, Organization, OrganizationResponsible};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, organization_type, created_at, updated_at";

const RESPONSIBLE_COLUMNS: &str = "id, organization_id, user_id, created_at";

/// Provides CRUD operations for organizations and their responsible members.
pub struct OrganizationRepo;

impl OrganizationRepo {
    /// Insert a new organization. `organization_type` defaults to `LLC`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateOrganization,
    ) -> RepoResult<Organization> {
        let query = format!(
            "INSERT INTO organization (name, description, organization_type)
             VALUES ($1, $2, COALESCE($3, 'LLC'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Organization>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.organization_type)
            .fetch_one(pool)
            .await
            .op("organization.create")
    }

    /// Find an organization by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> RepoResult<Option<Organization>> {
        let query = format!("SELECT {COLUMNS} FROM organization WHERE id = $1");
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .op("organization.find_by_id")
    }

    /// Register `user_id` as responsible for `organization_id`.
    pub async fn add_responsible(
        pool: &PgPool,
        organization_id: DbId,
        user_id: DbId,
    ) -> RepoResult<OrganizationResponsible> {
        let query = format!(
            "INSERT INTO organization_responsible (organization_id, user_id)
             VALUES ($1, $2)
             RETURNING {RESPONSIBLE_COLUMNS}"
        );
        sqlx::query_as::<_, OrganizationResponsible>(&query)
            .bind(organization_id)
            .bind(user_id)
            .fetch_one(pool)
            .await
            .op("organization.add_responsible")
    }

    /// Remove a responsibility. Returns `true` if a row was deleted.
    pub async fn remove_responsible(
        pool: &PgPool,
        organization_id: DbId,
        user_id: DbId,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            "DELETE FROM organization_responsible WHERE organization_id = $1 AND user_id = $2",
        )
        .bind(organization_id)
        .bind(user_id)
        .execute(pool)
        .await
        .op("organization.remove_responsible")?;
        Ok(result.rows_affected() > 0)
    }
}
