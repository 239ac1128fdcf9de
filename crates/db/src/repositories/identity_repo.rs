//! Identity resolution: usernames to user ids, users to organizations.
//!
//! Methods are generic over [`PgExecutor`] so the decision engine can call
//! them on the connection of its open transaction.

use sqlx::PgExecutor;
use tender_core::error::CoreError;
use tender_core::types::DbId;

use crate::error::{RepoResult, StorageContext};

/// Read-only lookups over `employee` and `organization_responsible`.
pub struct IdentityRepo;

impl IdentityRepo {
    /// Map a username to its user id. `NotFound` if no such employee.
    pub async fn resolve_user<'e, E>(executor: E, username: &str) -> RepoResult<DbId>
    where
        E: PgExecutor<'e>,
    {
        let row: Option<(DbId,)> = sqlx::query_as("SELECT id FROM employee WHERE username = $1")
            .bind(username)
            .fetch_optional(executor)
            .await
            .op("identity.resolve_user")?;
        row.map(|(id,)| id)
            .ok_or_else(|| CoreError::not_found("Employee", username).into())
    }

    /// The organization `user_id` is responsible for, if any.
    ///
    /// When a user is responsible for several organizations the earliest
    /// membership wins, so the answer is stable across calls.
    pub async fn find_organization<'e, E>(executor: E, user_id: DbId) -> RepoResult<Option<DbId>>
    where
        E: PgExecutor<'e>,
    {
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT organization_id FROM organization_responsible
             WHERE user_id = $1
             ORDER BY created_at ASC, id ASC
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .op("identity.find_organization")?;
        Ok(row.map(|(id,)| id))
    }

    /// Like [`find_organization`](Self::find_organization) but `NotFound`
    /// when the user is not responsible for any organization.
    pub async fn resolve_organization<'e, E>(executor: E, user_id: DbId) -> RepoResult<DbId>
    where
        E: PgExecutor<'e>,
    {
        Self::find_organization(executor, user_id)
            .await?
            .ok_or_else(|| CoreError::not_found("OrganizationResponsible", user_id).into())
    }

    /// Every organization `user_id` is responsible for.
    pub async fn organizations_of<'e, E>(executor: E, user_id: DbId) -> RepoResult<Vec<DbId>>
    where
        E: PgExecutor<'e>,
    {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT organization_id FROM organization_responsible
             WHERE user_id = $1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
        .op("identity.organizations_of")?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Whether `user_id` is responsible for `organization_id`.
    pub async fn is_responsible<'e, E>(
        executor: E,
        user_id: DbId,
        organization_id: DbId,
    ) -> RepoResult<bool>
    where
        E: PgExecutor<'e>,
    {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                SELECT 1 FROM organization_responsible
                WHERE user_id = $1 AND organization_id = $2
             )",
        )
        .bind(user_id)
        .bind(organization_id)
        .fetch_one(executor)
        .await
        .op("identity.is_responsible")?;
        Ok(exists)
    }

    /// Number of responsible members of `organization_id`.
    pub async fn count_responsible<'e, E>(executor: E, organization_id: DbId) -> RepoResult<i64>
    where
        E: PgExecutor<'e>,
    {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM organization_responsible WHERE organization_id = $1",
        )
        .bind(organization_id)
        .fetch_one(executor)
        .await
        .op("identity.count_responsible")?;
        Ok(count)
    }
}
