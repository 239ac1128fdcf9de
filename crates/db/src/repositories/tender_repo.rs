//! Repository for the `tender` and `tender_rollback` tables.
//!
//! Edits and rollbacks run in one transaction: lock the row, write the
//! snapshot at the current version, apply the sparse patch, bump the
//! version. A rollback loads its snapshot inside the same transaction and
//! replays its content verbatim as the next version.

use sqlx::{PgConnection, PgExecutor, PgPool};
use tender_core::error::CoreError;
use tender_core::status::EntityStatus;
use tender_core::types::{DbId, Version};
use tender_core::versioning::{next_version, VersionChange};

use crate::error::{RepoResult, StorageContext};
use crate::models::tender::{CreateTender, Tender, TenderSnapshot, UpdateTender};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, service_type, status, organization_id, \
    creator_username, version, created_at";

/// Column list for tender_rollback queries.
const SNAPSHOT_COLUMNS: &str =
    "id, tender_id, name, description, service_type, status, version, created_at";

/// Provides the version store and status operations for tenders.
pub struct TenderRepo;

impl TenderRepo {
    /// Insert a new tender at version 1 with status `Created`.
    pub async fn create(pool: &PgPool, input: &CreateTender) -> RepoResult<Tender> {
        let query = format!(
            "INSERT INTO tender (name, description, service_type, organization_id, creator_username)
             VALUES ($1, COALESCE($2, ''), $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tender>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.service_type)
            .bind(input.organization_id)
            .bind(&input.creator_username)
            .fetch_one(pool)
            .await
            .op("tender.create")
    }

    /// Find a tender by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> RepoResult<Option<Tender>> {
        let query = format!("SELECT {COLUMNS} FROM tender WHERE id = $1");
        sqlx::query_as::<_, Tender>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .op("tender.find_by_id")
    }

    /// List `Published` tenders, optionally restricted to the given service
    /// types, ordered by name.
    pub async fn list_published(
        pool: &PgPool,
        service_types: &[String],
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Tender>> {
        let query = format!(
            "SELECT {COLUMNS} FROM tender
             WHERE status = $1
               AND (cardinality($2::text[]) = 0 OR service_type = ANY($2))
             ORDER BY name ASC, id ASC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Tender>(&query)
            .bind(EntityStatus::Published.as_str())
            .bind(service_types)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
            .op("tender.list_published")
    }

    /// List tenders created by `username`, in any status, ordered by name.
    pub async fn list_by_creator(
        pool: &PgPool,
        username: &str,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Tender>> {
        let query = format!(
            "SELECT {COLUMNS} FROM tender
             WHERE creator_username = $1
             ORDER BY name ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Tender>(&query)
            .bind(username)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
            .op("tender.list_by_creator")
    }

    /// The owning organization of a tender. `NotFound` if absent.
    pub async fn organization_of<'e, E>(executor: E, id: DbId) -> RepoResult<DbId>
    where
        E: PgExecutor<'e>,
    {
        let row: Option<(DbId,)> =
            sqlx::query_as("SELECT organization_id FROM tender WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await
                .op("tender.organization_of")?;
        row.map(|(org,)| org)
            .ok_or_else(|| CoreError::not_found("Tender", id).into())
    }

    /// Current status of a tender. `NotFound` if absent.
    pub async fn get_status(pool: &PgPool, id: DbId) -> RepoResult<EntityStatus> {
        let row: Option<(String,)> = sqlx::query_as("SELECT status FROM tender WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .op("tender.get_status")?;
        let (status,) = row.ok_or_else(|| CoreError::not_found("Tender", id))?;
        Ok(status.parse::<EntityStatus>()?)
    }

    /// Move a tender to `status`. Only its creator may do this. Status
    /// changes do not create a new version.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        username: &str,
        status: EntityStatus,
    ) -> RepoResult<Tender> {
        const OP: &str = "tender.set_status";
        let mut tx = pool.begin().await.op(OP)?;

        let current = Self::lock(&mut tx, id, OP).await?;
        ensure_creator(&current, username)?;

        let query = format!("UPDATE tender SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let tender = sqlx::query_as::<_, Tender>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(&mut *tx)
            .await
            .op(OP)?;

        tx.commit().await.op(OP)?;
        tracing::info!(tender_id = %id, from = %current.status, to = %status, "Tender status changed");
        Ok(tender)
    }

    /// Apply a sparse patch as a new version. Only the creator may edit.
    pub async fn edit(
        pool: &PgPool,
        id: DbId,
        username: &str,
        patch: &UpdateTender,
    ) -> RepoResult<Tender> {
        const OP: &str = "tender.edit";
        let mut tx = pool.begin().await.op(OP)?;
        let tender = Self::apply_edit(&mut tx, id, username, patch, VersionChange::Edit).await?;
        tx.commit().await.op(OP)?;
        Ok(tender)
    }

    /// Replay the content of `target_version` as a new version.
    ///
    /// The version counter keeps moving forward; the result is a new version
    /// whose content equals the snapshot taken at `target_version`.
    pub async fn rollback(
        pool: &PgPool,
        id: DbId,
        username: &str,
        target_version: Version,
    ) -> RepoResult<Tender> {
        const OP: &str = "tender.rollback";
        let mut tx = pool.begin().await.op(OP)?;

        let snapshot = Self::find_snapshot(&mut *tx, id, target_version)
            .await?
            .ok_or_else(|| CoreError::not_found("TenderVersion", format!("{id}/{target_version}")))?;

        let tender = Self::apply_edit(
            &mut tx,
            id,
            username,
            &snapshot.to_patch(),
            VersionChange::RollbackReplay { target_version },
        )
        .await?;

        tx.commit().await.op(OP)?;
        Ok(tender)
    }

    /// Snapshot taken at `version`, if one exists.
    pub async fn find_snapshot<'e, E>(
        executor: E,
        tender_id: DbId,
        version: Version,
    ) -> RepoResult<Option<TenderSnapshot>>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM tender_rollback WHERE tender_id = $1 AND version = $2"
        );
        sqlx::query_as::<_, TenderSnapshot>(&query)
            .bind(tender_id)
            .bind(version)
            .fetch_optional(executor)
            .await
            .op("tender.find_snapshot")
    }

    /// Full history of a tender, oldest first.
    pub async fn list_snapshots(pool: &PgPool, tender_id: DbId) -> RepoResult<Vec<TenderSnapshot>> {
        let query = format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM tender_rollback
             WHERE tender_id = $1
             ORDER BY version ASC"
        );
        sqlx::query_as::<_, TenderSnapshot>(&query)
            .bind(tender_id)
            .fetch_all(pool)
            .await
            .op("tender.list_snapshots")
    }

    /// Close a tender. A tender that is already closed stays closed.
    pub async fn close<'e, E>(executor: E, id: DbId) -> RepoResult<()>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query("UPDATE tender SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(EntityStatus::Closed.as_str())
            .execute(executor)
            .await
            .op("tender.close")?;
        Ok(())
    }

    // ── Version store internals ──────────────────────────────────────

    async fn lock(conn: &mut PgConnection, id: DbId, op: &'static str) -> RepoResult<Tender> {
        let query = format!("SELECT {COLUMNS} FROM tender WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Tender>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .op(op)?
            .ok_or_else(|| CoreError::not_found("Tender", id).into())
    }

    async fn apply_edit(
        conn: &mut PgConnection,
        id: DbId,
        username: &str,
        patch: &UpdateTender,
        change: VersionChange,
    ) -> RepoResult<Tender> {
        const OP: &str = "tender.apply_edit";

        let current = Self::lock(conn, id, OP).await?;
        ensure_creator(&current, username)?;

        sqlx::query(
            "INSERT INTO tender_rollback (tender_id, name, description, service_type, status, version)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(current.id)
        .bind(&current.name)
        .bind(&current.description)
        .bind(&current.service_type)
        .bind(current.status.as_str())
        .bind(current.version)
        .execute(&mut *conn)
        .await
        .op(OP)?;

        let version = next_version(current.version)?;
        let query = format!(
            "UPDATE tender SET name = $2, description = $3, service_type = $4, version = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let tender = sqlx::query_as::<_, Tender>(&query)
            .bind(id)
            .bind(change.resolve(&current.name, patch.name.as_deref()))
            .bind(change.resolve(&current.description, patch.description.as_deref()))
            .bind(change.resolve(&current.service_type, patch.service_type.as_deref()))
            .bind(version)
            .fetch_one(&mut *conn)
            .await
            .op(OP)?;

        tracing::info!(
            tender_id = %id,
            from_version = current.version,
            to_version = version,
            change = change.label(),
            "Tender version written"
        );
        Ok(tender)
    }
}

/// Tender edits are restricted to the stored creator, which is narrower
/// than organization membership.
fn ensure_creator(tender: &Tender, username: &str) -> Result<(), CoreError> {
    if tender.creator_username == username {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Only the creator of tender {} may modify it",
            tender.id
        )))
    }
}
