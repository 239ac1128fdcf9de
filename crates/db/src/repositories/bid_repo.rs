//! Repository for the `bid` and `bid_rollback` tables.
//!
//! Mirrors the tender version store: every edit writes a snapshot at the
//! current version and bumps the counter inside one transaction. Unlike
//! tenders there is no creator check here; callers authorize bid edits
//! through [`AccessRepo`](super::AccessRepo).

use sqlx::{PgConnection, PgExecutor, PgPool};
use tender_core::author::{AuthorType, BidAuthor};
use tender_core::error::CoreError;
use tender_core::status::{BidDecision, EntityStatus};
use tender_core::types::{DbId, Version};
use tender_core::versioning::{next_version, VersionChange};

use crate::error::{RepoResult, StorageContext};
use crate::models::bid::{Bid, BidSnapshot, CreateBid, UpdateBid};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, status, tender_id, author_type, author_id, \
    bid_decision, version, created_at";

/// Column list for bid_rollback queries.
const SNAPSHOT_COLUMNS: &str =
    "id, bid_id, name, description, status, author_type, author_id, version, created_at";

/// Provides the version store and status operations for bids.
pub struct BidRepo;

impl BidRepo {
    /// Insert a new bid at version 1, status `Created`, decision `Active`.
    pub async fn create(pool: &PgPool, input: &CreateBid) -> RepoResult<Bid> {
        let author = input.author();
        let query = format!(
            "INSERT INTO bid (name, description, tender_id, author_type, author_id)
             VALUES ($1, COALESCE($2, ''), $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Bid>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.tender_id)
            .bind(author.author_type().as_str())
            .bind(author.author_id())
            .fetch_one(pool)
            .await
            .op("bid.create")
    }

    /// Find a bid by its ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> RepoResult<Option<Bid>>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM bid WHERE id = $1");
        sqlx::query_as::<_, Bid>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
            .op("bid.find_by_id")
    }

    /// Like [`find_by_id`](Self::find_by_id) but `NotFound` when absent.
    pub async fn get<'e, E>(executor: E, id: DbId) -> RepoResult<Bid>
    where
        E: PgExecutor<'e>,
    {
        Self::find_by_id(executor, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Bid", id).into())
    }

    /// Bids written by `user_id` personally or by `organization_id`, if given.
    pub async fn list_by_author(
        pool: &PgPool,
        user_id: DbId,
        organization_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Bid>> {
        let query = format!(
            "SELECT {COLUMNS} FROM bid
             WHERE (author_type = $1 AND author_id = $2)
                OR ($3::uuid IS NOT NULL AND author_type = $4 AND author_id = $3)
             ORDER BY name ASC, id ASC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Bid>(&query)
            .bind(AuthorType::User.as_str())
            .bind(user_id)
            .bind(organization_id)
            .bind(AuthorType::Organization.as_str())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
            .op("bid.list_by_author")
    }

    /// `Published` bids submitted against a tender, ordered by name.
    pub async fn list_published_for_tender(
        pool: &PgPool,
        tender_id: DbId,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Bid>> {
        let query = format!(
            "SELECT {COLUMNS} FROM bid
             WHERE tender_id = $1 AND status = $2
             ORDER BY name ASC, id ASC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Bid>(&query)
            .bind(tender_id)
            .bind(EntityStatus::Published.as_str())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
            .op("bid.list_published_for_tender")
    }

    /// IDs of every bid on `tender_id` written by `author`.
    pub async fn ids_for_tender_by_author(
        pool: &PgPool,
        tender_id: DbId,
        author: BidAuthor,
    ) -> RepoResult<Vec<DbId>> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT id FROM bid
             WHERE tender_id = $1 AND author_type = $2 AND author_id = $3",
        )
        .bind(tender_id)
        .bind(author.author_type().as_str())
        .bind(author.author_id())
        .fetch_all(pool)
        .await
        .op("bid.ids_for_tender_by_author")?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Current status of a bid. `NotFound` if absent.
    pub async fn get_status(pool: &PgPool, id: DbId) -> RepoResult<EntityStatus> {
        Ok(Self::get(pool, id).await?.status)
    }

    /// Move a bid to `status`. Status changes do not create a new version.
    pub async fn set_status(pool: &PgPool, id: DbId, status: EntityStatus) -> RepoResult<Bid> {
        let query = format!("UPDATE bid SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let bid = sqlx::query_as::<_, Bid>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
            .op("bid.set_status")?
            .ok_or_else(|| CoreError::not_found("Bid", id))?;
        tracing::info!(bid_id = %id, status = %status, "Bid status changed");
        Ok(bid)
    }

    /// Set the quorum outcome of a bid, but only while it is still `Active`.
    ///
    /// Returns `false` when the bid had already reached a terminal decision,
    /// in which case nothing is written.
    pub async fn set_decision<'e, E>(executor: E, id: DbId, decision: BidDecision) -> RepoResult<bool>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("UPDATE bid SET bid_decision = $2 WHERE id = $1 AND bid_decision = $3")
            .bind(id)
            .bind(decision.as_str())
            .bind(BidDecision::Active.as_str())
            .execute(executor)
            .await
            .op("bid.set_decision")?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a sparse patch as a new version.
    pub async fn edit(pool: &PgPool, id: DbId, patch: &UpdateBid) -> RepoResult<Bid> {
        const OP: &str = "bid.edit";
        let mut tx = pool.begin().await.op(OP)?;
        let bid = Self::apply_edit(&mut tx, id, patch, VersionChange::Edit).await?;
        tx.commit().await.op(OP)?;
        Ok(bid)
    }

    /// Replay the content of `target_version` as a new version. The version
    /// counter is never rewound.
    pub async fn rollback(pool: &PgPool, id: DbId, target_version: Version) -> RepoResult<Bid> {
        const OP: &str = "bid.rollback";
        let mut tx = pool.begin().await.op(OP)?;

        let snapshot = Self::find_snapshot(&mut *tx, id, target_version)
            .await?
            .ok_or_else(|| CoreError::not_found("BidVersion", format!("{id}/{target_version}")))?;

        let bid = Self::apply_edit(
            &mut tx,
            id,
            &snapshot.to_patch(),
            VersionChange::RollbackReplay { target_version },
        )
        .await?;

        tx.commit().await.op(OP)?;
        Ok(bid)
    }

    /// Snapshot taken at `version`, if one exists.
    pub async fn find_snapshot<'e, E>(
        executor: E,
        bid_id: DbId,
        version: Version,
    ) -> RepoResult<Option<BidSnapshot>>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM bid_rollback WHERE bid_id = $1 AND version = $2"
        );
        sqlx::query_as::<_, BidSnapshot>(&query)
            .bind(bid_id)
            .bind(version)
            .fetch_optional(executor)
            .await
            .op("bid.find_snapshot")
    }

    /// Full history of a bid, oldest first.
    pub async fn list_snapshots(pool: &PgPool, bid_id: DbId) -> RepoResult<Vec<BidSnapshot>> {
        let query = format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM bid_rollback
             WHERE bid_id = $1
             ORDER BY version ASC"
        );
        sqlx::query_as::<_, BidSnapshot>(&query)
            .bind(bid_id)
            .fetch_all(pool)
            .await
            .op("bid.list_snapshots")
    }

    /// Lock a bid row for the rest of the transaction. `NotFound` if absent.
    pub async fn lock(conn: &mut PgConnection, id: DbId, op: &'static str) -> RepoResult<Bid> {
        let query = format!("SELECT {COLUMNS} FROM bid WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Bid>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .op(op)?
            .ok_or_else(|| CoreError::not_found("Bid", id).into())
    }

    async fn apply_edit(
        conn: &mut PgConnection,
        id: DbId,
        patch: &UpdateBid,
        change: VersionChange,
    ) -> RepoResult<Bid> {
        const OP: &str = "bid.apply_edit";

        let current = Self::lock(conn, id, OP).await?;

        sqlx::query(
            "INSERT INTO bid_rollback (bid_id, name, description, status, author_type, author_id, version)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(current.id)
        .bind(&current.name)
        .bind(&current.description)
        .bind(current.status.as_str())
        .bind(current.author.author_type().as_str())
        .bind(current.author.author_id())
        .bind(current.version)
        .execute(&mut *conn)
        .await
        .op(OP)?;

        let version = next_version(current.version)?;
        let query = format!(
            "UPDATE bid SET name = $2, description = $3, version = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let bid = sqlx::query_as::<_, Bid>(&query)
            .bind(id)
            .bind(change.resolve(&current.name, patch.name.as_deref()))
            .bind(change.resolve(&current.description, patch.description.as_deref()))
            .bind(version)
            .fetch_one(&mut *conn)
            .await
            .op(OP)?;

        tracing::info!(
            bid_id = %id,
            from_version = current.version,
            to_version = version,
            change = change.label(),
            "Bid version written"
        );
        Ok(bid)
    }
}
