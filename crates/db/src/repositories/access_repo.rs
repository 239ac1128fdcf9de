//! Authorization resolver.
//!
//! Loads the facts a permission rule needs and hands them to
//! [`tender_core::access`]. A missing tender or bid is always reported as
//! `NotFound`; `Ok(false)` only ever means the entity exists but the user
//! may not act on it.

use sqlx::PgPool;
use tender_core::access::{bid_author_allows, tender_allows};
use tender_core::types::DbId;

use super::{BidRepo, IdentityRepo, TenderRepo};
use crate::error::RepoResult;

/// Permission checks for tenders and bids.
pub struct AccessRepo;

impl AccessRepo {
    /// Whether `user_id` is responsible for the organization owning the tender.
    pub async fn can_act_on_tender(pool: &PgPool, user_id: DbId, tender_id: DbId) -> RepoResult<bool> {
        let organization_id = TenderRepo::organization_of(pool, tender_id).await?;
        let memberships = IdentityRepo::organizations_of(pool, user_id).await?;
        Ok(tender_allows(organization_id, &memberships))
    }

    /// Whether `user_id` wrote the bid, or is responsible for the
    /// organization that wrote it.
    pub async fn can_act_on_bid(pool: &PgPool, user_id: DbId, bid_id: DbId) -> RepoResult<bool> {
        let bid = BidRepo::get(pool, bid_id).await?;
        let memberships = IdentityRepo::organizations_of(pool, user_id).await?;
        Ok(bid_author_allows(&bid.author, user_id, &memberships))
    }

    /// [`can_act_on_bid`](Self::can_act_on_bid), falling back to the owners
    /// of the tender the bid was submitted to.
    pub async fn can_view_bid_status(pool: &PgPool, user_id: DbId, bid_id: DbId) -> RepoResult<bool> {
        let bid = BidRepo::get(pool, bid_id).await?;
        let memberships = IdentityRepo::organizations_of(pool, user_id).await?;
        if bid_author_allows(&bid.author, user_id, &memberships) {
            return Ok(true);
        }
        let organization_id = TenderRepo::organization_of(pool, bid.tender_id).await?;
        Ok(tender_allows(organization_id, &memberships))
    }

    /// Whether the tender is visible to everyone, i.e. `Published`.
    pub async fn is_tender_public(pool: &PgPool, tender_id: DbId) -> RepoResult<bool> {
        let status = TenderRepo::get_status(pool, tender_id).await?;
        Ok(status.is_public())
    }
}
