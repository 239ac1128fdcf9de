//! Integration tests for identity resolution and permission checks.

mod common;

use assert_matches::assert_matches;
use sqlx::PgPool;
use tender_core::author::{AuthorType, BidAuthor};
use tender_core::error::CoreError;
use tender_core::status::EntityStatus;
use tender_core::types::DbId;
use tender_db::error::RepoError;
use tender_db::models::review::CreateReview;
use tender_db::repositories::{AccessRepo, BidRepo, IdentityRepo, ReviewRepo, TenderRepo};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn resolve_user_by_username(pool: PgPool) {
    let alice = common::employee(&pool, "alice").await;
    assert_eq!(IdentityRepo::resolve_user(&pool, "alice").await.unwrap(), alice.id);

    let err = IdentityRepo::resolve_user(&pool, "mallory").await.unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::NotFound { entity: "Employee", .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn resolve_organization_requires_membership(pool: PgPool) {
    let (org, members) = common::organization_with_members(&pool, "acme", 2).await;
    let loner = common::employee(&pool, "loner").await;

    assert_eq!(
        IdentityRepo::resolve_organization(&pool, members[1].id).await.unwrap(),
        org.id
    );
    assert_eq!(IdentityRepo::find_organization(&pool, loner.id).await.unwrap(), None);
    assert_matches!(
        IdentityRepo::resolve_organization(&pool, loner.id).await,
        Err(RepoError::Core(CoreError::NotFound { entity: "OrganizationResponsible", .. }))
    );
    assert_eq!(IdentityRepo::count_responsible(&pool, org.id).await.unwrap(), 2);
}

// ---------------------------------------------------------------------------
// Tender access
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn tender_access_follows_organization(pool: PgPool) {
    let (acme, acme_members) = common::organization_with_members(&pool, "acme", 2).await;
    let (_, rival_members) = common::organization_with_members(&pool, "rival", 1).await;
    let tender = common::published_tender(&pool, acme.id, &acme_members[0].username).await;

    assert!(AccessRepo::can_act_on_tender(&pool, acme_members[1].id, tender.id).await.unwrap());
    assert!(!AccessRepo::can_act_on_tender(&pool, rival_members[0].id, tender.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_tender_is_not_found_rather_than_denied(pool: PgPool) {
    let alice = common::employee(&pool, "alice").await;
    let err = AccessRepo::can_act_on_tender(&pool, alice.id, DbId::new_v4())
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::NotFound { entity: "Tender", .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_published_tenders_are_public(pool: PgPool) {
    let (org, members) = common::organization_with_members(&pool, "acme", 1).await;
    let creator = &members[0].username;
    let tender = TenderRepo::create(&pool, &common::new_tender(org.id, creator, "Roads"))
        .await
        .unwrap();

    assert!(!AccessRepo::is_tender_public(&pool, tender.id).await.unwrap());

    TenderRepo::set_status(&pool, tender.id, creator, EntityStatus::Published)
        .await
        .unwrap();
    assert!(AccessRepo::is_tender_public(&pool, tender.id).await.unwrap());

    TenderRepo::set_status(&pool, tender.id, creator, EntityStatus::Closed)
        .await
        .unwrap();
    assert!(!AccessRepo::is_tender_public(&pool, tender.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Bid access
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn organization_bid_is_open_to_its_members_only(pool: PgPool) {
    let (owner, owner_members) = common::organization_with_members(&pool, "owner", 1).await;
    let (bidder, bidder_members) = common::organization_with_members(&pool, "bidder", 2).await;
    let (_, rival_members) = common::organization_with_members(&pool, "rival", 1).await;
    let tender = common::published_tender(&pool, owner.id, &owner_members[0].username).await;
    let bid = common::published_bid(&pool, tender.id, AuthorType::Organization, bidder.id).await;

    assert_eq!(bid.author, BidAuthor::Organization(bidder.id));
    for member in &bidder_members {
        assert!(AccessRepo::can_act_on_bid(&pool, member.id, bid.id).await.unwrap());
    }
    assert!(!AccessRepo::can_act_on_bid(&pool, rival_members[0].id, bid.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn individual_bid_is_open_to_its_author_only(pool: PgPool) {
    let (owner, owner_members) = common::organization_with_members(&pool, "owner", 1).await;
    let tender = common::published_tender(&pool, owner.id, &owner_members[0].username).await;
    let author = common::employee(&pool, "author").await;
    let other = common::employee(&pool, "other").await;
    let bid = common::published_bid(&pool, tender.id, AuthorType::User, author.id).await;

    assert!(AccessRepo::can_act_on_bid(&pool, author.id, bid.id).await.unwrap());
    assert!(!AccessRepo::can_act_on_bid(&pool, other.id, bid.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tender_owner_may_view_bid_status(pool: PgPool) {
    let (owner, owner_members) = common::organization_with_members(&pool, "owner", 1).await;
    let (_, rival_members) = common::organization_with_members(&pool, "rival", 1).await;
    let tender = common::published_tender(&pool, owner.id, &owner_members[0].username).await;
    let author = common::employee(&pool, "author").await;
    let bid = common::published_bid(&pool, tender.id, AuthorType::User, author.id).await;

    // The tender owner cannot edit the bid but may inspect it.
    assert!(!AccessRepo::can_act_on_bid(&pool, owner_members[0].id, bid.id).await.unwrap());
    assert!(AccessRepo::can_view_bid_status(&pool, owner_members[0].id, bid.id).await.unwrap());
    assert!(AccessRepo::can_view_bid_status(&pool, author.id, bid.id).await.unwrap());
    assert!(!AccessRepo::can_view_bid_status(&pool, rival_members[0].id, bid.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_bid_is_not_found_for_status_view(pool: PgPool) {
    let alice = common::employee(&pool, "alice").await;
    let err = AccessRepo::can_view_bid_status(&pool, alice.id, DbId::new_v4())
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::NotFound { entity: "Bid", .. }));
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn reviews_are_listed_for_the_authors_bids(pool: PgPool) {
    let (owner, owner_members) = common::organization_with_members(&pool, "owner", 1).await;
    let tender = common::published_tender(&pool, owner.id, &owner_members[0].username).await;
    let author = common::employee(&pool, "author").await;
    let other = common::employee(&pool, "other").await;
    let mine = common::published_bid(&pool, tender.id, AuthorType::User, author.id).await;
    let theirs = common::published_bid(&pool, tender.id, AuthorType::User, other.id).await;

    for (bid_id, feedback) in [(mine.id, "Too slow"), (theirs.id, "Fine"), (mine.id, "Better")] {
        ReviewRepo::create(
            &pool,
            &CreateReview {
                bid_id,
                author_id: owner_members[0].id,
                feedback: feedback.to_string(),
            },
        )
        .await
        .unwrap();
    }

    let bid_ids =
        BidRepo::ids_for_tender_by_author(&pool, tender.id, BidAuthor::User(author.id))
            .await
            .unwrap();
    assert_eq!(bid_ids, vec![mine.id]);

    let reviews = ReviewRepo::list_for_bids(&pool, &bid_ids, 10, 0).await.unwrap();
    let texts: Vec<&str> = reviews.iter().map(|r| r.feedback.as_str()).collect();
    assert_eq!(texts, vec!["Better", "Too slow"]);

    assert!(ReviewRepo::list_for_bids(&pool, &[], 10, 0).await.unwrap().is_empty());
}
