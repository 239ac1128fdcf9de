//! Fixture builders shared by the repository integration tests.

#![allow(dead_code)]

use sqlx::PgPool;
use tender_core::author::AuthorType;
use tender_core::status::EntityStatus;
use tender_core::types::DbId;
use tender_db::models::bid::{Bid, CreateBid};
use tender_db::models::employee::{CreateEmployee, Employee};
use tender_db::models::organization::{CreateOrganization, Organization};
use tender_db::models::tender::{CreateTender, Tender};
use tender_db::repositories::{BidRepo, EmployeeRepo, OrganizationRepo, TenderRepo};

pub async fn employee(pool: &PgPool, username: &str) -> Employee {
    EmployeeRepo::create(
        pool,
        &CreateEmployee {
            username: username.to_string(),
            first_name: None,
            last_name: None,
        },
    )
    .await
    .unwrap()
}

pub async fn organization(pool: &PgPool, name: &str) -> Organization {
    OrganizationRepo::create(
        pool,
        &CreateOrganization {
            name: name.to_string(),
            description: None,
            organization_type: None,
        },
    )
    .await
    .unwrap()
}

/// An organization with `size` responsible members named `{prefix}_0..`.
pub async fn organization_with_members(
    pool: &PgPool,
    prefix: &str,
    size: usize,
) -> (Organization, Vec<Employee>) {
    let org = organization(pool, &format!("{prefix} Org")).await;
    let mut members = Vec::with_capacity(size);
    for i in 0..size {
        let member = employee(pool, &format!("{prefix}_{i}")).await;
        OrganizationRepo::add_responsible(pool, org.id, member.id)
            .await
            .unwrap();
        members.push(member);
    }
    (org, members)
}

pub fn new_tender(organization_id: DbId, creator: &str, name: &str) -> CreateTender {
    CreateTender {
        name: name.to_string(),
        description: Some("Initial description".to_string()),
        service_type: "Construction".to_string(),
        organization_id,
        creator_username: creator.to_string(),
    }
}

pub async fn published_tender(pool: &PgPool, organization_id: DbId, creator: &str) -> Tender {
    let tender = TenderRepo::create(pool, &new_tender(organization_id, creator, "Bridge repair"))
        .await
        .unwrap();
    TenderRepo::set_status(pool, tender.id, creator, EntityStatus::Published)
        .await
        .unwrap()
}

pub fn new_bid(tender_id: DbId, author_type: AuthorType, author_id: DbId) -> CreateBid {
    CreateBid {
        name: "Offer".to_string(),
        description: Some("We can do it".to_string()),
        tender_id,
        author_type,
        author_id,
    }
}

pub async fn published_bid(pool: &PgPool, tender_id: DbId, author_type: AuthorType, author_id: DbId) -> Bid {
    let bid = BidRepo::create(pool, &new_bid(tender_id, author_type, author_id))
        .await
        .unwrap();
    BidRepo::set_status(pool, bid.id, EntityStatus::Published)
        .await
        .unwrap()
}
