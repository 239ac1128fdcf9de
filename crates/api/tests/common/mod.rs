//! Shared harness for the HTTP integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tender_core::status::EntityStatus;
use tender_db::models::employee::{CreateEmployee, Employee};
use tender_db::models::organization::{CreateOrganization, Organization};
use tender_db::models::tender::{CreateTender, Tender};
use tender_db::repositories::{EmployeeRepo, OrganizationRepo, TenderRepo};
use tower::ServiceExt;

use tender_api::config::ServerConfig;
use tender_api::router::build_app_router;
use tender_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: String::new(),
        db_max_connections: 5,
    }
}

/// Build the full application router, including the production middleware
/// stack, on top of the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    build_app_router(AppState { pool }, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn put(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::PUT, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

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

/// An organization whose responsible members are the given usernames.
pub async fn organization(pool: &PgPool, name: &str, members: &[&str]) -> (Organization, Vec<Employee>) {
    let org = OrganizationRepo::create(
        pool,
        &CreateOrganization {
            name: name.to_string(),
            description: None,
            organization_type: None,
        },
    )
    .await
    .unwrap();

    let mut employees = Vec::with_capacity(members.len());
    for username in members {
        let member = employee(pool, username).await;
        OrganizationRepo::add_responsible(pool, org.id, member.id)
            .await
            .unwrap();
        employees.push(member);
    }
    (org, employees)
}

/// A published tender created by `creator` for `org`.
pub async fn published_tender(pool: &PgPool, org: &Organization, creator: &str) -> Tender {
    let tender = TenderRepo::create(
        pool,
        &CreateTender {
            name: "Road works".to_string(),
            description: Some("Resurface the main road".to_string()),
            service_type: "Construction".to_string(),
            organization_id: org.id,
            creator_username: creator.to_string(),
        },
    )
    .await
    .unwrap();
    TenderRepo::set_status(pool, tender.id, creator, EntityStatus::Published)
        .await
        .unwrap()
}
