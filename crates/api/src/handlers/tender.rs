//! Handlers for the `/tenders` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tender_core::access::ensure_allowed;
use tender_core::status::EntityStatus;
use tender_core::types::{DbId, Version};
use tender_core::versioning::validate_target_version;
use tender_db::models::tender::{CreateTender, Tender, UpdateTender};
use tender_db::repositories::{AccessRepo, IdentityRepo, TenderRepo};
use validator::Validate;

use crate::error::AppResult;
use crate::query::{page, required, StatusParams, UserPageParams, UserParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// `?limit=&offset=&service_type=a,b`
#[derive(Debug, Deserialize)]
pub struct TenderListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Comma-separated service types; empty means all.
    pub service_type: Option<String>,
}

/// GET /api/tenders
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TenderListParams>,
) -> AppResult<Json<DataResponse<Vec<Tender>>>> {
    let (limit, offset) = page(params.limit, params.offset);
    let service_types: Vec<String> = params
        .service_type
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let tenders = TenderRepo::list_published(&state.pool, &service_types, limit, offset).await?;
    Ok(Json(DataResponse { data: tenders }))
}

/// POST /api/tenders/new
///
/// The creator must be responsible for the target organization.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTender>,
) -> AppResult<(StatusCode, Json<DataResponse<Tender>>)> {
    input.validate()?;

    let user_id = IdentityRepo::resolve_user(&state.pool, &input.creator_username).await?;
    let allowed = IdentityRepo::is_responsible(&state.pool, user_id, input.organization_id).await?;
    ensure_allowed(allowed, "create a tender for this organization")?;

    let tender = TenderRepo::create(&state.pool, &input).await?;
    tracing::info!(tender_id = %tender.id, user_id = %user_id, "Tender created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: tender })))
}

/// GET /api/tenders/my
pub async fn list_mine(
    State(state): State<AppState>,
    Query(params): Query<UserPageParams>,
) -> AppResult<Json<DataResponse<Vec<Tender>>>> {
    let username = required(&params.username, "username")?;
    IdentityRepo::resolve_user(&state.pool, username).await?;

    let (limit, offset) = page(params.limit, params.offset);
    let tenders = TenderRepo::list_by_creator(&state.pool, username, limit, offset).await?;
    Ok(Json(DataResponse { data: tenders }))
}

/// GET /api/tenders/{id}/status
///
/// Anyone may read the status of a published tender; otherwise only
/// members of the owning organization.
pub async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<UserParams>,
) -> AppResult<Json<DataResponse<EntityStatus>>> {
    if !AccessRepo::is_tender_public(&state.pool, id).await? {
        let username = required(&params.username, "username")?;
        let user_id = IdentityRepo::resolve_user(&state.pool, username).await?;
        let allowed = AccessRepo::can_act_on_tender(&state.pool, user_id, id).await?;
        ensure_allowed(allowed, "view this tender")?;
    }

    let status = TenderRepo::get_status(&state.pool, id).await?;
    Ok(Json(DataResponse { data: status }))
}

/// PUT /api/tenders/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<StatusParams>,
) -> AppResult<Json<DataResponse<Tender>>> {
    let username = required(&params.username, "username")?;
    let status: EntityStatus = required(&params.status, "status")?.parse()?;

    authorize(&state, id, username).await?;
    let tender = TenderRepo::set_status(&state.pool, id, username, status).await?;
    Ok(Json(DataResponse { data: tender }))
}

/// PATCH /api/tenders/{id}/edit
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<UserParams>,
    Json(input): Json<UpdateTender>,
) -> AppResult<Json<DataResponse<Tender>>> {
    input.validate()?;
    let username = required(&params.username, "username")?;

    authorize(&state, id, username).await?;
    let tender = TenderRepo::edit(&state.pool, id, username, &input).await?;
    Ok(Json(DataResponse { data: tender }))
}

/// PUT /api/tenders/{id}/rollback/{version}
pub async fn rollback(
    State(state): State<AppState>,
    Path((id, version)): Path<(DbId, Version)>,
    Query(params): Query<UserParams>,
) -> AppResult<Json<DataResponse<Tender>>> {
    let version = validate_target_version(version)?;
    let username = required(&params.username, "username")?;

    authorize(&state, id, username).await?;
    let tender = TenderRepo::rollback(&state.pool, id, username, version).await?;
    Ok(Json(DataResponse { data: tender }))
}

/// Resolve `username` and require membership in the tender's organization.
/// The repository additionally restricts writes to the tender's creator.
async fn authorize(state: &AppState, tender_id: DbId, username: &str) -> AppResult<()> {
    let user_id = IdentityRepo::resolve_user(&state.pool, username).await?;
    let allowed = AccessRepo::can_act_on_tender(&state.pool, user_id, tender_id).await?;
    Ok(ensure_allowed(allowed, "modify this tender")?)
}
