//! Handlers for the `/bids` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tender_core::access::ensure_allowed;
use tender_core::author::BidAuthor;
use tender_core::error::CoreError;
use tender_core::status::{DecisionKind, EntityStatus};
use tender_core::types::{DbId, Version};
use tender_core::versioning::validate_target_version;
use tender_db::models::bid::{Bid, CreateBid, UpdateBid};
use tender_db::models::decision::{DecisionReceipt, SubmitDecision};
use tender_db::models::review::{CreateReview, Review};
use tender_db::repositories::{
    AccessRepo, BidRepo, DecisionRepo, EmployeeRepo, IdentityRepo, OrganizationRepo, ReviewRepo,
};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::query::{page, required, StatusParams, UserPageParams, UserParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// `?username=&decision=`
#[derive(Debug, Deserialize)]
pub struct DecisionParams {
    pub username: Option<String>,
    pub decision: Option<String>,
}

/// `?username=&feedback=`
#[derive(Debug, Deserialize)]
pub struct FeedbackParams {
    pub username: Option<String>,
    pub feedback: Option<String>,
}

/// `?author_username=&requester_username=&limit=&offset=`
#[derive(Debug, Deserialize)]
pub struct ReviewParams {
    pub author_username: Option<String>,
    pub requester_username: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /api/bids/new
///
/// The author must exist and the tender must be published.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateBid>,
) -> AppResult<(StatusCode, Json<DataResponse<Bid>>)> {
    input.validate()?;

    let author = input.author();
    let author_exists = match author {
        BidAuthor::User(id) => EmployeeRepo::find_by_id(&state.pool, id).await?.is_some(),
        BidAuthor::Organization(id) => OrganizationRepo::find_by_id(&state.pool, id).await?.is_some(),
    };
    if !author_exists {
        return Err(CoreError::not_found(author.author_type().as_str(), author.author_id()).into());
    }

    let open = AccessRepo::is_tender_public(&state.pool, input.tender_id).await?;
    ensure_allowed(open, "bid on an unpublished tender")?;

    let bid = BidRepo::create(&state.pool, &input).await?;
    tracing::info!(bid_id = %bid.id, tender_id = %bid.tender_id, "Bid created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: bid })))
}

/// GET /api/bids/my
///
/// Bids written by the user, plus those written by their organization.
pub async fn list_mine(
    State(state): State<AppState>,
    Query(params): Query<UserPageParams>,
) -> AppResult<Json<DataResponse<Vec<Bid>>>> {
    let username = required(&params.username, "username")?;
    let user_id = IdentityRepo::resolve_user(&state.pool, username).await?;
    let organization_id = IdentityRepo::find_organization(&state.pool, user_id).await?;

    let (limit, offset) = page(params.limit, params.offset);
    let bids = BidRepo::list_by_author(&state.pool, user_id, organization_id, limit, offset).await?;
    Ok(Json(DataResponse { data: bids }))
}

/// GET /api/bids/{tender_id}/list
pub async fn list_for_tender(
    State(state): State<AppState>,
    Path(tender_id): Path<DbId>,
    Query(params): Query<UserPageParams>,
) -> AppResult<Json<DataResponse<Vec<Bid>>>> {
    let username = required(&params.username, "username")?;
    let user_id = IdentityRepo::resolve_user(&state.pool, username).await?;
    let allowed = AccessRepo::can_act_on_tender(&state.pool, user_id, tender_id).await?;
    ensure_allowed(allowed, "list bids of this tender")?;

    let (limit, offset) = page(params.limit, params.offset);
    let bids = BidRepo::list_published_for_tender(&state.pool, tender_id, limit, offset).await?;
    Ok(Json(DataResponse { data: bids }))
}

/// GET /api/bids/{tender_id}/reviews
///
/// Reviews left on the bids `author_username` submitted to this tender.
/// The requester must be responsible for the tender's organization.
pub async fn reviews(
    State(state): State<AppState>,
    Path(tender_id): Path<DbId>,
    Query(params): Query<ReviewParams>,
) -> AppResult<Json<DataResponse<Vec<Review>>>> {
    let requester = required(&params.requester_username, "requester_username")?;
    let author = required(&params.author_username, "author_username")?;

    let requester_id = IdentityRepo::resolve_user(&state.pool, requester).await?;
    let author_id = IdentityRepo::resolve_user(&state.pool, author).await?;
    let allowed = AccessRepo::can_act_on_tender(&state.pool, requester_id, tender_id).await?;
    ensure_allowed(allowed, "read reviews for this tender")?;

    let bid_ids =
        BidRepo::ids_for_tender_by_author(&state.pool, tender_id, BidAuthor::User(author_id)).await?;
    let (limit, offset) = page(params.limit, params.offset);
    let reviews = ReviewRepo::list_for_bids(&state.pool, &bid_ids, limit, offset).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// GET /api/bids/{id}/status
pub async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<UserParams>,
) -> AppResult<Json<DataResponse<EntityStatus>>> {
    let username = required(&params.username, "username")?;
    let user_id = IdentityRepo::resolve_user(&state.pool, username).await?;
    let allowed = AccessRepo::can_view_bid_status(&state.pool, user_id, id).await?;
    ensure_allowed(allowed, "view this bid")?;

    let status = BidRepo::get_status(&state.pool, id).await?;
    Ok(Json(DataResponse { data: status }))
}

/// PUT /api/bids/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<StatusParams>,
) -> AppResult<Json<DataResponse<Bid>>> {
    let username = required(&params.username, "username")?;
    let status: EntityStatus = required(&params.status, "status")?.parse()?;

    authorize_author(&state, id, username).await?;
    let bid = BidRepo::set_status(&state.pool, id, status).await?;
    Ok(Json(DataResponse { data: bid }))
}

/// PATCH /api/bids/{id}/edit
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<UserParams>,
    Json(input): Json<UpdateBid>,
) -> AppResult<Json<DataResponse<Bid>>> {
    input.validate()?;
    let username = required(&params.username, "username")?;

    authorize_author(&state, id, username).await?;
    let bid = BidRepo::edit(&state.pool, id, &input).await?;
    Ok(Json(DataResponse { data: bid }))
}

/// PUT /api/bids/{id}/rollback/{version}
pub async fn rollback(
    State(state): State<AppState>,
    Path((id, version)): Path<(DbId, Version)>,
    Query(params): Query<UserParams>,
) -> AppResult<Json<DataResponse<Bid>>> {
    let version = validate_target_version(version)?;
    let username = required(&params.username, "username")?;

    authorize_author(&state, id, username).await?;
    let bid = BidRepo::rollback(&state.pool, id, version).await?;
    Ok(Json(DataResponse { data: bid }))
}

/// PUT /api/bids/{id}/submit_decision
pub async fn submit_decision(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DecisionParams>,
) -> AppResult<Json<DataResponse<DecisionReceipt>>> {
    let username = required(&params.username, "username")?;
    let decision: DecisionKind = required(&params.decision, "decision")?.parse()?;

    let user_id = IdentityRepo::resolve_user(&state.pool, username).await?;
    let bid = authorize_tender_owner(&state, id, user_id, "decide on this bid").await?;

    let receipt = DecisionRepo::submit(
        &state.pool,
        &SubmitDecision {
            user_id,
            bid_id: bid.id,
            tender_id: bid.tender_id,
            decision,
        },
    )
    .await?;
    Ok(Json(DataResponse { data: receipt }))
}

/// PUT /api/bids/{id}/feedback
pub async fn feedback(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<(StatusCode, Json<DataResponse<Review>>)> {
    let username = required(&params.username, "username")?;
    let text = required(&params.feedback, "feedback")?;

    let user_id = IdentityRepo::resolve_user(&state.pool, username).await?;
    let bid = authorize_tender_owner(&state, id, user_id, "review this bid").await?;

    let input = CreateReview {
        bid_id: bid.id,
        author_id: user_id,
        feedback: text.to_string(),
    };
    input.validate()?;

    let review = ReviewRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// Resolve `username` and require that they wrote the bid, directly or
/// through their organization.
async fn authorize_author(state: &AppState, bid_id: DbId, username: &str) -> AppResult<()> {
    let user_id = IdentityRepo::resolve_user(&state.pool, username).await?;
    let allowed = AccessRepo::can_act_on_bid(&state.pool, user_id, bid_id).await?;
    Ok(ensure_allowed(allowed, "modify this bid")?)
}

/// Load a published bid and require `user_id` to be responsible for the
/// organization owning its tender.
async fn authorize_tender_owner(
    state: &AppState,
    bid_id: DbId,
    user_id: DbId,
    action: &str,
) -> AppResult<Bid> {
    let bid = BidRepo::get(&state.pool, bid_id).await?;
    if bid.status != EntityStatus::Published {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Bid {bid_id} is not published"
        ))));
    }
    let allowed = AccessRepo::can_act_on_tender(&state.pool, user_id, bid.tender_id).await?;
    ensure_allowed(allowed, action)?;
    Ok(bid)
}
