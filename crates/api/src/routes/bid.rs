//! Route definitions for the `/bids` resource.
//!
//! Path parameters share the name `{id}` at each position; for `list` and
//! `reviews` it holds a tender id.

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::bid;
use crate::state::AppState;

/// Routes mounted at `/bids`.
///
/// ```text
/// POST   /new                       -> create
/// GET    /my                        -> list_mine
/// GET    /{id}/list                 -> list_for_tender
/// GET    /{id}/reviews              -> reviews
/// GET    /{id}/status               -> get_status
/// PUT    /{id}/status               -> set_status
/// PATCH  /{id}/edit                 -> edit
/// PUT    /{id}/submit_decision      -> submit_decision
/// PUT    /{id}/feedback             -> feedback
/// PUT    /{id}/rollback/{version}   -> rollback
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/new", post(bid::create))
        .route("/my", get(bid::list_mine))
        .route("/{id}/list", get(bid::list_for_tender))
        .route("/{id}/reviews", get(bid::reviews))
        .route("/{id}/status", get(bid::get_status).put(bid::set_status))
        .route("/{id}/edit", patch(bid::edit))
        .route("/{id}/submit_decision", put(bid::submit_decision))
        .route("/{id}/feedback", put(bid::feedback))
        .route("/{id}/rollback/{version}", put(bid::rollback))
}
