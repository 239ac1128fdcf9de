pub mod bid;
pub mod health;
pub mod tender;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ping                                    liveness probe
///
/// /tenders                                 list published
/// /tenders/new                             create (POST)
/// /tenders/my                              list by creator
/// /tenders/{id}/status                     get, set (PUT)
/// /tenders/{id}/edit                       sparse edit (PATCH)
/// /tenders/{id}/rollback/{version}         rollback (PUT)
///
/// /bids/new                                create (POST)
/// /bids/my                                 list by author
/// /bids/{tender_id}/list                   published bids on a tender
/// /bids/{tender_id}/reviews                reviews on an author's bids
/// /bids/{id}/status                        get, set (PUT)
/// /bids/{id}/edit                          sparse edit (PATCH)
/// /bids/{id}/submit_decision               vote (PUT)
/// /bids/{id}/feedback                      add review (PUT)
/// /bids/{id}/rollback/{version}            rollback (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ping", get(health::ping))
        .nest("/tenders", tender::router())
        .nest("/bids", bid::router())
}
