//! Pages API route handlers.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Response,
    routing::get,
};

use crate::api::{self, PagesEndpoint};
use crate::api::pipeline::Params;
use crate::error::ApiResult;
use crate::state::AppState;

/// Create the pages router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/pages", get(listing))
        .route("/api/v1/pages/{id}", get(detail))
}

async fn listing(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> ApiResult<Response> {
    api::listing_view(&PagesEndpoint, &state, &params).await
}

async fn detail(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    api::detail_view(&PagesEndpoint, &state, id).await
}
