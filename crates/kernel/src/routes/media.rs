//! Media API route handlers.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Response,
    routing::get,
};

use crate::api::{self, MediaEndpoint};
use crate::api::pipeline::Params;
use crate::error::ApiResult;
use crate::state::AppState;

/// Create the media router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/media", get(listing))
        .route("/api/v1/media/{id}", get(detail))
}

async fn listing(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> ApiResult<Response> {
    api::listing_view(&MediaEndpoint, &state, &params).await
}

async fn detail(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Response> {
    api::detail_view(&MediaEndpoint, &state, id).await
}
