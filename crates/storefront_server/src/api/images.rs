//! Stored product image download.

use super::SharedState;
use crate::{ApiResult, AppState};
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

pub(super) fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/images/{filename}", get(show))
}

async fn show(State(state): SharedState, Path(filename): Path<String>) -> ApiResult<Response> {
    let file = state.service.image(&filename).await?;
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        file.bytes,
    )
        .into_response())
}
