//! Category endpoints.

use super::{SharedState, list_query, parse_id};
use crate::{ApiResult, AppState, FormBody};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use storefront_core::{Category, Envelope, Page, RawListQuery};

pub(super) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(index).post(store))
        .route("/categories/all", get(all))
        .route("/categories/{id}", get(show).put(update).delete(destroy))
}

async fn index(
    State(state): SharedState,
    raw: Result<Query<RawListQuery>, QueryRejection>,
) -> ApiResult<Json<Envelope<Page<Category>>>> {
    let query = list_query(raw, state.limits);
    let page = state.service.list_categories(&query).await?;
    Ok(Json(Envelope::ok(page)))
}

async fn all(State(state): SharedState) -> ApiResult<Json<Envelope<Vec<Category>>>> {
    Ok(Json(Envelope::ok(state.service.all_categories().await?)))
}

async fn store(
    State(state): SharedState,
    FormBody(form): FormBody,
) -> ApiResult<(StatusCode, Json<Envelope<Category>>)> {
    let category = state.service.create_category(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok_with_message(category, "Category created successfully")),
    ))
}

async fn show(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Category>>> {
    let id = parse_id(&id, "Category")?;
    Ok(Json(Envelope::ok(state.service.category(id).await?)))
}

async fn update(
    State(state): SharedState,
    Path(id): Path<String>,
    FormBody(form): FormBody,
) -> ApiResult<Json<Envelope<Category>>> {
    let id = parse_id(&id, "Category")?;
    let category = state.service.update_category(id, form).await?;
    Ok(Json(Envelope::ok_with_message(
        category,
        "Category updated successfully",
    )))
}

async fn destroy(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Category>>> {
    let id = parse_id(&id, "Category")?;
    let category = state.service.delete_category(id).await?;
    Ok(Json(Envelope::ok_with_message(
        category,
        "Category deleted successfully",
    )))
}
