//! Product endpoints.

use super::{SharedState, list_query, parse_id};
use crate::{ApiError, ApiResult, AppState, FormBody};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use std::sync::Arc;
use storefront_core::{Envelope, Page, Product, ProductWithCategories, RawListQuery, required_message};
use storefront_error::ValidationError;

pub(super) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/products", get(index).post(store))
        .route("/products/with-categories", get(with_categories))
        .route("/products/batch", post(store_batch))
        .route(
            "/products/{id}",
            get(show).put(update).post(update).delete(destroy),
        )
        .route("/products/{id}/edit", get(show))
}

async fn index(
    State(state): SharedState,
    raw: Result<Query<RawListQuery>, QueryRejection>,
) -> ApiResult<Json<Envelope<Page<Product>>>> {
    let query = list_query(raw, state.limits);
    let page = state.service.list_products(&query).await?;
    Ok(Json(Envelope::ok(page)))
}

async fn with_categories(
    State(state): SharedState,
) -> ApiResult<Json<Envelope<Vec<ProductWithCategories>>>> {
    Ok(Json(Envelope::ok(
        state.service.products_with_categories().await?,
    )))
}

async fn store(
    State(state): SharedState,
    FormBody(form): FormBody,
) -> ApiResult<(StatusCode, Json<Envelope<ProductWithCategories>>)> {
    let product = state.service.create_product(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok_with_message(product, "Product created successfully")),
    ))
}

/// `{"inputs": [...]}`; each input has the create fields minus the image.
async fn store_batch(
    State(state): SharedState,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<Vec<Product>>>)> {
    let Json(body) = body.map_err(|e| ApiError::Rejected(e.status(), e.body_text()))?;
    let inputs = match body {
        Value::Object(mut map) => match map.remove("inputs") {
            Some(Value::Array(inputs)) => inputs,
            Some(Value::Null) | None => {
                return Err(ValidationError::field("inputs", required_message("inputs")).into());
            }
            Some(_) => {
                return Err(
                    ValidationError::field("inputs", "The inputs must be an array.").into(),
                );
            }
        },
        _ => return Err(ValidationError::field("inputs", required_message("inputs")).into()),
    };

    let products = state.service.create_products(inputs).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok_with_message(
            products,
            "Products created successfully",
        )),
    ))
}

async fn show(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<ProductWithCategories>>> {
    let id = parse_id(&id, "Product")?;
    Ok(Json(Envelope::ok(state.service.product(id).await?)))
}

async fn update(
    State(state): SharedState,
    Path(id): Path<String>,
    FormBody(form): FormBody,
) -> ApiResult<Json<Envelope<ProductWithCategories>>> {
    let id = parse_id(&id, "Product")?;
    let product = state.service.update_product(id, form).await?;
    Ok(Json(Envelope::ok_with_message(
        product,
        "Product updated successfully",
    )))
}

async fn destroy(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Product>>> {
    let id = parse_id(&id, "Product")?;
    let product = state.service.delete_product(id).await?;
    Ok(Json(Envelope::ok_with_message(
        product,
        "Product deleted successfully",
    )))
}
