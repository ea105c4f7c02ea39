//! HTTP routes.

mod categories;
mod images;
mod products;

use crate::{ApiError, AppState, ServerSettings};
use axum::extract::rejection::QueryRejection;
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use storefront_core::{ListQuery, PageLimits, RawListQuery};
use storefront_error::{ServerError, ServerErrorKind, StorefrontResult};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

/// Shared state as seen by handlers.
pub(crate) type SharedState = State<Arc<AppState>>;

/// Build the CORS layer from configured origins; `*` allows any origin.
fn cors_layer(origins: &[String]) -> StorefrontResult<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return Ok(layer.allow_origin(Any));
    }

    let parsed = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| {
                ServerError::new(ServerErrorKind::Configuration(format!(
                    "Invalid CORS origin {}: {}",
                    origin, e
                )))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(layer.allow_origin(AllowOrigin::list(parsed)))
}

/// Build the API router.
///
/// # Errors
///
/// Returns an error if a configured CORS origin is not a valid header value.
pub fn create_router(state: AppState, settings: &ServerSettings) -> StorefrontResult<Router> {
    let cors = cors_layer(settings.cors_origins())?;

    let router = Router::new()
        .route("/health", get(health))
        .merge(categories::routes())
        .merge(products::routes())
        .merge(images::routes())
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(*settings.body_limit_bytes()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state));
    Ok(router)
}

/// Liveness of the process and its store.
async fn health(State(state): SharedState) -> impl IntoResponse {
    match state.health.health_check().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}

async fn fallback() -> ApiError {
    ApiError::NotFound("Route")
}

async fn method_not_allowed() -> ApiError {
    ApiError::Rejected(
        StatusCode::METHOD_NOT_ALLOWED,
        "Method not allowed.".to_string(),
    )
}

/// Coerce list parameters, ignoring a query string that fails to parse.
pub(crate) fn list_query(
    raw: Result<Query<RawListQuery>, QueryRejection>,
    limits: PageLimits,
) -> ListQuery {
    let raw = match raw {
        Ok(Query(raw)) => raw,
        Err(e) => {
            debug!(error = %e, "Using default list parameters");
            RawListQuery::default()
        }
    };
    ListQuery::from_raw(&raw, limits)
}

/// Parse a path id; anything that is not an id cannot name a row.
pub(crate) fn parse_id(raw: &str, resource: &'static str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::NotFound(resource))
}
