//! Router assembly: common probes, entity CRUD, OpenAPI document, fallback and middleware.

mod common;
mod entity;

pub use common::common_routes;
pub use entity::entity_routes;

use crate::docs::ApiDoc;
use crate::error::AppError;
use crate::state::AppState;
use axum::{routing::get, Json, Router};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Largest accepted request body.
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Unknown path, or a known path with a method it does not serve.
pub(crate) async fn not_found() -> AppError {
    AppError::NotFound("Not found".into())
}

/// The full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(entity_routes(state))
        .route("/api-docs/openapi.json", get(openapi).fallback(not_found))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES)),
        )
}
