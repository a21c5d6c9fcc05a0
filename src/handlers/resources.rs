//! `/resources` endpoints. Deleting a resource also removes its skill links.

use super::entity::{self, IdPath};
use crate::entity::Resources;
use crate::error::{AppError, ErrorBody};
use crate::extractors::JsonBody;
use crate::models::{Resource, ResourceCreate, ResourceUpdate};
use crate::state::AppState;
use crate::store::Row;
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::Value;

#[utoipa::path(
    get,
    path = "/resources",
    tag = "Resources",
    responses(
        (status = 200, description = "All resources ordered by id", body = [Resource]),
        (status = 500, description = "Store failure", body = ErrorBody),
    )
)]
pub async fn list_resources(state: State<AppState>) -> Result<Json<Vec<Row>>, AppError> {
    entity::list::<Resources>(state).await
}

#[utoipa::path(
    get,
    path = "/resources/{id}",
    tag = "Resources",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Resource found", body = Resource),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "Resource not found", body = ErrorBody),
    )
)]
pub async fn read_resource(state: State<AppState>, id: IdPath) -> Result<Json<Row>, AppError> {
    entity::read::<Resources>(state, id).await
}

#[utoipa::path(
    post,
    path = "/resources",
    tag = "Resources",
    request_body = ResourceCreate,
    responses(
        (status = 201, description = "Resource created", body = Resource),
        (status = 400, description = "Missing or invalid field, or invalid type", body = ErrorBody),
        (status = 500, description = "Store failure, e.g. unknown theme_id", body = ErrorBody),
    )
)]
pub async fn create_resource(
    state: State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<Row>), AppError> {
    entity::create::<Resources>(state, body).await
}

#[utoipa::path(
    put,
    path = "/resources/{id}",
    tag = "Resources",
    params(("id" = i64, Path, description = "Resource id")),
    request_body = ResourceUpdate,
    responses(
        (status = 200, description = "Resource updated; omitted fields unchanged", body = Resource),
        (status = 400, description = "Invalid id or field", body = ErrorBody),
        (status = 404, description = "Resource not found", body = ErrorBody),
    )
)]
pub async fn update_resource(
    state: State<AppState>,
    id: IdPath,
    body: Result<JsonBody, AppError>,
) -> Result<Json<Row>, AppError> {
    entity::update::<Resources>(state, id, body).await
}

#[utoipa::path(
    delete,
    path = "/resources/{id}",
    tag = "Resources",
    params(("id" = i64, Path, description = "Resource id")),
    responses(
        (status = 200, description = "Resource and its skill links deleted"),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "Resource not found", body = ErrorBody),
    )
)]
pub async fn delete_resource(state: State<AppState>, id: IdPath) -> Result<Json<Value>, AppError> {
    entity::delete::<Resources>(state, id).await
}
