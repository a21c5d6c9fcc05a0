//! `/themes` endpoints.

use super::entity::{self, IdPath};
use crate::entity::Themes;
use crate::error::{AppError, ErrorBody};
use crate::extractors::JsonBody;
use crate::models::{Theme, ThemeCreate, ThemeUpdate};
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
    path = "/themes",
    tag = "Themes",
    responses((status = 200, description = "All themes ordered by id", body = [Theme]))
)]
pub async fn list_themes(state: State<AppState>) -> Result<Json<Vec<Row>>, AppError> {
    entity::list::<Themes>(state).await
}

#[utoipa::path(
    get,
    path = "/themes/{id}",
    tag = "Themes",
    params(("id" = i64, Path, description = "Theme id")),
    responses(
        (status = 200, description = "Theme found", body = Theme),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "Theme not found", body = ErrorBody),
    )
)]
pub async fn read_theme(state: State<AppState>, id: IdPath) -> Result<Json<Row>, AppError> {
    entity::read::<Themes>(state, id).await
}

#[utoipa::path(
    post,
    path = "/themes",
    tag = "Themes",
    request_body = ThemeCreate,
    responses(
        (status = 201, description = "Theme created", body = Theme),
        (status = 400, description = "name is required", body = ErrorBody),
    )
)]
pub async fn create_theme(
    state: State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<Row>), AppError> {
    entity::create::<Themes>(state, body).await
}

#[utoipa::path(
    put,
    path = "/themes/{id}",
    tag = "Themes",
    params(("id" = i64, Path, description = "Theme id")),
    request_body = ThemeUpdate,
    responses(
        (status = 200, description = "Theme updated", body = Theme),
        (status = 400, description = "Invalid id or name", body = ErrorBody),
        (status = 404, description = "Theme not found", body = ErrorBody),
    )
)]
pub async fn update_theme(
    state: State<AppState>,
    id: IdPath,
    body: Result<JsonBody, AppError>,
) -> Result<Json<Row>, AppError> {
    entity::update::<Themes>(state, id, body).await
}

#[utoipa::path(
    delete,
    path = "/themes/{id}",
    tag = "Themes",
    params(("id" = i64, Path, description = "Theme id")),
    responses(
        (status = 200, description = "Theme deleted"),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "Theme not found", body = ErrorBody),
        (status = 500, description = "Theme still referenced by resources", body = ErrorBody),
    )
)]
pub async fn delete_theme(state: State<AppState>, id: IdPath) -> Result<Json<Value>, AppError> {
    entity::delete::<Themes>(state, id).await
}
