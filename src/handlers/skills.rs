//! `/skills` endpoints.

use super::entity::{self, IdPath};
use crate::entity::Skills;
use crate::error::{AppError, ErrorBody};
use crate::extractors::JsonBody;
use crate::models::{Skill, SkillCreate, SkillUpdate};
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
    path = "/skills",
    tag = "Skills",
    responses((status = 200, description = "All skills ordered by id", body = [Skill]))
)]
pub async fn list_skills(state: State<AppState>) -> Result<Json<Vec<Row>>, AppError> {
    entity::list::<Skills>(state).await
}

#[utoipa::path(
    get,
    path = "/skills/{id}",
    tag = "Skills",
    params(("id" = i64, Path, description = "Skill id")),
    responses(
        (status = 200, description = "Skill found", body = Skill),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "Skill not found", body = ErrorBody),
    )
)]
pub async fn read_skill(state: State<AppState>, id: IdPath) -> Result<Json<Row>, AppError> {
    entity::read::<Skills>(state, id).await
}

#[utoipa::path(
    post,
    path = "/skills",
    tag = "Skills",
    request_body = SkillCreate,
    responses(
        (status = 201, description = "Skill created", body = Skill),
        (status = 400, description = "name is required", body = ErrorBody),
    )
)]
pub async fn create_skill(
    state: State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<Row>), AppError> {
    entity::create::<Skills>(state, body).await
}

#[utoipa::path(
    put,
    path = "/skills/{id}",
    tag = "Skills",
    params(("id" = i64, Path, description = "Skill id")),
    request_body = SkillUpdate,
    responses(
        (status = 200, description = "Skill updated", body = Skill),
        (status = 400, description = "Invalid id or name", body = ErrorBody),
        (status = 404, description = "Skill not found", body = ErrorBody),
    )
)]
pub async fn update_skill(
    state: State<AppState>,
    id: IdPath,
    body: Result<JsonBody, AppError>,
) -> Result<Json<Row>, AppError> {
    entity::update::<Skills>(state, id, body).await
}

#[utoipa::path(
    delete,
    path = "/skills/{id}",
    tag = "Skills",
    params(("id" = i64, Path, description = "Skill id")),
    responses(
        (status = 200, description = "Skill deleted"),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "Skill not found", body = ErrorBody),
        (status = 500, description = "Skill still linked to resources", body = ErrorBody),
    )
)]
pub async fn delete_skill(state: State<AppState>, id: IdPath) -> Result<Json<Value>, AppError> {
    entity::delete::<Skills>(state, id).await
}
