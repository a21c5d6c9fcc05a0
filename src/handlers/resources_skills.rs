//! `/resources-skills` endpoints. Links are keyed by `(resource_id, skill_id)` and have no update.

use crate::entity::{Key, RESOURCES_SKILLS};
use crate::error::{AppError, ErrorBody};
use crate::extractors::JsonBody;
use crate::models::{MessageBody, ResourceSkill, ResourceSkillCreate};
use crate::response;
use crate::service::validation::{self, parse_link_ids, INVALID_IDS};
use crate::service::{Created, CrudService};
use crate::state::AppState;
use crate::store::Row;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

fn link_key(ids: Result<Path<(String, String)>, PathRejection>) -> Result<Key, AppError> {
    let Path((resource_id, skill_id)) = ids.map_err(|_| AppError::bad_request(INVALID_IDS))?;
    let (resource_id, skill_id) = parse_link_ids(&resource_id, &skill_id)?;
    Ok(Key::pair(resource_id, skill_id))
}

#[utoipa::path(
    get,
    path = "/resources-skills",
    tag = "Resource skills",
    responses((status = 200, description = "All links ordered by resource_id, skill_id", body = [ResourceSkill]))
)]
pub async fn list_links(State(state): State<AppState>) -> Result<Json<Vec<Row>>, AppError> {
    let rows = CrudService::list(state.store.as_ref(), &RESOURCES_SKILLS).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/resources-skills/{resource_id}/{skill_id}",
    tag = "Resource skills",
    params(
        ("resource_id" = i64, Path, description = "Resource id"),
        ("skill_id" = i64, Path, description = "Skill id"),
    ),
    responses(
        (status = 200, description = "Link found", body = ResourceSkill),
        (status = 400, description = "Invalid ids", body = ErrorBody),
        (status = 404, description = "Link not found", body = ErrorBody),
    )
)]
pub async fn read_link(
    State(state): State<AppState>,
    ids: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<Row>, AppError> {
    let key = link_key(ids)?;
    let row = CrudService::read(state.store.as_ref(), &RESOURCES_SKILLS, &key).await?;
    Ok(Json(row))
}

/// Creating an existing link is not an error: the stored link is kept and 200 is returned.
#[utoipa::path(
    post,
    path = "/resources-skills",
    tag = "Resource skills",
    request_body = ResourceSkillCreate,
    responses(
        (status = 201, description = "Link created", body = ResourceSkill),
        (status = 200, description = "Link already exists", body = MessageBody),
        (status = 400, description = "resource_id and skill_id must be numbers", body = ErrorBody),
        (status = 500, description = "Unknown resource or skill", body = ErrorBody),
    )
)]
pub async fn create_link(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Response, AppError> {
    let record = validation::link_create(&body)?.into_record();
    let created =
        CrudService::create_or_existing(state.store.as_ref(), &RESOURCES_SKILLS, &record).await?;
    Ok(match created {
        Created::New(row) => response::created(row).into_response(),
        Created::AlreadyExists => response::message(StatusCode::OK, "Link already exists").into_response(),
    })
}

#[utoipa::path(
    delete,
    path = "/resources-skills/{resource_id}/{skill_id}",
    tag = "Resource skills",
    params(
        ("resource_id" = i64, Path, description = "Resource id"),
        ("skill_id" = i64, Path, description = "Skill id"),
    ),
    responses(
        (status = 200, description = "Link deleted"),
        (status = 400, description = "Invalid ids", body = ErrorBody),
        (status = 404, description = "Link not found", body = ErrorBody),
    )
)]
pub async fn delete_link(
    State(state): State<AppState>,
    ids: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let key = link_key(ids)?;
    let row = CrudService::delete(state.store.as_ref(), &RESOURCES_SKILLS, &key).await?;
    Ok(response::deleted(&RESOURCES_SKILLS, "Link deleted".into(), row))
}
