//! Generic entity CRUD handlers: list, read, create, update, delete.
//! Instantiated once per entity through the `Entity` trait.

use crate::entity::{Entity, Key};
use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::response;
use crate::service::validation::{parse_id, INVALID_ID};
use crate::service::CrudService;
use crate::state::AppState;
use crate::store::Row;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

/// A single id path segment, kept even when it fails to extract.
pub type IdPath = Result<Path<String>, PathRejection>;

/// Path id as an integer. A segment that cannot even be decoded is reported like any other bad id.
pub fn path_id(id: IdPath) -> Result<i64, AppError> {
    let Path(raw) = id.map_err(|_| AppError::bad_request(INVALID_ID))?;
    parse_id(&raw)
}

pub async fn list<E: Entity>(State(state): State<AppState>) -> Result<Json<Vec<Row>>, AppError> {
    let rows = CrudService::list(state.store.as_ref(), E::DEF).await?;
    Ok(Json(rows))
}

pub async fn read<E: Entity>(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<Row>, AppError> {
    let key = Key::single(path_id(id)?);
    let row = CrudService::read(state.store.as_ref(), E::DEF, &key).await?;
    Ok(Json(row))
}

pub async fn create<E: Entity>(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Row>), AppError> {
    let record = E::validate_create(&body)?;
    let row = CrudService::create(state.store.as_ref(), E::DEF, &record).await?;
    Ok(response::created(row))
}

/// The id is checked before the body, so a bad id wins over a bad body.
pub async fn update<E: Entity>(
    State(state): State<AppState>,
    id: IdPath,
    body: Result<JsonBody, AppError>,
) -> Result<Json<Row>, AppError> {
    let key = Key::single(path_id(id)?);
    let JsonBody(body) = body?;
    let changes = E::validate_update(&body)?;
    let row = CrudService::update(state.store.as_ref(), E::DEF, &key, &changes).await?;
    Ok(Json(row))
}

pub async fn delete<E: Entity>(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<Value>, AppError> {
    let id = path_id(id)?;
    let key = Key::single(id);
    let row = CrudService::delete(state.store.as_ref(), E::DEF, &key).await?;
    Ok(response::deleted(
        E::DEF,
        format!("{} {} deleted", E::DEF.label, id),
        row,
    ))
}
