//! Generic CRUD execution against any `Store`. One implementation serves every entity;
//! the entity definition supplies table, columns, key shape and delete cascade.

use crate::entity::{EntityDef, Key};
use crate::error::AppError;
use crate::store::{Row, Store};
use serde_json::Value;

/// Outcome of creating a row on an entity that ignores duplicates.
#[derive(Debug)]
pub enum Created {
    New(Row),
    AlreadyExists,
}

pub struct CrudService;

impl CrudService {
    pub async fn list(store: &dyn Store, entity: &EntityDef) -> Result<Vec<Row>, AppError> {
        store.list(entity).await
    }

    /// Fetch one row by key, or the entity's not-found error.
    pub async fn read(store: &dyn Store, entity: &EntityDef, key: &Key) -> Result<Row, AppError> {
        store
            .fetch(entity, key)
            .await?
            .ok_or_else(|| entity.not_found())
    }

    /// Insert one validated record. Returns the created row with generated id and timestamps.
    pub async fn create(
        store: &dyn Store,
        entity: &EntityDef,
        record: &[(&'static str, Value)],
    ) -> Result<Row, AppError> {
        match Self::create_or_existing(store, entity, record).await? {
            Created::New(row) => Ok(row),
            Created::AlreadyExists => Err(AppError::Internal(format!(
                "insert into {} returned no row",
                entity.table
            ))),
        }
    }

    pub async fn create_or_existing(
        store: &dyn Store,
        entity: &EntityDef,
        record: &[(&'static str, Value)],
    ) -> Result<Created, AppError> {
        let created = match store.insert(entity, record).await? {
            Some(row) => Created::New(row),
            None => Created::AlreadyExists,
        };
        Ok(created)
    }

    /// Apply the provided columns only; everything else keeps its stored value.
    pub async fn update(
        store: &dyn Store,
        entity: &EntityDef,
        key: &Key,
        changes: &[(&'static str, Value)],
    ) -> Result<Row, AppError> {
        store
            .update(entity, key, changes)
            .await?
            .ok_or_else(|| entity.not_found())
    }

    /// Delete one row (and its dependents) and return it.
    pub async fn delete(store: &dyn Store, entity: &EntityDef, key: &Key) -> Result<Row, AppError> {
        let row = store
            .delete(entity, key)
            .await?
            .ok_or_else(|| entity.not_found())?;
        tracing::info!(table = entity.table, key = %key, "row deleted");
        Ok(row)
    }
}
