//! Data access layer. Handlers talk to a `Store`; the server wires in `PgStore`.

pub mod postgres;

pub use postgres::{ensure_database_exists, ensure_tables, PgStore};

use crate::entity::{EntityDef, Key};
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;

/// A stored row as a JSON object keyed by column name.
pub type Row = Value;

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), AppError>;

    /// All rows ordered by the key columns.
    async fn list(&self, entity: &EntityDef) -> Result<Vec<Row>, AppError>;

    async fn fetch(&self, entity: &EntityDef, key: &Key) -> Result<Option<Row>, AppError>;

    /// Insert one row and return it. Returns `None` only for entities that ignore duplicates
    /// when the key already exists; the stored row is left untouched.
    async fn insert(
        &self,
        entity: &EntityDef,
        record: &[(&'static str, Value)],
    ) -> Result<Option<Row>, AppError>;

    /// Apply a partial update. `None` when no row has this key.
    async fn update(
        &self,
        entity: &EntityDef,
        key: &Key,
        changes: &[(&'static str, Value)],
    ) -> Result<Option<Row>, AppError>;

    /// Delete one row and return it. Rows listed in `entity.dependents` are removed first,
    /// in the same transaction. `None` when no row has this key.
    async fn delete(&self, entity: &EntityDef, key: &Key) -> Result<Option<Row>, AppError>;
}
