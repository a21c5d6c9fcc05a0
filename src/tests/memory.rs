//! In-memory `Store` with the same observable behavior as the PostgreSQL one:
//! serial ids, key ordering, COALESCE updates, foreign keys and dependent cleanup on delete.

use crate::entity::{EntityDef, Key, ALL_ENTITIES};
use crate::error::AppError;
use crate::store::{Row, Store};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct Tables {
    rows: HashMap<&'static str, Vec<Map<String, Value>>>,
    sequences: HashMap<&'static str, i64>,
    clock: i64,
}

impl Tables {
    fn now(&mut self) -> Value {
        self.clock += 1;
        let at = DateTime::<Utc>::from_timestamp(1_700_000_000 + self.clock, 0).unwrap();
        Value::String(at.to_rfc3339())
    }

    fn next_id(&mut self, table: &'static str) -> i64 {
        let seq = self.sequences.entry(table).or_insert(0);
        *seq += 1;
        *seq
    }

    fn table(&self, table: &str) -> &[Map<String, Value>] {
        self.rows.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    fn id_exists(&self, table: &str, id: &Value) -> bool {
        self.table(table).iter().any(|r| r.get("id") == Some(id))
    }

    fn check_references(&self, entity: &EntityDef, values: &[(&'static str, Value)]) -> Result<(), AppError> {
        for (name, value) in values {
            let Some(target) = entity.column(name).and_then(|c| c.references) else {
                continue;
            };
            if !value.is_null() && !self.id_exists(target, value) {
                return Err(AppError::Internal(format!(
                    "insert or update on table \"{}\" violates foreign key constraint on {}",
                    entity.table, name
                )));
            }
        }
        Ok(())
    }
}

fn matches_key(entity: &EntityDef, row: &Map<String, Value>, key: &Key) -> bool {
    entity.key.len() == key.0.len()
        && entity
            .key
            .iter()
            .zip(&key.0)
            .all(|(col, v)| row.get(*col).and_then(Value::as_i64) == Some(*v))
}

fn sort_key(entity: &EntityDef, row: &Map<String, Value>) -> Vec<i64> {
    entity
        .key
        .iter()
        .map(|col| row.get(*col).and_then(Value::as_i64).unwrap_or_default())
        .collect()
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every operation fail as if the database were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn enter(&self) -> Result<std::sync::MutexGuard<'_, Tables>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(self.tables.lock().unwrap())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.enter().map(|_| ())
    }

    async fn list(&self, entity: &EntityDef) -> Result<Vec<Row>, AppError> {
        let tables = self.enter()?;
        let mut rows = tables.table(entity.table).to_vec();
        rows.sort_by_key(|r| sort_key(entity, r));
        Ok(rows.into_iter().map(Value::Object).collect())
    }

    async fn fetch(&self, entity: &EntityDef, key: &Key) -> Result<Option<Row>, AppError> {
        let tables = self.enter()?;
        Ok(tables
            .table(entity.table)
            .iter()
            .find(|r| matches_key(entity, r, key))
            .cloned()
            .map(Value::Object))
    }

    async fn insert(
        &self,
        entity: &EntityDef,
        record: &[(&'static str, Value)],
    ) -> Result<Option<Row>, AppError> {
        let mut tables = self.enter()?;
        tables.check_references(entity, record)?;

        let provided: HashMap<&str, &Value> = record.iter().map(|(k, v)| (*k, v)).collect();
        let now = tables.now();
        let mut row = Map::new();
        for col in entity.columns {
            let value = match col.name {
                "id" if col.generated => Value::from(tables.next_id(entity.table)),
                "created_at" | "updated_at" if col.generated => now.clone(),
                name => provided.get(name).map(|v| (*v).clone()).unwrap_or(Value::Null),
            };
            if value.is_null() && !col.nullable {
                return Err(AppError::Internal(format!(
                    "null value in column \"{}\" of relation \"{}\"",
                    col.name, entity.table
                )));
            }
            row.insert(col.name.to_string(), value);
        }

        let key = Key(sort_key(entity, &row));
        let exists = tables
            .table(entity.table)
            .iter()
            .any(|r| matches_key(entity, r, &key));
        if exists {
            if entity.ignore_duplicates {
                return Ok(None);
            }
            return Err(AppError::Internal(format!(
                "duplicate key value violates unique constraint on \"{}\"",
                entity.table
            )));
        }

        tables.rows.entry(entity.table).or_default().push(row.clone());
        Ok(Some(Value::Object(row)))
    }

    async fn update(
        &self,
        entity: &EntityDef,
        key: &Key,
        changes: &[(&'static str, Value)],
    ) -> Result<Option<Row>, AppError> {
        let mut tables = self.enter()?;
        let exists = tables
            .table(entity.table)
            .iter()
            .any(|r| matches_key(entity, r, key));
        if !exists {
            return Ok(None);
        }
        tables.check_references(entity, changes)?;
        let now = tables.now();
        let Some(row) = tables
            .rows
            .get_mut(entity.table)
            .and_then(|rows| rows.iter_mut().find(|r| matches_key(entity, r, key)))
        else {
            return Ok(None);
        };

        for (name, value) in changes {
            let nullable = entity.column(name).map(|c| c.nullable).unwrap_or(false);
            if value.is_null() && !nullable {
                continue;
            }
            row.insert(name.to_string(), value.clone());
        }
        if entity.timestamps {
            row.insert("updated_at".into(), now);
        }
        Ok(Some(Value::Object(row.clone())))
    }

    async fn delete(&self, entity: &EntityDef, key: &Key) -> Result<Option<Row>, AppError> {
        let mut tables = self.enter()?;
        let Some(row) = tables
            .table(entity.table)
            .iter()
            .find(|r| matches_key(entity, r, key))
            .cloned()
        else {
            return Ok(None);
        };
        let id = row.get("id").cloned().unwrap_or(Value::Null);

        // Rows still pointing at this one after dependents are gone block the delete.
        for other in ALL_ENTITIES.iter() {
            for col in other.columns.iter().filter(|c| c.references == Some(entity.table)) {
                let cleared = entity
                    .dependents
                    .iter()
                    .any(|d| d.table == other.table && d.column == col.name);
                if cleared {
                    continue;
                }
                if tables.table(other.table).iter().any(|r| r.get(col.name) == Some(&id)) {
                    return Err(AppError::Internal(format!(
                        "update or delete on table \"{}\" violates foreign key constraint from \"{}\"",
                        entity.table, other.table
                    )));
                }
            }
        }

        for dependent in entity.dependents {
            if let Some(rows) = tables.rows.get_mut(dependent.table) {
                rows.retain(|r| r.get(dependent.column) != Some(&id));
            }
        }
        if let Some(rows) = tables.rows.get_mut(entity.table) {
            rows.retain(|r| !matches_key(entity, r, key));
        }
        Ok(Some(Value::Object(row)))
    }
}
