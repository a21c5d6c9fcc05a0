//! Entity metadata: table, columns and key shape of each persisted record type.
//! The generic CRUD service, the SQL builder and the stores are all driven by these definitions.

mod defs;

pub use defs::*;

use crate::error::AppError;
use serde_json::{Map, Value};
use std::fmt;

/// PostgreSQL column type, used for parameter casts and row decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PgType {
    Int,
    Text,
    Bool,
    Timestamptz,
}

impl PgType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            PgType::Int => "integer",
            PgType::Text => "text",
            PgType::Bool => "boolean",
            PgType::Timestamptz => "timestamptz",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub pg_type: PgType,
    pub nullable: bool,
    /// Set by the store (serial id, timestamps), never by the caller.
    pub generated: bool,
    /// Table whose `id` this column references.
    pub references: Option<&'static str>,
}

impl ColumnDef {
    pub const fn new(name: &'static str, pg_type: PgType) -> Self {
        ColumnDef {
            name,
            pg_type,
            nullable: false,
            generated: false,
            references: None,
        }
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn generated(mut self) -> Self {
        self.generated = true;
        self
    }

    pub const fn references(mut self, table: &'static str) -> Self {
        self.references = Some(table);
        self
    }
}

/// Rows in another table that must be removed before a row of this entity.
#[derive(Clone, Debug)]
pub struct Dependent {
    pub table: &'static str,
    pub column: &'static str,
}

#[derive(Clone, Debug)]
pub struct EntityDef {
    pub table: &'static str,
    /// Human label used in messages ("Resource not found").
    pub label: &'static str,
    /// Key under which a deleted row is returned.
    pub response_key: &'static str,
    /// Primary key columns; also the list ordering.
    pub key: &'static [&'static str],
    pub columns: &'static [ColumnDef],
    /// Maintains `created_at` / `updated_at`.
    pub timestamps: bool,
    /// Inserting an existing key is a no-op instead of an error.
    pub ignore_duplicates: bool,
    pub dependents: &'static [Dependent],
}

impl EntityDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn not_found(&self) -> AppError {
        AppError::NotFound(format!("{} not found", self.label))
    }
}

/// Primary key value, one integer per key column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Key(pub Vec<i64>);

impl Key {
    pub fn single(id: i64) -> Self {
        Key(vec![id])
    }

    pub fn pair(a: i64, b: i64) -> Self {
        Key(vec![a, b])
    }

    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        self.0.iter().map(|v| Value::from(*v))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(i64::to_string).collect();
        f.write_str(&parts.join("/"))
    }
}

/// Column values for an insert, or the provided columns of a partial update.
/// Absent columns are simply not listed.
pub type Record = Vec<(&'static str, Value)>;

/// A single-key entity served by the generic CRUD handlers.
pub trait Entity: Send + Sync + 'static {
    const DEF: &'static EntityDef;

    fn validate_create(body: &Map<String, Value>) -> Result<Record, AppError>;

    fn validate_update(body: &Map<String, Value>) -> Result<Record, AppError>;
}
