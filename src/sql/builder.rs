//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from an entity definition.

use crate::entity::{ColumnDef, Dependent, EntityDef, Key, PgType};
use serde_json::Value;

/// Quote identifier for PostgreSQL (safe: only from entity definitions).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Push a value and return its placeholder, cast to the column type.
    fn push_param(&mut self, v: Value, pg_type: PgType) -> String {
        self.params.push(v);
        format!("${}::{}", self.params.len(), pg_type.as_sql())
    }
}

fn select_column_list(entity: &EntityDef) -> String {
    entity
        .columns
        .iter()
        .map(|c| quoted(c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn key_column(entity: &EntityDef, name: &str) -> PgType {
    entity.column(name).map(|c| c.pg_type).unwrap_or(PgType::Int)
}

/// `"a" = $1 AND "b" = $2` for the key columns, pushing the key values.
fn key_clause(entity: &EntityDef, q: &mut QueryBuf, key: &Key) -> String {
    entity
        .key
        .iter()
        .zip(key.values())
        .map(|(col, v)| {
            let ph = q.push_param(v, key_column(entity, col));
            format!("{} = {}", quoted(col), ph)
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn order_clause(entity: &EntityDef) -> String {
    entity
        .key
        .iter()
        .map(|c| quoted(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT every row ordered by the key columns.
pub fn select_list(entity: &EntityDef) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(entity),
        quoted(entity.table),
        order_clause(entity)
    );
    q
}

pub fn select_by_key(entity: &EntityDef, key: &Key) -> QueryBuf {
    let mut q = QueryBuf::new();
    let clause = key_clause(entity, &mut q, key);
    q.sql = format!(
        "SELECT {} FROM {} WHERE {}",
        select_column_list(entity),
        quoted(entity.table),
        clause
    );
    q
}

/// INSERT the given columns; timestamps are set with NOW(). Entities that ignore duplicates
/// get `ON CONFLICT DO NOTHING`, so an existing key returns no row.
pub fn insert(entity: &EntityDef, record: &[(&'static str, Value)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (name, value) in record {
        let Some(c) = writable_column(entity, name) else { continue };
        placeholders.push(q.push_param(value.clone(), c.pg_type));
        cols.push(quoted(name));
    }
    if entity.timestamps {
        for ts in ["created_at", "updated_at"] {
            cols.push(quoted(ts));
            placeholders.push("NOW()".to_string());
        }
    }
    let conflict = if entity.ignore_duplicates {
        " ON CONFLICT DO NOTHING"
    } else {
        ""
    };
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}){} RETURNING {}",
        quoted(entity.table),
        cols.join(", "),
        placeholders.join(", "),
        conflict,
        select_column_list(entity)
    );
    q
}

/// Partial UPDATE by key: only the provided columns are assigned. Non-nullable columns go
/// through COALESCE so a stray null keeps the stored value; nullable columns take the value as
/// sent. `updated_at` is refreshed on every update of a timestamped entity.
/// With nothing to assign this degrades to a SELECT so the caller still gets the row or nothing.
pub fn update(entity: &EntityDef, key: &Key, changes: &[(&'static str, Value)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for (name, value) in changes {
        let Some(c) = writable_column(entity, name) else { continue };
        let ph = q.push_param(value.clone(), c.pg_type);
        let col = quoted(name);
        if c.nullable {
            sets.push(format!("{} = {}", col, ph));
        } else {
            sets.push(format!("{} = COALESCE({}, {})", col, ph, col));
        }
    }
    if entity.timestamps {
        sets.push(format!("{} = NOW()", quoted("updated_at")));
    }
    if sets.is_empty() {
        return select_by_key(entity, key);
    }
    let clause = key_clause(entity, &mut q, key);
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} RETURNING {}",
        quoted(entity.table),
        sets.join(", "),
        clause,
        select_column_list(entity)
    );
    q
}

/// DELETE by key, returning the removed row.
pub fn delete(entity: &EntityDef, key: &Key) -> QueryBuf {
    let mut q = QueryBuf::new();
    let clause = key_clause(entity, &mut q, key);
    q.sql = format!(
        "DELETE FROM {} WHERE {} RETURNING {}",
        quoted(entity.table),
        clause,
        select_column_list(entity)
    );
    q
}

/// DELETE every dependent row pointing at `id`.
pub fn delete_dependents(dependent: &Dependent, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(Value::from(id), PgType::Int);
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        quoted(dependent.table),
        quoted(dependent.column),
        ph
    );
    q
}

fn writable_column<'a>(entity: &'a EntityDef, name: &str) -> Option<&'a ColumnDef> {
    entity.column(name).filter(|c| !c.generated)
}
