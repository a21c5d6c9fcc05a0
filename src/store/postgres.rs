//! PostgreSQL store over a sqlx pool, plus database and table bootstrap.

use super::{Row, Store};
use crate::entity::{EntityDef, Key, PgType};
use crate::error::AppError;
use crate::sql::{self, PgBindValue, QueryBuf};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{ConnectOptions, PgConnection, PgPool};
use std::str::FromStr;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    async fn fetch_optional(&self, entity: &EntityDef, q: &QueryBuf) -> Result<Option<Row>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_all(sqlx::query(&q.sql), &q.params)?
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_json(entity, &r)).transpose()
    }

    /// Dependents first, then the row itself, on one connection. Any failure rolls back
    /// explicitly before the error is returned.
    async fn delete_with_dependents(&self, entity: &EntityDef, key: &Key) -> Result<Option<Row>, AppError> {
        let id = key
            .0
            .first()
            .copied()
            .ok_or_else(|| AppError::Internal(format!("empty key for {}", entity.table)))?;
        let mut tx = self.pool.begin().await?;
        match delete_in_tx(&mut tx, entity, key, id).await {
            Ok(row) => {
                tx.commit().await?;
                Ok(row)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::error!(error = %rollback, table = entity.table, "rollback failed");
                }
                Err(e)
            }
        }
    }
}

async fn delete_in_tx(
    conn: &mut PgConnection,
    entity: &EntityDef,
    key: &Key,
    id: i64,
) -> Result<Option<Row>, AppError> {
    for dependent in entity.dependents {
        let q = sql::delete_dependents(dependent, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        let done = bind_all(sqlx::query(&q.sql), &q.params)?
            .execute(&mut *conn)
            .await?;
        tracing::debug!(table = dependent.table, removed = done.rows_affected(), "dependents removed");
    }
    let q = sql::delete(entity, key);
    tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
    let row = bind_all(sqlx::query(&q.sql), &q.params)?
        .fetch_optional(&mut *conn)
        .await?;
    row.map(|r| row_to_json(entity, &r)).transpose()
}

type PgQuery<'q> = sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>;

fn bind_all<'q>(mut query: PgQuery<'q>, params: &[Value]) -> Result<PgQuery<'q>, AppError> {
    for p in params {
        query = query.bind(PgBindValue::from_json(p)?);
    }
    Ok(query)
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list(&self, entity: &EntityDef) -> Result<Vec<Row>, AppError> {
        let q = sql::select_list(entity);
        tracing::debug!(sql = %q.sql, "query");
        let rows = sqlx::query(&q.sql).fetch_all(&self.pool).await?;
        rows.iter().map(|r| row_to_json(entity, r)).collect()
    }

    async fn fetch(&self, entity: &EntityDef, key: &Key) -> Result<Option<Row>, AppError> {
        self.fetch_optional(entity, &sql::select_by_key(entity, key)).await
    }

    async fn insert(
        &self,
        entity: &EntityDef,
        record: &[(&'static str, Value)],
    ) -> Result<Option<Row>, AppError> {
        self.fetch_optional(entity, &sql::insert(entity, record)).await
    }

    async fn update(
        &self,
        entity: &EntityDef,
        key: &Key,
        changes: &[(&'static str, Value)],
    ) -> Result<Option<Row>, AppError> {
        self.fetch_optional(entity, &sql::update(entity, key, changes)).await
    }

    async fn delete(&self, entity: &EntityDef, key: &Key) -> Result<Option<Row>, AppError> {
        if entity.dependents.is_empty() {
            self.fetch_optional(entity, &sql::delete(entity, key)).await
        } else {
            self.delete_with_dependents(entity, key).await
        }
    }
}

/// Decode a row by the entity's column types.
fn row_to_json(entity: &EntityDef, row: &PgRow) -> Result<Row, AppError> {
    use sqlx::Row as _;
    let mut map = serde_json::Map::new();
    for col in entity.columns {
        let name = col.name;
        let v = match col.pg_type {
            PgType::Int => row.try_get::<Option<i32>, _>(name)?.map(Value::from),
            PgType::Text => row.try_get::<Option<String>, _>(name)?.map(Value::from),
            PgType::Bool => row.try_get::<Option<bool>, _>(name)?.map(Value::from),
            PgType::Timestamptz => row
                .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name)?
                .map(|d| Value::String(d.to_rfc3339())),
        };
        map.insert(name.to_string(), v.unwrap_or(Value::Null));
    }
    Ok(Value::Object(map))
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)?;
    let mut conn: PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::Internal("database url has no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres", base), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Table DDL in creation order: referenced tables first.
const TABLES_DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS themes (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS skills (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS resources (
        id SERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        url TEXT NOT NULL,
        description TEXT,
        theme_id INTEGER NOT NULL REFERENCES themes (id),
        type TEXT NOT NULL CHECK (type IN ('guide', 'video', 'exercise', 'project')),
        is_ada BOOLEAN NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS resources_skills (
        resource_id INTEGER NOT NULL REFERENCES resources (id),
        skill_id INTEGER NOT NULL REFERENCES skills (id),
        PRIMARY KEY (resource_id, skill_id)
    )
    "#,
];

/// Create the four tables if they are missing. Existing tables are left as they are.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    for ddl in TABLES_DDL {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!("tables ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Key, RESOURCES, RESOURCES_SKILLS, SKILLS, THEMES};
    use crate::error::AppError;
    use crate::store::{Row, Store};
    use serde_json::json;
    use sqlx::postgres::PgPoolOptions;

    /// Store on the scratch database named by `DATABASE_URL`, tables created if missing.
    async fn scratch_store() -> PgStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a scratch database");
        ensure_database_exists(&url).await.unwrap();
        let pool = PgPoolOptions::new().max_connections(2).connect(&url).await.unwrap();
        ensure_tables(&pool).await.unwrap();
        PgStore::new(pool)
    }

    fn id_of(row: &Row) -> i64 {
        row["id"].as_i64().unwrap()
    }

    #[tokio::test]
    #[ignore = "needs DATABASE_URL pointing at a scratch PostgreSQL database"]
    async fn resource_delete_removes_links_in_one_transaction() {
        let store = scratch_store().await;
        let theme = store
            .insert(&THEMES, &[("name", json!("Backend")), ("description", Value::Null)])
            .await
            .unwrap()
            .unwrap();
        let resource = store
            .insert(
                &RESOURCES,
                &[
                    ("title", json!("Guide Express")),
                    ("url", json!("https://expressjs.com")),
                    ("description", Value::Null),
                    ("theme_id", json!(id_of(&theme))),
                    ("type", json!("guide")),
                    ("is_ada", json!(true)),
                ],
            )
            .await
            .unwrap()
            .unwrap();
        let skill = store
            .insert(&SKILLS, &[("name", json!("Express"))])
            .await
            .unwrap()
            .unwrap();
        let (resource_id, skill_id) = (id_of(&resource), id_of(&skill));
        let link = [("resource_id", json!(resource_id)), ("skill_id", json!(skill_id))];

        assert!(store.insert(&RESOURCES_SKILLS, &link).await.unwrap().is_some());
        assert!(store.insert(&RESOURCES_SKILLS, &link).await.unwrap().is_none());

        let updated = store
            .update(
                &RESOURCES,
                &Key::single(resource_id),
                &[("title", Value::Null), ("description", json!("new text"))],
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["title"], "Guide Express");
        assert_eq!(updated["description"], "new text");

        let removed = store.delete(&RESOURCES, &Key::single(resource_id)).await.unwrap().unwrap();
        assert_eq!(id_of(&removed), resource_id);
        assert!(store
            .fetch(&RESOURCES_SKILLS, &Key::pair(resource_id, skill_id))
            .await
            .unwrap()
            .is_none());
        assert!(store.fetch(&RESOURCES, &Key::single(resource_id)).await.unwrap().is_none());

        store.delete(&SKILLS, &Key::single(skill_id)).await.unwrap();
        store.delete(&THEMES, &Key::single(id_of(&theme))).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "needs DATABASE_URL pointing at a scratch PostgreSQL database"]
    async fn dangling_theme_is_rejected_by_the_database() {
        let store = scratch_store().await;
        let err = store
            .insert(
                &RESOURCES,
                &[
                    ("title", json!("Orphan")),
                    ("url", json!("https://example.com")),
                    ("description", Value::Null),
                    ("theme_id", json!(i32::MAX)),
                    ("type", json!("video")),
                    ("is_ada", json!(false)),
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Db(_)));
    }

    #[test]
    fn admin_url_targets_postgres_database() {
        let (admin, name) =
            parse_db_name_from_url("postgres://u:p@localhost:5432/skills_catalog?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres");
        assert_eq!(name, "skills_catalog");
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("my\"db"), "\"my\"\"db\"");
    }
}
