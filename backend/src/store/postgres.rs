//! PostgreSQL record store backed by a `sqlx` connection pool.

use async_trait::async_trait;
use cadastros_common::Record;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgConnectOptions, PgPool, PgPoolOptions, PgRow, PgSslMode};
use sqlx::query::Query;
use sqlx::{Postgres, Row};
use std::str::FromStr;
use std::time::Duration;

use super::{Param, RecordStore, Statement};
use crate::error::{StoreError, StoreResult};

/// Connection settings for [`PgStore::connect`].
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// `postgres://` connection string
    pub url: String,
    /// Require TLS (certificate not verified)
    pub ssl: bool,
    /// Maximum pooled connections
    pub max_connections: u32,
    /// Idle time before a pooled connection is closed
    pub idle_timeout: Duration,
}

/// Record store over a shared PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Open the pool. The first connection is established eagerly, so an
    /// unreachable database fails here.
    pub async fn connect(settings: &DatabaseSettings) -> StoreResult<Self> {
        let mut options = PgConnectOptions::from_str(&settings.url)?;
        if settings.ssl {
            options = options.ssl_mode(PgSslMode::Require);
        }

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .idle_timeout(settings.idle_timeout)
            .connect_with(options)
            .await?;

        tracing::info!(
            max_connections = settings.max_connections,
            ssl = settings.ssl,
            "PostgreSQL pool ready"
        );

        Ok(Self { pool })
    }

    /// Wrap an already configured pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn bind<'q>(sql: &'q str, params: &[Param]) -> Query<'q, Postgres, PgArguments> {
    params.iter().fold(sqlx::query(sql), |query, param| match param {
        Param::Id(id) => query.bind(*id),
        Param::Text(text) => query.bind(text.clone()),
    })
}

fn decode(row: &PgRow) -> StoreResult<Record> {
    match row.try_get::<Value, _>("record")? {
        Value::Object(record) => Ok(record),
        other => Err(StoreError::Decode(format!("expected a JSON object, got {other}"))),
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn fetch_all(&self, statement: &Statement, params: &[Param]) -> StoreResult<Vec<Record>> {
        let rows = bind(&statement.sql, params).fetch_all(&self.pool).await?;
        rows.iter().map(decode).collect()
    }

    async fn fetch_optional(&self, statement: &Statement, params: &[Param]) -> StoreResult<Option<Record>> {
        let row = bind(&statement.sql, params).fetch_optional(&self.pool).await?;
        row.as_ref().map(decode).transpose()
    }

    async fn execute(&self, statement: &Statement, params: &[Param]) -> StoreResult<u64> {
        let result = bind(&statement.sql, params).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::{CrudService, Removed};
    use crate::error::ApiError;
    use cadastros_common::EntityKind;
    use serde_json::json;
    use std::sync::Arc;

    const SCHEMA: &str = include_str!("../../sql/schema.sql");

    async fn service(pool: PgPool, kind: EntityKind) -> CrudService {
        sqlx::raw_sql(SCHEMA).execute(&pool).await.unwrap();
        CrudService::for_kind(kind, Arc::new(PgStore::from_pool(pool)))
    }

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[sqlx::test(migrations = false)]
    async fn test_crud_lifecycle(pool: PgPool) {
        let teams = service(pool, EntityKind::Teams).await;

        let created = teams
            .create(&record(json!({"name": "Ana", "role": "Dev", "salary": 10})))
            .await
            .unwrap();
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["name"], "Ana");
        assert_eq!(created["email"], Value::Null);
        assert!(created["created_at"].is_string());
        assert!(!created.contains_key("salary"));

        // Full replace: role is not in the payload, so it is cleared.
        let updated = teams
            .update(id, &record(json!({"name": "Ana Paula", "email": "ana@example.com"})))
            .await
            .unwrap();
        assert_eq!(updated["id"], id);
        assert_eq!(updated["name"], "Ana Paula");
        assert_eq!(updated["role"], Value::Null);

        let rows = teams.list().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["email"], "ana@example.com");

        assert_eq!(teams.remove(id).await.unwrap(), Removed { success: true });
        assert!(matches!(teams.remove(id).await, Err(ApiError::NotFound { .. })));
        assert!(matches!(
            teams.update(id, &record(json!({"name": "x"}))).await,
            Err(ApiError::NotFound { .. })
        ));
        assert!(teams.list().await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = false)]
    async fn test_list_order_and_projection(pool: PgPool) {
        let clients = service(pool, EntityKind::Clients).await;

        let mut ids = Vec::new();
        for name in ["Zeta", "Alfa", "Mu"] {
            let row = clients.create(&record(json!({ "name": name }))).await.unwrap();
            ids.push(row["id"].as_i64().unwrap());
        }
        clients.update(ids[1], &record(json!({"company": "Acme"}))).await.unwrap();

        let rows = clients.list().await.unwrap();
        let names: Vec<Value> = rows.iter().map(|r| r["name"].clone()).collect();
        assert_eq!(names, vec![Value::from("Mu"), Value::from("Zeta"), Value::Null]);

        let mut keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["company", "email", "id", "name", "phone"]);
    }

    #[sqlx::test(migrations = false)]
    async fn test_ping(pool: PgPool) {
        let store = PgStore::from_pool(pool);
        store.ping().await.unwrap();
    }
}
