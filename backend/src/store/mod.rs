//! Record stores.
//!
//! A [`RecordStore`] executes the parameterized [`Statement`]s that a
//! [`CrudService`](crate::crud::CrudService) prepares once per entity. Two
//! implementations exist:
//!
//! - [`PgStore`] - PostgreSQL through a `sqlx` connection pool
//! - [`MemoryStore`] - volatile in-process tables with the same contract
//!
//! Every statement returns rows as JSON objects (`to_jsonb` on the SQL side),
//! so the column set of an entity never needs a Rust struct.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::{DatabaseSettings, PgStore};

use async_trait::async_trait;
use cadastros_common::{EntityDescriptor, Record};
use serde_json::Value;

use crate::error::StoreResult;

// =============================================================================
// Statements
// =============================================================================

/// Shape of a prepared statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// No params. Rows: id + columns, sorted by `order_by`.
    List,
    /// Params: one text per column. Row: the inserted record.
    Insert,
    /// Params: id, then one text per column. Row: the updated record, if any.
    Update,
    /// Params: id. Result: affected row count.
    Delete,
}

/// SQL text derived from an entity descriptor, plus the shape it was built
/// from.
#[derive(Debug, Clone)]
pub struct Statement {
    pub kind: StatementKind,
    pub descriptor: &'static EntityDescriptor,
    pub sql: String,
}

impl Statement {
    pub fn list(d: &'static EntityDescriptor) -> Self {
        let sql = format!(
            "SELECT to_jsonb(r) AS record FROM (SELECT {}, {} FROM {}) AS r ORDER BY r.{}",
            d.id_column,
            d.columns.join(", "),
            d.table,
            d.order_by
        );
        Self::new(StatementKind::List, d, sql)
    }

    pub fn insert(d: &'static EntityDescriptor) -> Self {
        let placeholders: Vec<String> = (1..=d.columns.len()).map(|i| format!("${i}")).collect();
        let sql = format!(
            "INSERT INTO {table} ({}) VALUES ({}) RETURNING to_jsonb({table}.*) AS record",
            d.columns.join(", "),
            placeholders.join(", "),
            table = d.table
        );
        Self::new(StatementKind::Insert, d, sql)
    }

    pub fn update(d: &'static EntityDescriptor) -> Self {
        let assignments: Vec<String> = d
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = ${}", i + 2))
            .collect();
        let sql = format!(
            "UPDATE {table} SET {} WHERE {} = $1 RETURNING to_jsonb({table}.*) AS record",
            assignments.join(", "),
            d.id_column,
            table = d.table
        );
        Self::new(StatementKind::Update, d, sql)
    }

    pub fn delete(d: &'static EntityDescriptor) -> Self {
        let sql = format!("DELETE FROM {} WHERE {} = $1", d.table, d.id_column);
        Self::new(StatementKind::Delete, d, sql)
    }

    fn new(kind: StatementKind, descriptor: &'static EntityDescriptor, sql: String) -> Self {
        Self { kind, descriptor, sql }
    }
}

/// A bound statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Id(i64),
    Text(Option<String>),
}

impl Param {
    /// Column value from a JSON payload entry. Missing and null bind as SQL
    /// NULL; non-string scalars bind as their JSON text.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Param::Text(None),
            Some(Value::String(s)) => Param::Text(Some(s.clone())),
            Some(other) => Param::Text(Some(other.to_string())),
        }
    }
}

// =============================================================================
// Store contract
// =============================================================================

/// Executes prepared statements and returns JSON rows or row counts.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Run a statement returning any number of rows.
    async fn fetch_all(&self, statement: &Statement, params: &[Param]) -> StoreResult<Vec<Record>>;

    /// Run a statement returning at most one row.
    async fn fetch_optional(&self, statement: &Statement, params: &[Param]) -> StoreResult<Option<Record>>;

    /// Run a statement and return the number of affected rows.
    async fn execute(&self, statement: &Statement, params: &[Param]) -> StoreResult<u64>;

    /// Check that the store answers.
    async fn ping(&self) -> StoreResult<()>;

    /// Release pooled connections.
    async fn close(&self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadastros_common::entity::{STATUSES, TEAMS};
    use serde_json::json;

    #[test]
    fn test_list_statement() {
        let stmt = Statement::list(&TEAMS);
        assert_eq!(
            stmt.sql,
            "SELECT to_jsonb(r) AS record FROM (SELECT id, name, email, phone, role FROM teams) AS r ORDER BY r.name"
        );
    }

    #[test]
    fn test_insert_statement() {
        let stmt = Statement::insert(&STATUSES);
        assert_eq!(
            stmt.sql,
            "INSERT INTO statuses (name, color) VALUES ($1, $2) RETURNING to_jsonb(statuses.*) AS record"
        );
    }

    #[test]
    fn test_update_statement_sets_every_column() {
        let stmt = Statement::update(&TEAMS);
        assert_eq!(
            stmt.sql,
            "UPDATE teams SET name = $2, email = $3, phone = $4, role = $5 WHERE id = $1 RETURNING to_jsonb(teams.*) AS record"
        );
    }

    #[test]
    fn test_delete_statement() {
        assert_eq!(Statement::delete(&STATUSES).sql, "DELETE FROM statuses WHERE id = $1");
    }

    #[test]
    fn test_param_from_json() {
        assert_eq!(Param::from_json(None), Param::Text(None));
        assert_eq!(Param::from_json(Some(&Value::Null)), Param::Text(None));
        assert_eq!(Param::from_json(Some(&json!(""))), Param::Text(Some(String::new())));
        assert_eq!(Param::from_json(Some(&json!("Ana"))), Param::Text(Some("Ana".into())));
        assert_eq!(Param::from_json(Some(&json!(42))), Param::Text(Some("42".into())));
    }
}
