//! In-process record store.
//!
//! Interprets [`Statement`] shapes directly instead of SQL. Ids come from a
//! per-table sequence and timestamps are RFC 3339 strings, matching what
//! `to_jsonb` produces for the PostgreSQL schema. Data is lost on restart.

use async_trait::async_trait;
use cadastros_common::{EntityDescriptor, Record};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{Param, RecordStore, Statement, StatementKind};
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: Vec<Record>,
}

/// Volatile store with one table per entity.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<&'static str, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, HashMap<&'static str, Table>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
}

fn id_param(params: &[Param]) -> StoreResult<i64> {
    match params.first() {
        Some(Param::Id(id)) => Ok(*id),
        _ => Err(StoreError::InvalidParams("first parameter must be the record id".into())),
    }
}

fn column_values(d: &EntityDescriptor, params: &[Param]) -> StoreResult<Vec<Value>> {
    if params.len() != d.columns.len() {
        return Err(StoreError::InvalidParams(format!(
            "expected {} column values for {}, got {}",
            d.columns.len(),
            d.table,
            params.len()
        )));
    }

    params
        .iter()
        .map(|param| match param {
            Param::Text(Some(text)) => Ok(Value::String(text.clone())),
            Param::Text(None) => Ok(Value::Null),
            Param::Id(_) => Err(StoreError::InvalidParams("unexpected id among column values".into())),
        })
        .collect()
}

fn row_id(d: &EntityDescriptor, row: &Record) -> Option<i64> {
    row.get(d.id_column).and_then(Value::as_i64)
}

/// `ORDER BY` semantics: ascending, NULLs last. Text compares case-folded
/// first, close to PostgreSQL's default locale collation ("ana" before
/// "Zeta"); accents are not folded.
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        (Some(Value::String(x)), Some(Value::String(y))) => {
            x.to_lowercase().cmp(&y.to_lowercase()).then_with(|| x.cmp(y))
        }
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

fn project(d: &EntityDescriptor, row: &Record) -> Record {
    std::iter::once(d.id_column)
        .chain(d.columns.iter().copied())
        .filter_map(|column| row.get(column).map(|v| (column.to_string(), v.clone())))
        .collect()
}

impl MemoryStore {
    fn list(&self, d: &EntityDescriptor) -> Vec<Record> {
        let tables = self.tables();
        let mut rows: Vec<Record> = tables
            .get(d.table)
            .map(|t| t.rows.iter().map(|row| project(d, row)).collect())
            .unwrap_or_default();
        rows.sort_by(|a, b| compare(a.get(d.order_by), b.get(d.order_by)));
        rows
    }

    fn insert(&self, d: &'static EntityDescriptor, params: &[Param]) -> StoreResult<Record> {
        let values = column_values(d, params)?;
        let mut tables = self.tables();
        let table = tables.entry(d.table).or_default();
        table.last_id += 1;

        let mut row = Record::new();
        row.insert(d.id_column.to_string(), Value::from(table.last_id));
        for (column, value) in d.columns.iter().zip(values) {
            row.insert(column.to_string(), value);
        }
        let timestamp = now();
        row.insert("created_at".to_string(), timestamp.clone());
        row.insert("updated_at".to_string(), timestamp);

        table.rows.push(row.clone());
        Ok(row)
    }

    fn update(&self, d: &EntityDescriptor, params: &[Param]) -> StoreResult<Option<Record>> {
        let id = id_param(params)?;
        let values = column_values(d, &params[1..])?;
        let mut tables = self.tables();

        let Some(row) = tables
            .get_mut(d.table)
            .and_then(|t| t.rows.iter_mut().find(|row| row_id(d, row) == Some(id)))
        else {
            return Ok(None);
        };

        for (column, value) in d.columns.iter().zip(values) {
            row.insert(column.to_string(), value);
        }
        row.insert("updated_at".to_string(), now());
        Ok(Some(row.clone()))
    }

    fn delete(&self, d: &EntityDescriptor, params: &[Param]) -> StoreResult<u64> {
        let id = id_param(params)?;
        let mut tables = self.tables();
        let Some(table) = tables.get_mut(d.table) else {
            return Ok(0);
        };

        let before = table.rows.len();
        table.rows.retain(|row| row_id(d, row) != Some(id));
        Ok((before - table.rows.len()) as u64)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_all(&self, statement: &Statement, params: &[Param]) -> StoreResult<Vec<Record>> {
        match statement.kind {
            StatementKind::List => Ok(self.list(statement.descriptor)),
            _ => Ok(self.fetch_optional(statement, params).await?.into_iter().collect()),
        }
    }

    async fn fetch_optional(&self, statement: &Statement, params: &[Param]) -> StoreResult<Option<Record>> {
        match statement.kind {
            StatementKind::Insert => self.insert(statement.descriptor, params).map(Some),
            StatementKind::Update => self.update(statement.descriptor, params),
            StatementKind::List => Ok(self.list(statement.descriptor).into_iter().next()),
            StatementKind::Delete => {
                self.delete(statement.descriptor, params)?;
                Ok(None)
            }
        }
    }

    async fn execute(&self, statement: &Statement, params: &[Param]) -> StoreResult<u64> {
        match statement.kind {
            StatementKind::Delete => self.delete(statement.descriptor, params),
            StatementKind::Insert => self.insert(statement.descriptor, params).map(|_| 1),
            StatementKind::Update => Ok(self.update(statement.descriptor, params)?.map_or(0, |_| 1)),
            StatementKind::List => Ok(self.list(statement.descriptor).len() as u64),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadastros_common::entity::STATUSES;

    fn text(s: &str) -> Param {
        Param::Text(Some(s.to_string()))
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids_and_timestamps() {
        let store = MemoryStore::new();
        let insert = Statement::insert(&STATUSES);

        let first = store.fetch_optional(&insert, &[text("Aberto"), text("#f00")]).await.unwrap().unwrap();
        let second = store.fetch_optional(&insert, &[text("Fechado"), Param::Text(None)]).await.unwrap().unwrap();

        assert_eq!(first["id"], 1);
        assert_eq!(second["id"], 2);
        assert!(first["created_at"].is_string());
        assert_eq!(second["color"], Value::Null);
    }

    #[tokio::test]
    async fn test_list_orders_with_nulls_last_and_projects() {
        let store = MemoryStore::new();
        let insert = Statement::insert(&STATUSES);
        store.fetch_optional(&insert, &[text("b"), Param::Text(None)]).await.unwrap();
        store.fetch_optional(&insert, &[Param::Text(None), Param::Text(None)]).await.unwrap();
        store.fetch_optional(&insert, &[text("a"), Param::Text(None)]).await.unwrap();

        let rows = store.fetch_all(&Statement::list(&STATUSES), &[]).await.unwrap();
        let names: Vec<Value> = rows.iter().map(|r| r["name"].clone()).collect();

        assert_eq!(names, vec![Value::from("a"), Value::from("b"), Value::Null]);
        assert!(!rows[0].contains_key("created_at"));
        assert!(rows[0].contains_key("id"));
    }

    #[tokio::test]
    async fn test_list_order_ignores_case() {
        let store = MemoryStore::new();
        let insert = Statement::insert(&STATUSES);
        for name in ["Zeta", "ana", "Beto"] {
            store.fetch_optional(&insert, &[text(name), Param::Text(None)]).await.unwrap();
        }

        let rows = store.fetch_all(&Statement::list(&STATUSES), &[]).await.unwrap();
        let names: Vec<&str> = rows.iter().filter_map(|r| r["name"].as_str()).collect();
        assert_eq!(names, vec!["ana", "Beto", "Zeta"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_rows() {
        let store = MemoryStore::new();
        let updated = store
            .fetch_optional(&Statement::update(&STATUSES), &[Param::Id(5), text("x"), Param::Text(None)])
            .await
            .unwrap();
        let deleted = store.execute(&Statement::delete(&STATUSES), &[Param::Id(5)]).await.unwrap();

        assert!(updated.is_none());
        assert_eq!(deleted, 0);
    }

    #[tokio::test]
    async fn test_rejects_malformed_params() {
        let store = MemoryStore::new();
        let result = store.fetch_optional(&Statement::insert(&STATUSES), &[text("only name")]).await;
        assert!(matches!(result, Err(StoreError::InvalidParams(_))));

        let result = store.execute(&Statement::delete(&STATUSES), &[text("1")]).await;
        assert!(matches!(result, Err(StoreError::InvalidParams(_))));
    }
}
