//! Generic CRUD service, instantiated once per entity descriptor.

use cadastros_common::{EntityDescriptor, EntityKind, Record};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult, StoreError};
use crate::store::{Param, RecordStore, Statement};

/// Statements derived once from a descriptor.
#[derive(Debug, Clone)]
struct CrudStatements {
    list: Statement,
    insert: Statement,
    update: Statement,
    delete: Statement,
}

impl CrudStatements {
    fn new(descriptor: &'static EntityDescriptor) -> Self {
        Self {
            list: Statement::list(descriptor),
            insert: Statement::insert(descriptor),
            update: Statement::update(descriptor),
            delete: Statement::delete(descriptor),
        }
    }
}

/// Acknowledgment returned by [`CrudService::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Removed {
    pub success: bool,
}

/// List/create/update/remove for one entity table.
#[derive(Clone)]
pub struct CrudService {
    descriptor: &'static EntityDescriptor,
    statements: Arc<CrudStatements>,
    store: Arc<dyn RecordStore>,
}

impl CrudService {
    pub fn new(descriptor: &'static EntityDescriptor, store: Arc<dyn RecordStore>) -> Self {
        Self {
            descriptor,
            statements: Arc::new(CrudStatements::new(descriptor)),
            store,
        }
    }

    pub fn for_kind(kind: EntityKind, store: Arc<dyn RecordStore>) -> Self {
        Self::new(kind.descriptor(), store)
    }

    pub fn descriptor(&self) -> &'static EntityDescriptor {
        self.descriptor
    }

    /// Keep only the descriptor's columns.
    fn pick_columns(&self, input: &Record) -> Record {
        self.descriptor
            .columns
            .iter()
            .filter_map(|column| input.get(*column).map(|v| (column.to_string(), v.clone())))
            .collect()
    }

    fn missing_required(&self, payload: &Record) -> Vec<&'static str> {
        self.descriptor
            .required_columns
            .iter()
            .copied()
            .filter(|column| match payload.get(*column) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.is_empty(),
                Some(_) => false,
            })
            .collect()
    }

    /// One parameter per column: the payload value, or NULL when absent.
    fn column_params(&self, payload: &Record) -> Vec<Param> {
        self.descriptor
            .columns
            .iter()
            .map(|column| Param::from_json(payload.get(*column)))
            .collect()
    }

    fn not_found(&self, id: i64) -> ApiError {
        ApiError::not_found(format!("{} record with id {} not found.", self.descriptor.table, id))
    }

    /// All rows ordered by the descriptor's sort column.
    pub async fn list(&self) -> ApiResult<Vec<Record>> {
        Ok(self.store.fetch_all(&self.statements.list, &[]).await?)
    }

    /// Insert one row. Every required column must be present and non-empty.
    pub async fn create(&self, input: &Record) -> ApiResult<Record> {
        let payload = self.pick_columns(input);

        let missing = self.missing_required(&payload);
        if !missing.is_empty() {
            return Err(ApiError::missing_fields(&missing));
        }

        let params = self.column_params(&payload);
        let row = self.store.fetch_optional(&self.statements.insert, &params).await?;
        let row = row.ok_or_else(|| StoreError::Decode(format!("insert into {} returned no row", self.descriptor.table)))?;

        tracing::debug!(table = self.descriptor.table, id = ?row.get(self.descriptor.id_column), "Record created");
        Ok(row)
    }

    /// Overwrite every column of row `id`. Columns absent from `input` are
    /// set to NULL; at least one recognized column must be present.
    pub async fn update(&self, id: i64, input: &Record) -> ApiResult<Record> {
        let payload = self.pick_columns(input);
        if payload.is_empty() {
            return Err(ApiError::bad_request("At least one field must be provided for update."));
        }

        let mut params = Vec::with_capacity(self.descriptor.columns.len() + 1);
        params.push(Param::Id(id));
        params.extend(self.column_params(&payload));

        let row = self.store.fetch_optional(&self.statements.update, &params).await?;
        let row = row.ok_or_else(|| self.not_found(id))?;

        tracing::debug!(table = self.descriptor.table, id, "Record updated");
        Ok(row)
    }

    /// Delete row `id`.
    pub async fn remove(&self, id: i64) -> ApiResult<Removed> {
        let affected = self.store.execute(&self.statements.delete, &[Param::Id(id)]).await?;
        if affected == 0 {
            return Err(self.not_found(id));
        }

        tracing::debug!(table = self.descriptor.table, id, "Record removed");
        Ok(Removed { success: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn service(kind: EntityKind) -> CrudService {
        CrudService::for_kind(kind, Arc::new(MemoryStore::new()))
    }

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_create_filters_unknown_keys() {
        let teams = service(EntityKind::Teams);
        let row = teams
            .create(&record(json!({"name": "Ana", "role": "Dev", "salary": 10, "id": 99})))
            .await
            .unwrap();

        assert_eq!(row["id"], 1);
        assert_eq!(row["name"], "Ana");
        assert_eq!(row["role"], "Dev");
        assert_eq!(row["email"], Value::Null);
        assert!(!row.contains_key("salary"));
    }

    #[tokio::test]
    async fn test_create_missing_required_persists_nothing() {
        let clients = service(EntityKind::Clients);

        for payload in [json!({}), json!({"name": null}), json!({"name": "", "company": "Acme"})] {
            let err = clients.create(&record(payload)).await.unwrap_err();
            match err {
                ApiError::BadRequest { message, details } => {
                    assert_eq!(message, "Missing required fields: name");
                    assert_eq!(details, Some(json!({"missing": ["name"]})));
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        assert!(clients.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_every_column() {
        let statuses = service(EntityKind::Statuses);
        let created = statuses
            .create(&record(json!({"name": "Aberto", "color": "#ff0000"})))
            .await
            .unwrap();
        let id = created["id"].as_i64().unwrap();

        let updated = statuses.update(id, &record(json!({"name": "Aberto"}))).await.unwrap();
        assert_eq!(updated["color"], Value::Null);

        // Required columns are not enforced on update.
        let updated = statuses.update(id, &record(json!({"color": "#000"}))).await.unwrap();
        assert_eq!(updated["name"], Value::Null);
        assert_eq!(updated["color"], "#000");
    }

    #[tokio::test]
    async fn test_update_empty_payload_is_bad_request() {
        let systems = service(EntityKind::Systems);
        let err = systems.update(1, &record(json!({"unknown": "x"}))).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_update_and_remove_not_found() {
        let systems = service(EntityKind::Systems);

        let err = systems.update(42, &record(json!({"name": "ERP"}))).await.unwrap_err();
        assert_eq!(err.to_string(), "systems record with id 42 not found.");

        let err = systems.remove(42).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_remove_then_list_excludes_id() {
        let teams = service(EntityKind::Teams);
        let a = teams.create(&record(json!({"name": "Ana"}))).await.unwrap();
        teams.create(&record(json!({"name": "Beto"}))).await.unwrap();

        let ack = teams.remove(a["id"].as_i64().unwrap()).await.unwrap();
        assert_eq!(ack, Removed { success: true });

        let ids: Vec<i64> = teams.list().await.unwrap().iter().filter_map(|r| r["id"].as_i64()).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let clients = service(EntityKind::Clients);
        for name in ["Zeta", "Alfa", "Mu"] {
            clients.create(&record(json!({ "name": name }))).await.unwrap();
        }

        let names: Vec<String> = clients
            .list()
            .await
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(names, vec!["Alfa", "Mu", "Zeta"]);
    }
}
