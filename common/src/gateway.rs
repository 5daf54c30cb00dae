//! Client-side API contract and bulk import drivers.
//!
//! [`ApiGateway`] is the list/create/update/delete surface of the REST API,
//! generic over [`EntityKind`]. The browser client implements it with
//! `gloo-net`, the CLI with `reqwest`.
//!
//! Bulk import issues one create per row, all concurrently:
//!
//! - [`import_each`] waits for every call and reports per-row outcomes.
//! - [`import_fail_fast`] resolves on the first failure. Calls already sent
//!   are not cancelled and rows they created are not rolled back.

use async_trait::async_trait;
use futures::future::{join_all, try_join_all};
use serde::Serialize;

use crate::entity::EntityKind;
use crate::error::{GatewayError, GatewayResult};
use crate::record::Record;

/// REST operations for one deployment of the API.
#[async_trait(?Send)]
pub trait ApiGateway {
    /// `GET /{entity}`
    async fn list(&self, kind: EntityKind) -> GatewayResult<Vec<Record>>;

    /// `POST /{entity}`
    async fn create(&self, kind: EntityKind, payload: &Record) -> GatewayResult<Record>;

    /// `PUT /{entity}/{id}`
    async fn update(&self, kind: EntityKind, id: i64, payload: &Record) -> GatewayResult<Record>;

    /// `DELETE /{entity}/{id}`
    async fn delete(&self, kind: EntityKind, id: i64) -> GatewayResult<()>;
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Rows the server accepted
    pub created: usize,
    /// Rows the server rejected, by position in the parsed payload list
    pub failures: Vec<RowFailure>,
}

/// A rejected import row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowFailure {
    pub index: usize,
    pub error: String,
}

impl ImportReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn total(&self) -> usize {
        self.created + self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Create every row concurrently and collect each outcome.
pub async fn import_each<G>(gateway: &G, kind: EntityKind, rows: &[Record]) -> ImportReport
where
    G: ApiGateway + ?Sized,
{
    let outcomes = join_all(rows.iter().map(|row| gateway.create(kind, row))).await;

    let mut report = ImportReport::default();
    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(_) => report.created += 1,
            Err(e) => report.failures.push(RowFailure {
                index,
                error: e.to_string(),
            }),
        }
    }
    report
}

/// Create every row concurrently; the first failure fails the whole batch.
/// Returns the number of rows on success.
pub async fn import_fail_fast<G>(gateway: &G, kind: EntityKind, rows: &[Record]) -> Result<usize, GatewayError>
where
    G: ApiGateway + ?Sized,
{
    try_join_all(rows.iter().map(|row| gateway.create(kind, row))).await?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::{json, Value};
    use std::cell::RefCell;

    /// Records every create call; rejects payloads named "bad".
    #[derive(Default)]
    struct FakeGateway {
        creates: RefCell<Vec<Record>>,
    }

    #[async_trait(?Send)]
    impl ApiGateway for FakeGateway {
        async fn list(&self, _kind: EntityKind) -> GatewayResult<Vec<Record>> {
            Ok(self.creates.borrow().clone())
        }

        async fn create(&self, _kind: EntityKind, payload: &Record) -> GatewayResult<Record> {
            self.creates.borrow_mut().push(payload.clone());
            if payload.get("name") == Some(&Value::from("bad")) {
                return Err(GatewayError::Status {
                    status: 400,
                    message: "rejected".into(),
                });
            }
            Ok(payload.clone())
        }

        async fn update(&self, _kind: EntityKind, _id: i64, payload: &Record) -> GatewayResult<Record> {
            Ok(payload.clone())
        }

        async fn delete(&self, _kind: EntityKind, _id: i64) -> GatewayResult<()> {
            Ok(())
        }
    }

    fn rows(names: &[&str]) -> Vec<Record> {
        names
            .iter()
            .map(|n| json!({ "name": n }).as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_import_each_all_succeed() {
        let gateway = FakeGateway::default();
        let report = block_on(import_each(&gateway, EntityKind::Teams, &rows(&["Ana", "Beto", "Carla"])));

        assert_eq!(gateway.creates.borrow().len(), 3);
        assert_eq!(report.created, 3);
        assert!(report.is_complete());
    }

    #[test]
    fn test_import_each_reports_failures_individually() {
        let gateway = FakeGateway::default();
        let report = block_on(import_each(&gateway, EntityKind::Teams, &rows(&["Ana", "bad", "Carla"])));

        assert_eq!(gateway.creates.borrow().len(), 3);
        assert_eq!(report.created, 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert_eq!(report.total(), 3);
    }

    #[test]
    fn test_fail_fast_counts_rows() {
        let gateway = FakeGateway::default();
        let count = block_on(import_fail_fast(&gateway, EntityKind::Statuses, &rows(&["a", "b", "c"]))).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_fail_fast_rejects_batch_without_rollback() {
        let gateway = FakeGateway::default();
        let result = block_on(import_fail_fast(&gateway, EntityKind::Statuses, &rows(&["a", "bad", "c"])));

        assert!(matches!(result, Err(GatewayError::Status { status: 400, .. })));
        assert!(gateway.creates.borrow().iter().any(|r| r["name"] == "a"));
    }

    #[test]
    fn test_empty_import() {
        let gateway = FakeGateway::default();
        let report = block_on(import_each(&gateway, EntityKind::Clients, &[]));
        assert_eq!(report.total(), 0);
    }
}
