//! Spreadsheet import through a live listener, the way `cadastros import` runs.

use cadastros::{build_router, HttpGateway, MemoryStore, ServeConfig};
use cadastros_common::{import_each, import_fail_fast, parse_import_file, ApiGateway, EntityKind, GatewayError};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

async fn spawn_server() -> String {
    let app = build_router(Arc::new(MemoryStore::new()), &ServeConfig::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/api")
}

fn sheet(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_import_three_of_four_rows() {
    let gateway = HttpGateway::new(spawn_server().await);
    let file = sheet(
        "Nome;Email;Telefone;Empresa\n\
         Ana;ana@example.com;(11) 98888-7777;Acme\n\
         ;ghost@example.com;;\n\
         Bruno;;;Globex\n\
         Carla;carla@example.com;+55 21 3333-4444;\n",
    );

    let rows = parse_import_file(file.path(), EntityKind::Clients).unwrap();
    assert_eq!(rows.len(), 3);

    let report = import_each(&gateway, EntityKind::Clients, &rows).await;
    assert_eq!(report.created, 3);
    assert!(report.is_complete());

    let stored = gateway.list(EntityKind::Clients).await.unwrap();
    assert_eq!(stored.len(), 3);
    let ana = stored.iter().find(|r| r["name"] == "Ana").unwrap();
    assert_eq!(ana["phone"], "11988887777");
}

#[tokio::test]
async fn test_import_statuses_with_colors() {
    let gateway = HttpGateway::new(spawn_server().await);
    let file = sheet("name,color\nAberto,abc\nFechado,zzz\n");

    let rows = parse_import_file(file.path(), EntityKind::Statuses).unwrap();
    let created = import_fail_fast(&gateway, EntityKind::Statuses, &rows).await.unwrap();
    assert_eq!(created, 2);

    let stored = gateway.list(EntityKind::Statuses).await.unwrap();
    assert_eq!(stored[0]["color"], "#abc");
    assert!(stored[1]["color"].is_null());
}

#[tokio::test]
async fn test_gateway_reports_server_errors() {
    let gateway = HttpGateway::new(spawn_server().await);

    let err = gateway.delete(EntityKind::Teams, 99).await.unwrap_err();
    match err {
        GatewayError::Status { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "teams record with id 99 not found.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
