//! HTTP server for the Cadastros API.
//!
//! # API Endpoints
//!
//! | Method | Path                   | Description                        |
//! |--------|------------------------|------------------------------------|
//! | GET    | `/health`              | Health check                       |
//! | GET    | `/api/{entity}`        | List records ordered by name       |
//! | POST   | `/api/{entity}`        | Create a record (201)              |
//! | PUT    | `/api/{entity}/{id}`   | Replace every column of a record   |
//! | DELETE | `/api/{entity}/{id}`   | Delete a record                    |
//!
//! `{entity}` is one of `teams`, `systems`, `clients`, `statuses`. The list
//! and create routes also answer with a trailing slash. Anything else is a
//! 404 `{"message": "Resource not found"}`.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    response::Json,
    routing::{any, get, put, MethodRouter},
    Router,
};
use cadastros_common::EntityKind;
use std::future::Future;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use super::types::HealthResponse;
use crate::config::ServeConfig;
use crate::crud::{controller, CrudService};
use crate::error::{panic_response, ServerError, ServerResult};
use crate::store::{MemoryStore, PgStore, RecordStore};

/// Request bodies above this size are rejected.
const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

fn collection_routes() -> MethodRouter<CrudService> {
    get(controller::list)
        .post(controller::create)
        .fallback(controller::route_not_found)
}

fn member_routes() -> MethodRouter<CrudService> {
    put(controller::update)
        .delete(controller::remove)
        .fallback(controller::route_not_found)
}

/// Routes of one entity namespace, bound to its service.
pub fn entity_router(service: CrudService) -> Router {
    let base = format!("/api/{}", service.descriptor().table);

    Router::new()
        .route(&base, collection_routes())
        .route(&format!("{base}/"), collection_routes())
        .route(&format!("{base}/{{id}}"), member_routes())
        .with_state(service)
}

fn cors_layer(config: &ServeConfig) -> CorsLayer {
    let origin = match config.cors_origins() {
        None => AllowOrigin::from(Any),
        Some(origins) => {
            let values: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        tracing::warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                        None
                    }
                })
                .collect();
            AllowOrigin::list(values)
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE])
}

/// Full application router over a record store.
pub fn build_router(store: Arc<dyn RecordStore>, config: &ServeConfig) -> Router {
    let mut app = Router::new().route("/health", get(health));

    for kind in EntityKind::ALL {
        app = app.merge(entity_router(CrudService::for_kind(kind, store.clone())));
    }

    app = match &config.static_dir {
        Some(dir) => {
            // Unknown API paths stay JSON 404s; everything else is the web client.
            let index = dir.join("index.html");
            app.route("/api", any(controller::route_not_found))
                .route("/api/{*rest}", any(controller::route_not_found))
                .fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => app.fallback(controller::route_not_found),
    };

    app.layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors_layer(config))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Build the store the configuration asks for and check that it answers.
pub async fn open_store(config: &ServeConfig) -> ServerResult<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = if config.in_memory {
        tracing::warn!("Using the in-memory record store; data is lost on shutdown");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(PgStore::connect(&config.database_settings()?).await?)
    };

    store.ping().await.map_err(ServerError::from)?;
    Ok(store)
}

/// Wait for SIGTERM or Ctrl+C.
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down gracefully..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down gracefully..."),
    }
}

/// Serve until `shutdown` resolves, then close the store.
pub async fn serve<F>(store: Arc<dyn RecordStore>, config: &ServeConfig, shutdown: F) -> ServerResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(store.clone(), config);
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("🚀 Cadastros server running on http://localhost:{}", config.port);
    for kind in EntityKind::ALL {
        tracing::info!("   /api/{}", kind);
    }
    if let Some(dir) = &config.static_dir {
        tracing::info!("   Serving web client from {}", dir.display());
    }

    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

    tracing::info!("Closing record store...");
    store.close().await;
    Ok(())
}

/// Open the configured store, then serve until SIGTERM/Ctrl+C.
pub async fn start_server(config: ServeConfig) -> ServerResult<()> {
    let store = open_store(&config).await?;
    serve(store, &config, shutdown_signal()).await
}
