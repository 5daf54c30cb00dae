//! # Cadastros - generic CRUD administration backend
//!
//! REST API over four parallel entity collections (teams, systems, clients,
//! statuses). Every collection is served by the same generic service,
//! instantiated from a static entity descriptor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Router    │────▶│ Controller  │────▶│ CrudService │────▶│ RecordStore │
//! │ /api/{kind} │     │ (per kind)  │     │ (per kind)  │     │  (PG / mem) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cadastros::{start_server, ServeConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServeConfig { in_memory: true, ..ServeConfig::default() };
//!     start_server(config).await.unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Store, API and server error types
//! - [`store`] - Record stores (PostgreSQL, in-memory)
//! - [`crud`] - Descriptor-driven service and handlers
//! - [`api`] - Router and server lifecycle
//! - [`config`] - Server configuration
//! - [`client`] - `reqwest` implementation of the API gateway

// Core modules
pub mod config;
pub mod error;

// Storage
pub mod store;

// CRUD
pub mod crud;

// HTTP API
pub mod api;

// API client
pub mod client;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ApiError, ApiResult, ServerError, ServerResult, StoreError, StoreResult};

// =============================================================================
// Re-exports - Stores
// =============================================================================

pub use store::{DatabaseSettings, MemoryStore, Param, PgStore, RecordStore, Statement, StatementKind};

// =============================================================================
// Re-exports - CRUD
// =============================================================================

pub use crud::{CrudService, Removed};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::{build_router, open_store, serve, shutdown_signal, start_server, HealthResponse};
pub use client::HttpGateway;
pub use config::ServeConfig;
