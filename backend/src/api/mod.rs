//! HTTP API module.
//!
//! This module provides the router, server lifecycle and non-record response
//! types of the Cadastros backend.

pub mod server;
pub mod types;

pub use server::{build_router, entity_router, open_store, serve, shutdown_signal, start_server};
pub use types::HealthResponse;
