//! # Cadastros Common - shared entity model, import and API contract
//!
//! Code used by both the HTTP backend and the browser client. Everything here
//! compiles for native targets and for `wasm32-unknown-unknown`.
//!
//! ## Modules
//!
//! - [`entity`] - Entity kinds and storage descriptors
//! - [`record`] - Schemaless JSON records and display helpers
//! - [`import`] - Spreadsheet parsing and row normalization
//! - [`gateway`] - REST client contract and bulk import drivers
//! - [`error`] - Error types

pub mod entity;
pub mod error;
pub mod gateway;
pub mod import;
pub mod record;

// =============================================================================
// Re-exports
// =============================================================================

pub use entity::{EntityDescriptor, EntityKind, UnknownEntity};
pub use error::{GatewayError, GatewayResult, ImportError, ImportResult};
pub use gateway::{import_each, import_fail_fast, ApiGateway, ImportReport, RowFailure};
pub use import::{parse_import, parse_import_file, Sheet, SheetFormat};
pub use record::{color_value, display_value, record_id, Record};
