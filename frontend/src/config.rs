//! Application configuration.
//!
//! Values are fixed at compile time; set `CADASTROS_API_URL` when building to
//! point the client at another API.

/// API base URL.
///
/// Defaults to `/api`, served by the same origin as the page.
pub const API_BASE_URL: &str = match option_env!("CADASTROS_API_URL") {
    Some(url) => url,
    None => "/api",
};

/// Application name, used for the document title.
pub const APP_NAME: &str = "Cadastros";

/// Maximum spreadsheet size for import (in bytes).
///
/// 10 MB limit.
pub const MAX_IMPORT_SIZE: usize = 10 * 1024 * 1024;

/// Accepted spreadsheets: workbooks and text exports.
pub const IMPORT_ACCEPT: &str = ".xlsx,.xls,.ods,.csv,.tsv,.txt";
