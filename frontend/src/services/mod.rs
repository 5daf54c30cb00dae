//! Backend and browser services.
//!
//! # Services
//!
//! - [`api`] - REST calls to the Cadastros API
//! - [`file`] - Reading a user-selected spreadsheet

pub mod api;
pub mod file;

pub use api::*;
pub use file::*;
