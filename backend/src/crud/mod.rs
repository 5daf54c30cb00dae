//! Descriptor-driven CRUD: one [`CrudService`] and one set of controller
//! handlers per entity namespace.

pub mod controller;
pub mod service;

pub use controller::parse_id;
pub use service::{CrudService, Removed};
