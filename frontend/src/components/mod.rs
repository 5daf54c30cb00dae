//! UI Components for the Cadastros application.
//!
//! # Layout Components
//! - [`Header`] - Top bar with the API target
//! - [`Hero`] - Main title and description
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`Cadastros`] - Page controller (state, API calls)
//! - [`EntityTabs`] - Entity selection
//! - [`EntityForm`] - Create/edit form generated from the entity config
//! - [`EntityTable`] - Records of the selected entity
//! - [`ImportButton`] - Spreadsheet import

use leptos::*;

use crate::state::ViewState;

mod header;
mod hero;
mod cadastros;
mod tabs;
mod form;
mod table;
mod import;
mod footer;

pub use header::*;
pub use hero::*;
pub use cadastros::*;
pub use tabs::*;
pub use form::*;
pub use table::*;
pub use import::*;
pub use footer::*;

/// Replace the whole view state with the result of a transition.
pub(crate) fn apply(state: RwSignal<ViewState>, f: impl FnOnce(ViewState) -> ViewState) {
    state.update(|s| *s = f(std::mem::take(s)));
}
