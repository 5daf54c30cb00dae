//! Cadastros - Frontend Rust/Leptos Application
//!
//! A WebAssembly client for listing, creating, editing, deleting and
//! bulk-importing teams, systems, clients and statuses.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (API target)                                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── Hero (title, description)                              │
//! │  └── Cadastros                                              │
//! │      ├── EntityTabs + ImportButton                          │
//! │      ├── EntityForm                                         │
//! │      └── EntityTable                                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`entities`] - Per-entity field configuration
//! - [`state`] - View state and its transitions
//! - [`types`] - Common types (Feedback, AppError)
//! - [`components`] - UI components
//! - [`services`] - API gateway and file reading

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use wasm_bindgen::prelude::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod entities;
pub mod state;
pub mod types;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{AppError, AppResult, Feedback, FeedbackLevel};

// State
pub use entities::{entity_config, EntityConfig, FieldConfig, FieldInput};
pub use state::{FormState, SaveRequest, ViewState};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - called automatically by trunk.
#[wasm_bindgen(start)]
pub fn main() {
    // Setup panic hook for better error messages
    console_error_panic_hook::set_once();

    // Setup console logging
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 Cadastros - Starting Leptos App (API: {})", API_BASE_URL);

    // Mount the application
    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text=APP_NAME/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    view! {
        <Header/>

        <div class="container">
            <Hero/>
            <Cadastros/>
        </div>

        <Footer/>
    }
}
