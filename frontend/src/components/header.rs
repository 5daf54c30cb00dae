use leptos::*;

use crate::config::{API_BASE_URL, APP_NAME};

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header>
            <div class="header-left">
                <a href="/" class="logo">{APP_NAME.to_uppercase()}</a>
                <span class="badge">"Administração"</span>
            </div>
            <div class="header-right">
                <span class="api-target" title="API">
                    "API: " {API_BASE_URL}
                </span>
            </div>
        </header>
    }
}
