//! Bouton d'import de planilha (CSV/TSV)

use leptos::*;
use web_sys::{Event, File, HtmlInputElement};

use crate::config::IMPORT_ACCEPT;
use crate::state::ViewState;

#[component]
pub fn ImportButton(state: RwSignal<ViewState>, #[prop(into)] on_file: Callback<File>) -> impl IntoView {
    let on_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);

        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            on_file.call(file);
        }

        // Permet de réimporter le même fichier
        input.set_value("");
    };

    view! {
        <label class="import-button" class:disabled=move || state.with(|s| s.loading)>
            "📥 Importar planilha"
            <input
                type="file"
                accept=IMPORT_ACCEPT
                style="display:none"
                prop:disabled=move || state.with(|s| s.loading)
                on:change=on_change
            />
        </label>
    }
}
