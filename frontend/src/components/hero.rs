//! Hero section component

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"Cadastros"</h1>
            <p class="subtitle">
                "Gerencie equipe, sistemas, clientes e status. "
                "Importe planilhas (CSV) para cadastrar vários registros de uma vez."
            </p>
        </div>
    }
}
