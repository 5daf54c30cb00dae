//! Entity selection tabs

use cadastros_common::EntityKind;
use leptos::*;

use crate::entities::entity_config;
use crate::state::ViewState;

#[component]
pub fn EntityTabs(
    state: RwSignal<ViewState>,
    #[prop(into)] on_select: Callback<EntityKind>,
) -> impl IntoView {
    view! {
        <nav class="entity-tabs">
            {EntityKind::ALL
                .into_iter()
                .map(|kind| {
                    view! {
                        <button
                            type="button"
                            class="tab"
                            class:active=move || state.with(|s| s.kind == kind)
                            on:click=move |_| on_select.call(kind)
                        >
                            {entity_config(kind).title}
                        </button>
                    }
                })
                .collect_view()}
        </nav>
    }
}
