//! Records table of the selected entity

use cadastros_common::{color_value, display_value, Record};
use leptos::*;

use crate::entities::{FieldConfig, FieldInput};
use crate::state::ViewState;

#[component]
pub fn EntityTable(
    state: RwSignal<ViewState>,
    #[prop(into)] on_edit: Callback<Record>,
    #[prop(into)] on_remove: Callback<Record>,
) -> impl IntoView {
    view! {
        <Show
            when=move || state.with(|s| !s.items.is_empty())
            fallback=move || view! {
                <p class="empty-message">{move || state.with(|s| s.config().empty_message)}</p>
            }
        >
            <table class="entity-table">
                <thead>
                    <tr>
                        {move || {
                            state.with(|s| {
                                s.config()
                                    .fields
                                    .iter()
                                    .map(|f| view! { <th>{f.label}</th> })
                                    .collect_view()
                            })
                        }}
                        <th class="actions">"Ações"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        state.with(|s| {
                            let fields = s.config().fields;
                            s.items
                                .iter()
                                .cloned()
                                .map(|item| view! {
                                    <RecordRow fields=fields item=item on_edit=on_edit on_remove=on_remove/>
                                })
                                .collect_view()
                        })
                    }}
                </tbody>
            </table>
        </Show>
    }
}

#[component]
fn RecordRow(
    fields: &'static [FieldConfig],
    item: Record,
    on_edit: Callback<Record>,
    on_remove: Callback<Record>,
) -> impl IntoView {
    let cells = fields
        .iter()
        .map(|field| {
            let text = display_value(&item, field.key);
            if field.input == FieldInput::Color {
                let swatch = format!("background-color: {}", color_value(&item, field.key));
                view! {
                    <td>
                        <span class="swatch" style=swatch></span>
                        {text}
                    </td>
                }
            } else {
                view! { <td>{text}</td> }
            }
        })
        .collect_view();

    let edit_item = item.clone();
    let remove_item = item;

    view! {
        <tr>
            {cells}
            <td class="actions">
                <button type="button" class="btn-link" on:click=move |_| on_edit.call(edit_item.clone())>
                    "Editar"
                </button>
                <button type="button" class="btn-link danger" on:click=move |_| on_remove.call(remove_item.clone())>
                    "Remover"
                </button>
            </td>
        </tr>
    }
}
