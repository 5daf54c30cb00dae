//! Formulaire de création / édition, généré depuis la config de l'entité

use leptos::*;

use super::apply;
use crate::entities::{entity_config, FieldConfig};
use crate::state::ViewState;

#[component]
pub fn EntityForm(
    state: RwSignal<ViewState>,
    #[prop(into)] on_submit: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let heading = move || {
        state.with(|s| {
            if s.is_editing() {
                format!("Editar {}", s.config().title)
            } else {
                format!("Novo registro: {}", s.config().title)
            }
        })
    };

    // Ne reconstruit les champs que quand l'entité change
    let kind = create_memo(move |_| state.with(|s| s.kind));

    let on_form_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        on_submit.call(());
    };

    view! {
        <form class="entity-form" novalidate=true on:submit=on_form_submit>
            <h3>{heading}</h3>

            {move || {
                entity_config(kind.get())
                    .fields
                    .iter()
                    .map(|field| view! { <FormField state=state field=field/> })
                    .collect_view()
            }}

            <div class="form-actions">
                <button type="submit" class="btn-primary">
                    {move || if state.with(|s| s.is_editing()) { "Atualizar" } else { "Salvar" }}
                </button>
                <Show
                    when=move || state.with(|s| s.is_editing())
                    fallback=move || view! {
                        <button type="button" class="btn-secondary" on:click=move |_| on_cancel.call(())>
                            "Limpar"
                        </button>
                    }
                >
                    <button type="button" class="btn-secondary" on:click=move |_| on_cancel.call(())>
                        "Cancelar edição"
                    </button>
                </Show>
            </div>
        </form>
    }
}

#[component]
fn FormField(state: RwSignal<ViewState>, field: &'static FieldConfig) -> impl IntoView {
    let key = field.key;
    let error = move || state.with(|s| if s.form.touched { s.form.error(key) } else { None });

    let on_input = move |ev: ev::Event| {
        let value = event_target_value(&ev);
        apply(state, |s| s.with_field(key, value));
    };

    view! {
        <label class="form-field" class:invalid=move || error().is_some()>
            <span class="field-label">
                {field.label}
                {field.required.then_some(" *")}
            </span>
            <input
                type=field.input.html_type()
                name=key
                prop:value=move || state.with(|s| s.form.value(key).to_string())
                on:input=on_input
            />
            {move || error().map(|message| view! { <span class="field-error">{message}</span> })}
        </label>
    }
}
