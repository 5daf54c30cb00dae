//! Page Cadastros: sélection d'entité, formulaire, liste et import.
//!
//! Toute la logique d'état est dans [`ViewState`]; ce composant ne fait que
//! lancer les appels API et appliquer les transitions.

use cadastros_common::{import_each, parse_import, record_id, ApiGateway, EntityKind, ImportReport, Record};
use leptos::*;
use web_sys::File;

use super::{apply, EntityForm, EntityTable, EntityTabs, ImportButton};
use crate::services::{read_file_bytes, ApiService};
use crate::state::{SaveRequest, ViewState};
use crate::types::AppResult;

/// Apply `f` only if `kind` is still the selected entity. Returns whether
/// it was applied.
fn settle(state: RwSignal<ViewState>, kind: EntityKind, f: impl FnOnce(ViewState) -> ViewState) -> bool {
    let current = state.with_untracked(|s| s.kind) == kind;
    if current {
        apply(state, f);
    }
    current
}

/// Charge la liste de `kind`
fn load(state: RwSignal<ViewState>, kind: EntityKind) {
    apply(state, |s| s.load_started(kind));

    spawn_local(async move {
        match ApiService::default().list(kind).await {
            Ok(items) => {
                log::info!("📋 {} {} loaded", items.len(), kind);
                apply(state, |s| s.loaded(kind, items));
            }
            Err(e) => {
                log::error!("Failed to load data: {}", e);
                apply(state, |s| s.load_failed(kind));
            }
        }
    });
}

async fn import_file(file: &File, kind: EntityKind) -> AppResult<ImportReport> {
    let bytes = read_file_bytes(file).await?;
    let rows = parse_import(&bytes, kind)?;
    log::info!("📥 {} rows parsed from {}", rows.len(), file.name());

    let report = import_each(&ApiService::default(), kind, &rows).await;
    for failure in &report.failures {
        log::warn!("Row {} rejected: {}", failure.index + 1, failure.error);
    }
    Ok(report)
}

#[component]
pub fn Cadastros() -> impl IntoView {
    let state = create_rw_signal(ViewState::default());
    load(state, state.with_untracked(|s| s.kind));

    let on_select = move |kind: EntityKind| {
        if let Some(next) = state.with_untracked(|s| s.select(kind)) {
            state.set(next);
            load(state, kind);
        }
    };

    let on_submit = move |_: ()| {
        let kind = state.with_untracked(|s| s.kind);
        let request = match state.get_untracked().submit() {
            Ok((next, request)) => {
                state.set(next);
                request
            }
            Err(rejected) => {
                state.set(rejected);
                return;
            }
        };

        spawn_local(async move {
            let api = ApiService::default();
            let (result, was_update) = match &request {
                SaveRequest::Create(payload) => (api.create(kind, payload).await, false),
                SaveRequest::Update(id, payload) => (api.update(kind, *id, payload).await, true),
            };

            match result {
                Ok(_) => {
                    if settle(state, kind, |s| s.saved(was_update)) {
                        load(state, kind);
                    }
                }
                Err(e) => {
                    log::error!("Failed to persist entity: {}", e);
                    settle(state, kind, ViewState::save_failed);
                }
            }
        });
    };

    let on_edit = move |item: Record| apply(state, |s| s.edit(&item));

    let on_cancel = move |_: ()| apply(state, ViewState::cancel_edit);

    let on_remove = move |item: Record| {
        let Some(id) = record_id(&item) else {
            return;
        };
        let kind = state.with_untracked(|s| s.kind);

        spawn_local(async move {
            match ApiService::default().delete(kind, id).await {
                Ok(()) => {
                    if settle(state, kind, ViewState::removed) {
                        load(state, kind);
                    }
                }
                Err(e) => {
                    log::error!("Failed to delete entity: {}", e);
                    settle(state, kind, ViewState::remove_failed);
                }
            }
        });
    };

    let on_import = move |file: File| {
        let kind = state.with_untracked(|s| s.kind);
        apply(state, ViewState::import_started);

        spawn_local(async move {
            match import_file(&file, kind).await {
                Ok(report) => {
                    if settle(state, kind, |s| s.imported(&report)) && report.created > 0 {
                        load(state, kind);
                    }
                }
                Err(e) => {
                    log::error!("Failed to import data: {}", e);
                    settle(state, kind, ViewState::import_failed);
                }
            }
        });
    };

    view! {
        <section class="cadastros">
            <EntityTabs state=state on_select=on_select/>

            <div class="toolbar">
                <h2>{move || state.with(|s| s.config().title)}</h2>
                <ImportButton state=state on_file=on_import/>
            </div>

            {move || {
                state.with(|s| {
                    s.feedback.clone().map(|feedback| view! {
                        <div class=format!("feedback {}", feedback.level.css_class())>
                            {feedback.message}
                        </div>
                    })
                })
            }}

            <div class="cadastros-grid">
                <EntityForm state=state on_submit=on_submit on_cancel=on_cancel/>

                <div class="list-panel">
                    <Show when=move || state.with(|s| s.loading)>
                        <div class="loading">"⏳ Carregando..."</div>
                    </Show>
                    <EntityTable state=state on_edit=on_edit on_remove=on_remove/>
                </div>
            </div>
        </section>
    }
}
