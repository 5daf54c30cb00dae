//! View state of the Cadastros page.
//!
//! [`ViewState`] is one plain value. Every user action or API outcome is a
//! method that consumes the current state and returns the next one, so the
//! component only ever replaces the whole value.

use cadastros_common::{record_id, EntityKind, ImportReport, Record};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::entities::{entity_config, EntityConfig, FieldInput};
use crate::types::Feedback;

// =============================================================================
// Messages
// =============================================================================

pub const MSG_LOAD_FAILED: &str = "Não foi possível carregar os dados. Verifique a API.";
pub const MSG_CREATED: &str = "Registro criado com sucesso.";
pub const MSG_UPDATED: &str = "Registro atualizado com sucesso.";
pub const MSG_SAVE_FAILED: &str = "Não foi possível salvar o registro. Verifique os dados e a API.";
pub const MSG_REMOVED: &str = "Registro removido com sucesso.";
pub const MSG_REMOVE_FAILED: &str = "Não foi possível remover o registro.";
pub const MSG_IMPORT_FAILED: &str = "Não foi possível importar o arquivo. Confira o formato e tente novamente.";

pub const MSG_REQUIRED: &str = "Campo obrigatório.";
pub const MSG_INVALID_EMAIL: &str = "Informe um email válido.";

fn imported_message(report: &ImportReport) -> Feedback {
    if report.is_complete() {
        Feedback::success(format!("{} registros importados com sucesso.", report.created))
    } else {
        Feedback::error(format!(
            "{} registros importados; {} não puderam ser salvos.",
            report.created,
            report.failed()
        ))
    }
}

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("Invalid email pattern")
});

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

// =============================================================================
// Form
// =============================================================================

/// Values of the form for one entity kind, in field order.
#[derive(Clone, Debug, PartialEq)]
pub struct FormState {
    kind: EntityKind,
    values: Vec<(&'static str, String)>,
    /// Set on a rejected submit; errors are only shown once touched.
    pub touched: bool,
}

impl FormState {
    pub fn empty(kind: EntityKind) -> Self {
        let values = Self::config_of(kind).fields.iter().map(|f| (f.key, String::new())).collect();
        Self {
            kind,
            values,
            touched: false,
        }
    }

    /// Form filled from a stored record. Null and missing values become "".
    pub fn from_record(kind: EntityKind, record: &Record) -> Self {
        let mut form = Self::empty(kind);
        for (key, value) in form.values.iter_mut() {
            *value = match record.get(*key) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            };
        }
        form
    }

    fn config_of(kind: EntityKind) -> &'static EntityConfig {
        entity_config(kind)
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn value(&self, key: &str) -> &str {
        self.values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or_default()
    }

    pub fn set(&mut self, key: &str, value: String) {
        if let Some((_, slot)) = self.values.iter_mut().find(|(k, _)| *k == key) {
            *slot = value;
        }
    }

    /// Validation message of a field, if any.
    pub fn error(&self, key: &str) -> Option<&'static str> {
        let field = Self::config_of(self.kind).field(key)?;
        let value = self.value(key);

        if field.required && value.trim().is_empty() {
            return Some(MSG_REQUIRED);
        }
        if field.input == FieldInput::Email && !value.is_empty() && !is_valid_email(value) {
            return Some(MSG_INVALID_EMAIL);
        }
        None
    }

    pub fn is_valid(&self) -> bool {
        self.values.iter().all(|(key, _)| self.error(key).is_none())
    }

    /// Raw form values, empty fields included as "".
    pub fn payload(&self) -> Record {
        self.values
            .iter()
            .map(|(key, value)| (key.to_string(), Value::String(value.clone())))
            .collect()
    }
}

// =============================================================================
// Page
// =============================================================================

/// Network call requested by a valid submit.
#[derive(Clone, Debug, PartialEq)]
pub enum SaveRequest {
    Create(Record),
    Update(i64, Record),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub kind: EntityKind,
    pub items: Vec<Record>,
    pub loading: bool,
    pub feedback: Option<Feedback>,
    pub form: FormState,
    /// `None` in create mode
    pub editing_id: Option<i64>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(EntityKind::Teams)
    }
}

impl ViewState {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
            loading: false,
            feedback: None,
            form: FormState::empty(kind),
            editing_id: None,
        }
    }

    pub fn config(&self) -> &'static EntityConfig {
        entity_config(self.kind)
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    /// Switch entity: fresh form, empty list, load pending. `None` when
    /// `kind` is already selected.
    pub fn select(&self, kind: EntityKind) -> Option<Self> {
        if self.kind == kind {
            return None;
        }
        Some(Self {
            loading: true,
            ..Self::new(kind)
        })
    }

    /// List request sent. A request for another kind than the selected one
    /// leaves the state untouched, since its answer will be dropped.
    pub fn load_started(self, kind: EntityKind) -> Self {
        if kind != self.kind {
            return self;
        }
        Self { loading: true, ..self }
    }

    /// List arrived. A list for another kind than the selected one is stale
    /// and dropped.
    pub fn loaded(self, kind: EntityKind, items: Vec<Record>) -> Self {
        if kind != self.kind {
            return self;
        }
        Self {
            items,
            loading: false,
            ..self
        }
    }

    pub fn load_failed(self, kind: EntityKind) -> Self {
        if kind != self.kind {
            return self;
        }
        Self {
            items: Vec::new(),
            loading: false,
            feedback: Some(Feedback::error(MSG_LOAD_FAILED)),
            ..self
        }
    }

    pub fn with_field(mut self, key: &str, value: String) -> Self {
        self.form.set(key, value);
        self
    }

    /// Submit the form. An invalid form comes back marked as touched and no
    /// request is made.
    pub fn submit(self) -> Result<(Self, SaveRequest), Self> {
        if !self.form.is_valid() {
            let mut form = self.form;
            form.touched = true;
            return Err(Self { form, ..self });
        }

        let payload = self.form.payload();
        let request = match self.editing_id {
            Some(id) => SaveRequest::Update(id, payload),
            None => SaveRequest::Create(payload),
        };
        Ok((self, request))
    }

    /// Save succeeded: back to create mode, list reload pending.
    pub fn saved(self, was_update: bool) -> Self {
        let message = if was_update { MSG_UPDATED } else { MSG_CREATED };
        Self {
            form: FormState::empty(self.kind),
            editing_id: None,
            feedback: Some(Feedback::success(message)),
            loading: true,
            ..self
        }
    }

    pub fn save_failed(self) -> Self {
        Self {
            feedback: Some(Feedback::error(MSG_SAVE_FAILED)),
            ..self
        }
    }

    /// Load a record into the form and enter edit mode.
    pub fn edit(self, record: &Record) -> Self {
        Self {
            form: FormState::from_record(self.kind, record),
            editing_id: record_id(record),
            feedback: None,
            ..self
        }
    }

    /// Back to create mode with an empty form. Also used for "new record".
    pub fn cancel_edit(self) -> Self {
        Self {
            form: FormState::empty(self.kind),
            editing_id: None,
            ..self
        }
    }

    pub fn removed(self) -> Self {
        Self {
            feedback: Some(Feedback::success(MSG_REMOVED)),
            loading: true,
            ..self
        }
    }

    pub fn remove_failed(self) -> Self {
        Self {
            feedback: Some(Feedback::error(MSG_REMOVE_FAILED)),
            ..self
        }
    }

    pub fn import_started(self) -> Self {
        Self {
            loading: true,
            feedback: None,
            ..self
        }
    }

    /// Import finished; the list is reloaded whenever anything was created.
    pub fn imported(self, report: &ImportReport) -> Self {
        Self {
            feedback: Some(imported_message(report)),
            loading: report.created > 0,
            ..self
        }
    }

    pub fn import_failed(self) -> Self {
        Self {
            feedback: Some(Feedback::error(MSG_IMPORT_FAILED)),
            loading: false,
            ..self
        }
    }
}
