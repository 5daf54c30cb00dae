//! Per-entity form and table configuration.
//!
//! Field order, labels and input types drive both the form and the table
//! columns. Field keys are the entity's declared columns.

use cadastros_common::EntityKind;

/// Input control of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldInput {
    Text,
    Email,
    Color,
}

impl FieldInput {
    /// HTML `type` attribute.
    pub fn html_type(&self) -> &'static str {
        match self {
            FieldInput::Text => "text",
            FieldInput::Email => "email",
            FieldInput::Color => "color",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldConfig {
    pub key: &'static str,
    pub label: &'static str,
    pub input: FieldInput,
    pub required: bool,
}

impl FieldConfig {
    const fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            input: FieldInput::Text,
            required: false,
        }
    }

    const fn with_input(mut self, input: FieldInput) -> Self {
        self.input = input;
        self
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityConfig {
    /// Tab and section title
    pub title: &'static str,
    /// Shown when the list is empty
    pub empty_message: &'static str,
    pub fields: &'static [FieldConfig],
}

impl EntityConfig {
    pub fn field(&self, key: &str) -> Option<&'static FieldConfig> {
        self.fields.iter().find(|f| f.key == key)
    }
}

static TEAMS: EntityConfig = EntityConfig {
    title: "Equipe",
    empty_message: "Cadastre integrantes da equipe para organizar responsabilidades.",
    fields: &[
        FieldConfig::text("name", "Nome").required(),
        FieldConfig::text("email", "Email").with_input(FieldInput::Email),
        FieldConfig::text("phone", "Telefone"),
        FieldConfig::text("role", "Função"),
    ],
};

static SYSTEMS: EntityConfig = EntityConfig {
    title: "Sistemas",
    empty_message: "Cadastre os sistemas disponíveis para vincular aos projetos.",
    fields: &[
        FieldConfig::text("name", "Nome").required(),
        FieldConfig::text("description", "Descrição"),
    ],
};

static CLIENTS: EntityConfig = EntityConfig {
    title: "Clientes",
    empty_message: "Cadastre clientes para associar projetos e acompanhamentos.",
    fields: &[
        FieldConfig::text("name", "Nome").required(),
        FieldConfig::text("email", "Email").with_input(FieldInput::Email),
        FieldConfig::text("phone", "Telefone"),
        FieldConfig::text("company", "Empresa"),
    ],
};

static STATUSES: EntityConfig = EntityConfig {
    title: "Status",
    empty_message: "Cadastre status personalizados para acompanhar os projetos.",
    fields: &[
        FieldConfig::text("name", "Nome").required(),
        FieldConfig::text("color", "Cor (hex)").with_input(FieldInput::Color),
    ],
};

pub fn entity_config(kind: EntityKind) -> &'static EntityConfig {
    match kind {
        EntityKind::Teams => &TEAMS,
        EntityKind::Systems => &SYSTEMS,
        EntityKind::Clients => &CLIENTS,
        EntityKind::Statuses => &STATUSES,
    }
}
