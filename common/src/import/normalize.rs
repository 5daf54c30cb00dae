//! Row normalization from spreadsheet headers to entity payloads.
//!
//! Each entity has a static header table. A field is looked up under its
//! localized header first; the English header is consulted only when the
//! localized column does not exist in the sheet.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::parser::{ImportRow, Sheet};
use crate::entity::EntityKind;
use crate::record::Record;

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#([0-9a-fA-F]{3}){1,2}$").expect("Invalid hex colour pattern"));

/// How a cell value is cleaned before it becomes a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    Text,
    Phone,
    Color,
}

/// Mapping from sheet headers to one entity field.
#[derive(Debug, Clone, Copy)]
pub struct HeaderMapping {
    pub field: &'static str,
    pub localized: &'static str,
    pub english: &'static str,
    pub normalization: Normalization,
}

const fn map(field: &'static str, localized: &'static str, normalization: Normalization) -> HeaderMapping {
    HeaderMapping {
        field,
        localized,
        english: field,
        normalization,
    }
}

const NAME: HeaderMapping = map("name", "Nome", Normalization::Text);
const EMAIL: HeaderMapping = map("email", "Email", Normalization::Text);
const PHONE: HeaderMapping = map("phone", "Telefone", Normalization::Phone);

const TEAM_HEADERS: &[HeaderMapping] = &[NAME, EMAIL, PHONE, map("role", "Função", Normalization::Text)];
const SYSTEM_HEADERS: &[HeaderMapping] = &[NAME, map("description", "Descrição", Normalization::Text)];
const CLIENT_HEADERS: &[HeaderMapping] = &[NAME, EMAIL, PHONE, map("company", "Empresa", Normalization::Text)];
const STATUS_HEADERS: &[HeaderMapping] = &[NAME, map("color", "Cor", Normalization::Color)];

/// Header table for an entity. The first entry is always `name`.
pub fn header_mappings(kind: EntityKind) -> &'static [HeaderMapping] {
    match kind {
        EntityKind::Teams => TEAM_HEADERS,
        EntityKind::Systems => SYSTEM_HEADERS,
        EntityKind::Clients => CLIENT_HEADERS,
        EntityKind::Statuses => STATUS_HEADERS,
    }
}

/// Trimmed text, or `None` when blank.
pub fn normalize_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Digits only, or `None` when no digit remains.
pub fn normalize_phone(value: &str) -> Option<String> {
    let digits: String = normalize_text(value)?.chars().filter(char::is_ascii_digit).collect();
    (!digits.is_empty()).then_some(digits)
}

/// `#`-prefixed 3- or 6-digit hex colour, or `None` when invalid.
pub fn normalize_color(value: &str) -> Option<String> {
    let text = normalize_text(value)?;
    let hex = if text.starts_with('#') { text } else { format!("#{text}") };
    HEX_COLOR.is_match(&hex).then_some(hex)
}

fn apply(normalization: Normalization, value: &str) -> Option<String> {
    match normalization {
        Normalization::Text => normalize_text(value),
        Normalization::Phone => normalize_phone(value),
        Normalization::Color => normalize_color(value),
    }
}

fn lookup<'a>(row: &'a ImportRow, mapping: &HeaderMapping) -> Option<&'a str> {
    row.get(mapping.localized)
        .or_else(|| row.get(mapping.english))
        .map(String::as_str)
}

/// Map one sheet row to a create payload. Returns `None` when the row has no
/// usable name; absent or invalid optional fields are left out.
pub fn normalize_row(kind: EntityKind, row: &ImportRow) -> Option<Record> {
    let mut record = Record::new();

    for mapping in header_mappings(kind) {
        let value = lookup(row, mapping).and_then(|raw| apply(mapping.normalization, raw));
        match value {
            Some(v) => {
                record.insert(mapping.field.to_string(), Value::String(v));
            }
            None if mapping.field == "name" => return None,
            None => {}
        }
    }

    Some(record)
}

/// Normalize every row of a sheet, silently dropping rows without a name.
pub fn normalize_sheet(kind: EntityKind, sheet: &Sheet) -> Vec<Record> {
    sheet.rows.iter().filter_map(|row| normalize_row(kind, row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parser::SheetFormat;
    use serde_json::json;

    fn row(pairs: &[(&str, &str)]) -> ImportRow {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_localized_team_row() {
        let r = row(&[("Nome", "Ana"), ("Telefone", "(11) 98888-7777")]);
        let record = normalize_row(EntityKind::Teams, &r).unwrap();

        assert_eq!(Value::Object(record), json!({"name": "Ana", "phone": "11988887777"}));
    }

    #[test]
    fn test_english_headers_fallback() {
        let r = row(&[("name", " Acme "), ("company", "Acme Ltda"), ("email", "")]);
        let record = normalize_row(EntityKind::Clients, &r).unwrap();

        assert_eq!(Value::Object(record), json!({"name": "Acme", "company": "Acme Ltda"}));
    }

    #[test]
    fn test_present_localized_column_wins_even_when_empty() {
        let r = row(&[("Nome", ""), ("name", "Ana")]);
        assert!(normalize_row(EntityKind::Teams, &r).is_none());
    }

    #[test]
    fn test_blank_name_dropped() {
        for kind in EntityKind::ALL {
            assert!(normalize_row(kind, &row(&[("Nome", "   ")])).is_none());
            assert!(normalize_row(kind, &row(&[("Email", "a@b.c")])).is_none());
        }
    }

    #[test]
    fn test_color_normalization() {
        assert_eq!(normalize_color("abc").as_deref(), Some("#abc"));
        assert_eq!(normalize_color("#A1B2C3").as_deref(), Some("#A1B2C3"));
        assert_eq!(normalize_color("zzz"), None);
        assert_eq!(normalize_color("#abcd"), None);
        assert_eq!(normalize_color("  "), None);
    }

    #[test]
    fn test_status_with_invalid_color_keeps_name_only() {
        let r = row(&[("Nome", "Aberto"), ("Cor", "zzz")]);
        let record = normalize_row(EntityKind::Statuses, &r).unwrap();
        assert_eq!(Value::Object(record), json!({"name": "Aberto"}));

        let r = row(&[("Nome", "Fechado"), ("Cor", "abc")]);
        let record = normalize_row(EntityKind::Statuses, &r).unwrap();
        assert_eq!(record["color"], "#abc");
    }

    #[test]
    fn test_phone_without_digits_is_absent() {
        assert_eq!(normalize_phone("n/a"), None);
        assert_eq!(normalize_phone("+55 (11) 4000-0000").as_deref(), Some("551140000000"));
    }

    #[test]
    fn test_system_description() {
        let r = row(&[("Nome", "ERP"), ("Descrição", "  Financeiro  ")]);
        let record = normalize_row(EntityKind::Systems, &r).unwrap();
        assert_eq!(record["description"], "Financeiro");
    }

    #[test]
    fn test_normalize_sheet_drops_unnamed_rows() {
        let sheet = Sheet {
            headers: vec!["Nome".into(), "Função".into()],
            rows: vec![
                row(&[("Nome", "Ana"), ("Função", "Dev")]),
                row(&[("Nome", ""), ("Função", "QA")]),
                row(&[("Nome", "Beto"), ("Função", "")]),
            ],
            format: SheetFormat::Delimited {
                encoding: "utf-8".into(),
                delimiter: ';',
            },
        };

        let records = normalize_sheet(EntityKind::Teams, &sheet);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["role"], "Dev");
        assert!(!records[1].contains_key("role"));
    }
}
