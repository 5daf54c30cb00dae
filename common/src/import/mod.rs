//! Spreadsheet import: parsing and per-entity normalization.
//!
//! ```text
//! bytes ──▶ parser (workbook, or text with encoding + delimiter) ──▶ rows ──▶ normalize ──▶ payloads
//! ```

pub mod normalize;
pub mod parser;

pub use normalize::{
    header_mappings, normalize_color, normalize_phone, normalize_row, normalize_sheet, normalize_text,
    HeaderMapping, Normalization,
};
pub use parser::{
    decode_content, detect_delimiter, detect_encoding, is_workbook, parse_sheet, parse_sheet_file, parse_str, parse_workbook,
    ImportRow, Sheet, SheetFormat,
};

use crate::entity::EntityKind;
use crate::error::ImportResult;
use crate::record::Record;
use std::path::Path;

/// Parse spreadsheet bytes into create payloads for `kind`.
pub fn parse_import(bytes: &[u8], kind: EntityKind) -> ImportResult<Vec<Record>> {
    let sheet = parse_sheet(bytes)?;
    Ok(normalize_sheet(kind, &sheet))
}

/// Parse a spreadsheet file into create payloads for `kind`.
pub fn parse_import_file<P: AsRef<Path>>(path: P, kind: EntityKind) -> ImportResult<Vec<Record>> {
    let sheet = parse_sheet_file(path)?;
    Ok(normalize_sheet(kind, &sheet))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import_three_of_four_rows() {
        let csv = "Nome;Email;Telefone;Função\n\
                   Ana;ana@example.com;(11) 98888-7777;Dev\n\
                   ;ghost@example.com;;\n\
                   Beto;;;QA\n\
                   Carla;carla@example.com;;\n";

        let rows = parse_import(csv.as_bytes(), EntityKind::Teams).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["phone"], "11988887777");
        assert_eq!(rows[1]["name"], "Beto");
        assert_eq!(rows[2]["email"], "carla@example.com");
    }

    #[test]
    fn test_parse_import_from_workbook() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "Nome").unwrap();
        worksheet.write_string(0, 1, "Telefone").unwrap();
        worksheet.write_string(1, 0, "Ana").unwrap();
        worksheet.write_string(1, 1, "(11) 98888-7777").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = parse_import(&bytes, EntityKind::Teams).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Ana");
        assert_eq!(rows[0]["phone"], "11988887777");
    }
}
