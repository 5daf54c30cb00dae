//! Spreadsheet parser.
//!
//! Workbooks (xlsx, xls, ods) are recognised by their magic bytes and read
//! through calamine, first sheet only. Anything else is treated as a CSV/TSV
//! export with encoding and delimiter auto-detection. Either way the result
//! is rows keyed by header text. No entity-specific logic here.

use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::error::{ImportError, ImportResult};

/// Local file header of a ZIP archive (xlsx, ods).
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// OLE compound document (legacy xls).
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// One data row: header text to raw cell text. Cells missing from a short
/// row are present as empty strings.
pub type ImportRow = HashMap<String, String>;

/// A parsed sheet with the detected format.
#[derive(Debug, Clone)]
pub struct Sheet {
    /// Header row, in file order
    pub headers: Vec<String>,
    /// Data rows
    pub rows: Vec<ImportRow>,
    /// Where the rows came from
    pub format: SheetFormat,
}

/// Source format of a [`Sheet`].
#[derive(Debug, Clone, PartialEq)]
pub enum SheetFormat {
    /// Delimited text export
    Delimited { encoding: String, delimiter: char },
    /// First worksheet of a workbook
    Workbook { sheet: String },
}

impl fmt::Display for SheetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetFormat::Delimited { encoding, delimiter } => {
                let delimiter = match delimiter {
                    '\t' => "\\t".to_string(),
                    c => c.to_string(),
                };
                write!(f, "{} text, '{}' delimited", encoding, delimiter)
            }
            SheetFormat::Workbook { sheet } => write!(f, "workbook, sheet \"{}\"", sheet),
        }
    }
}

/// Whether `bytes` look like a workbook rather than a text export.
pub fn is_workbook(bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC)
}

/// Key one row by header. Blank headers are skipped, the first of duplicate
/// headers wins, and missing cells become "".
fn keyed_row(headers: &[String], cell: impl Fn(usize) -> Option<String>) -> ImportRow {
    let mut row = ImportRow::with_capacity(headers.len());
    for (i, header) in headers.iter().enumerate() {
        if header.is_empty() {
            continue;
        }
        row.entry(header.clone()).or_insert_with(|| cell(i).unwrap_or_default());
    }
    row
}

/// Detect the encoding of raw bytes. Valid UTF-8 wins; otherwise chardet decides.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to text using the given encoding, falling back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let text = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };

    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

/// Detect the delimiter by counting occurrences in the header line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = ',';
    let mut best_count = 0;

    for sep in [';', ',', '\t', '|'] {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse spreadsheet bytes: a workbook's first sheet, or a text export with
/// auto-detection of encoding and delimiter.
pub fn parse_sheet(bytes: &[u8]) -> ImportResult<Sheet> {
    if is_workbook(bytes) {
        return parse_workbook(bytes);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);

    parse_str(&content, delimiter, encoding)
}

/// Read the first worksheet of an xlsx/xls/ods workbook held in memory.
pub fn parse_workbook(bytes: &[u8]) -> ImportResult<Sheet> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let sheet = workbook.sheet_names().first().cloned().ok_or(ImportError::EmptyFile)?;
    let range = workbook.worksheet_range(&sheet)?;

    let mut lines = range.rows();
    let headers: Vec<String> = match lines.next() {
        Some(cells) => cells.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => return Err(ImportError::EmptyFile),
    };
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ImportError::NoHeaders);
    }

    let rows = lines
        .filter(|cells| cells.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|cells| keyed_row(&headers, |i| cells.get(i).map(Data::to_string)))
        .collect();

    Ok(Sheet {
        headers,
        rows,
        format: SheetFormat::Workbook { sheet },
    })
}

/// Parse a spreadsheet file from disk.
pub fn parse_sheet_file<P: AsRef<Path>>(path: P) -> ImportResult<Sheet> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_sheet(&bytes)
}

/// Parse decoded text with an explicit delimiter.
pub fn parse_str(content: &str, delimiter: char, encoding: String) -> ImportResult<Sheet> {
    if content.trim().is_empty() {
        return Err(ImportError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ImportError::NoHeaders);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(keyed_row(&headers, |i| record.get(i).map(str::to_string)));
    }

    Ok(Sheet {
        headers,
        rows,
        format: SheetFormat::Delimited { encoding, delimiter },
    })
}
