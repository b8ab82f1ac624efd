//! Spreadsheet reader with format, encoding and delimiter auto-detection.
//!
//! - `.csv`, `.tsv`, `.txt`: encoding detected with `chardet`, decoded with
//!   `encoding_rs`, delimiter guessed from the header line, parsed with `csv`.
//! - `.xlsx`, `.xlsm`, `.xls`, `.xlsb`, `.ods`: first worksheet via `calamine`.
//!
//! Every row becomes a [`SourceRow`] keyed by (trimmed) header name.

use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

use crate::error::{SheetError, SheetResult};
use crate::models::{CellValue, SourceRow, Table};

/// Tabular file family, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Workbook,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> SheetResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "csv" | "tsv" | "txt" => Ok(SheetFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(SheetFormat::Workbook),
            _ => Err(SheetError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Headers and rows
    pub table: Table,
    pub format: SheetFormat,
    /// Detected encoding (CSV only)
    pub encoding: Option<String>,
    /// Detected delimiter (CSV only)
    pub delimiter: Option<char>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
///
/// Unknown encodings fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };
    decoded.trim_start_matches('\u{feff}').to_string()
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Delimiter as shown in console output
pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

/// Parse CSV text with an explicit delimiter.
///
/// # Example
/// ```
/// use matrixify::parser::parse_csv_str;
///
/// let table = parse_csv_str("title;SKU\nBlue Mug;M-01", ';').unwrap();
/// assert_eq!(table.headers, vec!["title", "SKU"]);
/// assert_eq!(table.rows[0].get("SKU").to_string(), "M-01");
/// ```
pub fn parse_csv_str(content: &str, delimiter: char) -> SheetResult<Table> {
    if !delimiter.is_ascii() {
        return Err(SheetError::Parse {
            line: 1,
            message: format!("delimiter '{}' is not ASCII", delimiter),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(SheetError::Parse {
            line: 1,
            message: "No headers found".to_string(),
        });
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        let mut row = SourceRow::new(line);
        for (i, header) in headers.iter().enumerate() {
            let cell = match record.get(i) {
                Some(raw) if !raw.is_empty() => CellValue::Text(raw.to_string()),
                _ => CellValue::Empty,
            };
            row.cells.insert(header.clone(), cell);
        }
        rows.push(row);
    }

    Ok(Table { headers, rows })
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_csv_bytes(bytes: &[u8]) -> SheetResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);
    let table = parse_csv_str(&content, delimiter)?;

    Ok(ParseResult {
        table,
        format: SheetFormat::Csv,
        encoding: Some(encoding),
        delimiter: Some(delimiter),
    })
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::Text(other.to_string()),
    }
}

fn header_name(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// Read the first worksheet of a workbook.
pub fn parse_workbook_file(path: &Path) -> SheetResult<ParseResult> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_names = workbook.sheet_names();
    let first_sheet = sheet_names
        .first()
        .ok_or_else(|| SheetError::EmptyFile(path.to_path_buf()))?;
    let range = workbook.worksheet_range(first_sheet)?;

    let first_line = range.start().map(|(r, _)| r as usize + 1).unwrap_or(1);
    let mut sheet_rows = range.rows();

    let headers: Vec<String> = sheet_rows
        .next()
        .ok_or_else(|| SheetError::NoHeaders(path.to_path_buf()))?
        .iter()
        .map(header_name)
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(SheetError::NoHeaders(path.to_path_buf()));
    }

    let mut rows = Vec::new();
    for (idx, cells) in sheet_rows.enumerate() {
        if cells.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }

        let mut row = SourceRow::new(first_line + idx + 1);
        for (i, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let cell = cells.get(i).map(cell_value).unwrap_or_default();
            row.cells.insert(header.clone(), cell);
        }
        rows.push(row);
    }

    Ok(ParseResult {
        table: Table { headers, rows },
        format: SheetFormat::Workbook,
        encoding: None,
        delimiter: None,
    })
}

/// Read any supported sheet, choosing the reader from the extension.
pub fn parse_sheet_file(path: &Path) -> SheetResult<ParseResult> {
    match SheetFormat::from_path(path)? {
        SheetFormat::Csv => {
            let bytes = std::fs::read(path)?;
            if bytes.is_empty() {
                return Err(SheetError::EmptyFile(path.to_path_buf()));
            }
            parse_csv_bytes(&bytes)
        }
        SheetFormat::Workbook => parse_workbook_file(path),
    }
}

/// Header row only, as used for the Matrixify template.
pub fn read_headers(path: &Path) -> SheetResult<Vec<String>> {
    Ok(parse_sheet_file(path)?.table.headers)
}
