//! Write the Matrixify sheet.
//!
//! `.xlsx` output keeps numbers and booleans typed; `.csv` output writes
//! their text form. The parent directory is created when missing.

use rust_xlsxwriter::Workbook;
use std::path::Path;

use crate::error::{SheetError, SheetResult};
use crate::models::{CellValue, OutputRow, TargetLayout};

/// Output flavours we can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> SheetResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "xlsx" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(SheetError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

/// Write `rows` under the `layout` header to `path`.
pub fn write_sheet(path: &Path, layout: &TargetLayout, rows: &[OutputRow]) -> SheetResult<()> {
    let format = OutputFormat::from_path(path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    match format {
        OutputFormat::Xlsx => write_xlsx(path, layout, rows),
        OutputFormat::Csv => write_csv(path, layout, rows),
    }
}

fn write_xlsx(path: &Path, layout: &TargetLayout, rows: &[OutputRow]) -> SheetResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in layout.columns().iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }

    for (r, row) in rows.iter().enumerate() {
        let sheet_row = (r + 1) as u32;
        for (col, value) in row.values_in(layout).enumerate() {
            let col = col as u16;
            match value {
                CellValue::Empty => {}
                CellValue::Text(s) => {
                    worksheet.write_string(sheet_row, col, s)?;
                }
                CellValue::Number(n) => {
                    worksheet.write_number(sheet_row, col, *n)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(sheet_row, col, *b)?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn write_csv(path: &Path, layout: &TargetLayout, rows: &[OutputRow]) -> SheetResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(layout.columns())?;

    for row in rows {
        // Booleans as TRUE/FALSE, which Matrixify reads from CSV.
        let record: Vec<String> = row
            .values_in(layout)
            .map(|v| match v {
                CellValue::Bool(true) => "TRUE".to_string(),
                CellValue::Bool(false) => "FALSE".to_string(),
                other => other.to_string(),
            })
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::target;
    use crate::parser::parse_sheet_file;
    use tempfile::tempdir;

    fn sample() -> (TargetLayout, Vec<OutputRow>) {
        let layout = TargetLayout::from_template(&["Handle".to_string(), "Title".to_string()]);
        let mut row = OutputRow::blank(&layout);
        row.set(target::HANDLE, "blue-mug");
        row.set(target::TITLE, "Blue, Mug");
        row.set(target::VARIANT_PRICE, 12.5);
        row.set(target::VARIANT_TAXABLE, true);
        (layout, vec![row])
    }

    #[test]
    fn test_output_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("out.xlsx")).unwrap(), OutputFormat::Xlsx);
        assert_eq!(OutputFormat::from_path(Path::new("out.CSV")).unwrap(), OutputFormat::Csv);
        assert!(OutputFormat::from_path(Path::new("out.ods")).is_err());
    }

    #[test]
    fn test_csv_output_creates_directory_and_keeps_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("write-to").join("ready.csv");
        let (layout, rows) = sample();

        write_sheet(&path, &layout, &rows).unwrap();

        let parsed = parse_sheet_file(&path).unwrap();
        assert_eq!(parsed.table.headers, layout.columns());
        let row = &parsed.table.rows[0];
        assert_eq!(row.get("Title").to_string(), "Blue, Mug");
        assert_eq!(row.get("Variant Price").to_string(), "12.5");
        assert_eq!(row.get("Variant Taxable").to_string(), "TRUE");
        assert_eq!(row.get("Variant SKU"), &CellValue::Empty);
    }

    #[test]
    fn test_xlsx_output_keeps_types() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ready.xlsx");
        let (layout, rows) = sample();

        write_sheet(&path, &layout, &rows).unwrap();

        let parsed = parse_sheet_file(&path).unwrap();
        assert_eq!(parsed.table.headers, layout.columns());
        let row = &parsed.table.rows[0];
        assert_eq!(row.get("Handle"), &CellValue::from("blue-mug"));
        assert_eq!(row.get("Variant Price"), &CellValue::Number(12.5));
        assert_eq!(row.get("Variant Taxable"), &CellValue::Bool(true));
    }

    #[test]
    fn test_unsupported_output_rejected_before_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        let (layout, rows) = sample();

        assert!(write_sheet(&path, &layout, &rows).is_err());
        assert!(!dir.path().join("nested").exists());
    }
}
