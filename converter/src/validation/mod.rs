//! Input contract checks and output row validation.
//!
//! - [`check_required_columns`] runs before any row is processed and
//!   reports every missing header at once.
//! - Output rows are checked against the embedded Draft-7 schema
//!   `schemas/matrixify-product-row.json`. Invalid rows are reported, not
//!   dropped: Matrixify is the final authority on what it imports.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use matrixify::validation::validate_output_row;
//!
//! let row = json!({
//!     "Handle": "blue-mug",
//!     "Title": "Blue Mug",
//!     "Status": "active",
//!     "Variant Price": 12.5,
//!     "Variant Inventory Policy": "deny",
//!     "Variant Inventory Tracker": "shopify"
//! });
//! assert!(validate_output_row(&row).is_ok());
//! ```

use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{target, SourceColumns};
use crate::error::SchemaError;
use crate::models::{CellValue, OutputRow, Table};

const OUTPUT_ROW_SCHEMA: &str = include_str!("../../schemas/matrixify-product-row.json");

static OUTPUT_ROW_VALIDATOR: Lazy<Validator> = Lazy::new(|| {
    let schema: Value = serde_json::from_str(OUTPUT_ROW_SCHEMA).expect("Invalid embedded schema");
    jsonschema::draft7::new(&schema).expect("Invalid embedded schema")
});

/// Fail when the source sheet lacks any header of the contract.
pub fn check_required_columns(table: &Table, columns: &SourceColumns) -> Result<(), SchemaError> {
    let missing: Vec<String> = columns
        .required()
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns(missing))
    }
}

fn collect_errors(validator: &Validator, data: &Value) -> Result<(), Vec<String>> {
    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate one output row (as JSON) against the Matrixify row schema.
pub fn validate_output_row(data: &Value) -> Result<(), Vec<String>> {
    collect_errors(&OUTPUT_ROW_VALIDATOR, data)
}

/// Quick check against the Matrixify row schema.
pub fn is_valid_output_row(data: &Value) -> bool {
    OUTPUT_ROW_VALIDATOR.is_valid(data)
}

/// Aggregated validation outcome
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStats {
    pub valid: usize,
    pub invalid: usize,
    /// First errors, as (row index, messages)
    pub errors: Vec<(usize, Vec<String>)>,
}

const MAX_REPORTED_ROWS: usize = 10;

impl ValidationStats {
    fn record(&mut self, index: usize, result: Result<(), Vec<String>>) {
        match result {
            Ok(()) => self.valid += 1,
            Err(errs) => {
                self.invalid += 1;
                if self.errors.len() < MAX_REPORTED_ROWS {
                    self.errors.push((index, errs));
                }
            }
        }
    }
}

/// Validate freshly built rows.
pub fn validate_rows(rows: &[OutputRow]) -> ValidationStats {
    let mut stats = ValidationStats::default();
    for (i, row) in rows.iter().enumerate() {
        stats.record(i, validate_output_row(&row.to_json()));
    }
    stats
}

/// Restore cell types lost in a CSV round trip for the typed columns.
fn retype(column: &str, cell: &CellValue) -> Value {
    let text = cell.text_or_empty();
    match column {
        target::VARIANT_REQUIRES_SHIPPING | target::VARIANT_TAXABLE => {
            match text.to_lowercase().as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => cell.to_json(),
            }
        }
        target::INVENTORY_QTY => cell
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| cell.to_json()),
        _ => cell.to_json(),
    }
}

/// Validate an already written Matrixify sheet.
pub fn validate_sheet(table: &Table) -> ValidationStats {
    let mut stats = ValidationStats::default();
    for (i, row) in table.rows.iter().enumerate() {
        let obj: Map<String, Value> = table
            .headers
            .iter()
            .map(|h| (h.clone(), retype(h, row.get(h))))
            .collect();
        stats.record(i, validate_output_row(&Value::Object(obj)));
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductRecord, SourceRow, TargetLayout};
    use crate::transform::row_builder::build_row;
    use serde_json::json;

    fn valid_row() -> Value {
        json!({
            "Handle": "blue-mug",
            "Title": "Blue Mug",
            "Status": "active",
            "Variant Price": 12.5,
            "Variant Compare At Price": "",
            "Variant Inventory Policy": "deny",
            "Variant Inventory Tracker": "shopify"
        })
    }

    #[test]
    fn test_missing_columns_all_reported() {
        let table = Table {
            headers: vec!["title_us (NEW)".into(), "SKU".into()],
            rows: vec![],
        };
        let err = check_required_columns(&table, &SourceColumns::default()).unwrap_err();
        match err {
            SchemaError::MissingColumns(cols) => {
                assert_eq!(cols.len(), 7);
                assert_eq!(cols[0], "Variant");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_all_columns_present() {
        let cols = SourceColumns::default();
        let table = Table {
            headers: cols.required().iter().map(|c| c.to_string()).collect(),
            rows: vec![],
        };
        assert!(check_required_columns(&table, &cols).is_ok());
    }

    #[test]
    fn test_valid_row() {
        assert!(is_valid_output_row(&valid_row()));
    }

    #[test]
    fn test_invalid_handle_and_status() {
        let mut row = valid_row();
        row["Handle"] = json!("Blue Mug");
        row["Status"] = json!("live");
        let errors = validate_output_row(&row).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_price_as_text() {
        let mut row = valid_row();
        row["Variant Price"] = json!("19.99");
        assert!(is_valid_output_row(&row));
        row["Variant Price"] = json!("£19.99");
        assert!(!is_valid_output_row(&row));
    }

    #[test]
    fn test_built_rows_are_valid() {
        let layout = TargetLayout::from_template(&[]);
        let record = ProductRecord {
            title: "Blue Mug".into(),
            sku: "M-01".into(),
            normal_price: 20.0.into(),
            ..ProductRecord::default()
        };
        let stats = validate_rows(&[build_row(&record, &layout)]);
        assert_eq!(stats.valid, 1, "{:?}", stats.errors);
        assert_eq!(stats.invalid, 0);
    }

    #[test]
    fn test_sheet_validation_restores_types() {
        let headers: Vec<String> = [
            "Handle",
            "Title",
            "Status",
            "Variant Price",
            "Variant Inventory Policy",
            "Variant Inventory Tracker",
            "Variant Taxable",
            "Variant Inventory Qty",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let row = SourceRow::new(2)
            .with("Handle", "blue-mug")
            .with("Title", "Blue Mug")
            .with("Status", "active")
            .with("Variant Price", "20")
            .with("Variant Inventory Policy", "deny")
            .with("Variant Inventory Tracker", "shopify")
            .with("Variant Taxable", "TRUE")
            .with("Variant Inventory Qty", "0");
        let stats = validate_sheet(&Table { headers, rows: vec![row] });
        assert_eq!(stats.valid, 1, "{:?}", stats.errors);
    }
}
