//! Domain models for the conversion pipeline.
//!
//! - [`CellValue`] - loosely typed spreadsheet cell
//! - [`SourceRow`] / [`Table`] - the vendor sheet as read
//! - [`ParentContext`] / [`VariantCandidate`] - one variant group while scanning
//! - [`ProductRecord`] - logical product handed to the row builder
//! - [`TargetLayout`] / [`OutputRow`] - the Matrixify sheet being produced
//! - [`RunSummary`] - counters reported at the end of a run

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

use crate::config::{target, SourceColumns};

// =============================================================================
// Cells
// =============================================================================

/// A single spreadsheet cell.
///
/// Readers map every backend cell type onto these four shapes.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// Missing, or text that is only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(n) => n.is_nan(),
            CellValue::Bool(_) => false,
        }
    }

    /// Present and not blank.
    pub fn is_present(&self) -> bool {
        !self.is_blank()
    }

    /// Trimmed text form, or `None` when blank.
    pub fn text(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            Some(self.to_string().trim().to_string())
        }
    }

    /// Trimmed text form, empty when blank.
    pub fn text_or_empty(&self) -> String {
        self.text().unwrap_or_default()
    }

    /// Interpret the cell as a number (numeric cells and numeric-looking text).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if !n.is_nan() => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Empty => Value::String(String::new()),
            CellValue::Text(s) => Value::String(s.clone()),
            CellValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(String::new())),
            CellValue::Bool(b) => Value::Bool(*b),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            // Integral floats come from numeric spreadsheet cells ("1001", not "1001.0").
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

// =============================================================================
// Source sheet
// =============================================================================

/// One row of the vendor sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceRow {
    /// 1-based sheet line (header is line 1)
    pub line: usize,
    pub cells: HashMap<String, CellValue>,
}

impl SourceRow {
    pub fn new(line: usize) -> Self {
        Self { line, cells: HashMap::new() }
    }

    /// Builder-style insert, mostly for fixtures.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.cells.insert(column.into(), value.into());
        self
    }

    /// Cell under `column`, `Empty` when the column is absent.
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&EMPTY_CELL)
    }

    pub fn to_json(&self) -> Value {
        let obj: Map<String, Value> = self
            .cells
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(obj)
    }
}

/// A fully loaded sheet.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<SourceRow>,
}

impl Table {
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }
}

// =============================================================================
// Variant groups
// =============================================================================

/// Shared fields of a group parent, reused by each of its variants.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentContext {
    pub line: usize,
    pub title: String,
    pub body: CellValue,
    pub short_description: CellValue,
    pub closing_title: CellValue,
    pub closing_body: CellValue,
}

impl ParentContext {
    pub fn from_row(row: &SourceRow, columns: &SourceColumns) -> Self {
        Self {
            line: row.line,
            title: row.get(&columns.title).text_or_empty(),
            body: row.get(&columns.description).clone(),
            short_description: row.get(&columns.short_description).clone(),
            closing_title: row.get(&columns.closing_summary_title).clone(),
            closing_body: row.get(&columns.closing_summary_body).clone(),
        }
    }
}

/// A continuation row accepted as a variant of the current parent.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantCandidate {
    pub line: usize,
    pub sku: CellValue,
    pub label: String,
    pub normal_price: CellValue,
    pub discount_price: CellValue,
}

impl VariantCandidate {
    pub fn from_row(row: &SourceRow, columns: &SourceColumns) -> Self {
        Self {
            line: row.line,
            sku: row.get(&columns.sku).clone(),
            label: row.get(&columns.variant).text_or_empty(),
            normal_price: row.get(&columns.normal_price).clone(),
            discount_price: row.get(&columns.discount_price).clone(),
        }
    }
}

/// Logical product (or variant) handed to the row builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductRecord {
    pub title: CellValue,
    pub sku: CellValue,
    pub normal_price: CellValue,
    pub discount_price: CellValue,
    pub body: CellValue,
    pub short_description: CellValue,
    pub closing_title: CellValue,
    pub closing_body: CellValue,
    /// Variant label; `None` for standalone products.
    pub variant: Option<String>,
}

impl ProductRecord {
    /// A row carrying its own SKU.
    pub fn standalone(row: &SourceRow, columns: &SourceColumns) -> Self {
        Self {
            title: row.get(&columns.title).clone(),
            sku: row.get(&columns.sku).clone(),
            normal_price: row.get(&columns.normal_price).clone(),
            discount_price: row.get(&columns.discount_price).clone(),
            body: row.get(&columns.description).clone(),
            short_description: row.get(&columns.short_description).clone(),
            closing_title: row.get(&columns.closing_summary_title).clone(),
            closing_body: row.get(&columns.closing_summary_body).clone(),
            variant: None,
        }
    }

    /// One variant: identity and pricing from the variant, text from the parent.
    pub fn variant(parent: &ParentContext, variant: &VariantCandidate) -> Self {
        Self {
            title: CellValue::Text(parent.title.clone()),
            sku: variant.sku.clone(),
            normal_price: variant.normal_price.clone(),
            discount_price: variant.discount_price.clone(),
            body: parent.body.clone(),
            short_description: parent.short_description.clone(),
            closing_title: parent.closing_title.clone(),
            closing_body: parent.closing_body.clone(),
            variant: Some(variant.label.clone()),
        }
    }

    pub fn is_variant(&self) -> bool {
        self.variant.is_some()
    }

    /// Title shown in progress messages.
    pub fn display_title(&self) -> String {
        match self.variant {
            Some(ref label) if !label.is_empty() => {
                format!("{} - {}", self.title.text_or_empty(), label)
            }
            _ => self.title.text_or_empty(),
        }
    }
}

// =============================================================================
// Target sheet
// =============================================================================

/// Ordered column set of the output sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetLayout {
    columns: Vec<String>,
}

impl TargetLayout {
    /// Template columns, then inventory extras, then any builder column still missing.
    pub fn from_template(template_headers: &[String]) -> Self {
        let mut layout = Self { columns: Vec::new() };
        for header in template_headers {
            if !header.is_empty() {
                layout.push_missing(header);
            }
        }
        for col in target::extra_columns() {
            layout.push_missing(col);
        }
        for col in target::BUILDER_COLUMNS {
            layout.push_missing(col);
        }
        layout
    }

    fn push_missing(&mut self, column: &str) {
        if !self.contains(column) {
            self.columns.push(column.to_string());
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One Matrixify row: every layout column present.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    values: HashMap<String, CellValue>,
}

impl OutputRow {
    /// A row with every layout column set to empty.
    pub fn blank(layout: &TargetLayout) -> Self {
        let values = layout
            .columns()
            .iter()
            .map(|c| (c.clone(), CellValue::Empty))
            .collect();
        Self { values }
    }

    pub fn set(&mut self, column: &str, value: impl Into<CellValue>) {
        self.values.insert(column.to_string(), value.into());
    }

    pub fn get(&self, column: &str) -> &CellValue {
        self.values.get(column).unwrap_or(&EMPTY_CELL)
    }

    /// `Variant SKU`, empty when absent.
    pub fn sku(&self) -> String {
        self.get(target::VARIANT_SKU).text_or_empty()
    }

    pub fn title(&self) -> String {
        self.get(target::TITLE).text_or_empty()
    }

    /// Values in layout order.
    pub fn values_in<'a>(&'a self, layout: &'a TargetLayout) -> impl Iterator<Item = &'a CellValue> + 'a {
        layout.columns().iter().map(move |c| self.get(c))
    }

    pub fn to_json(&self) -> Value {
        let obj: Map<String, Value> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(obj)
    }
}

// =============================================================================
// Run summary
// =============================================================================

/// Counters reported at the end of a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Standalone products accepted
    pub single_products: usize,
    /// Group parents that had at least one valid variant
    pub product_groups: usize,
    /// Group parents dropped for lack of valid variants
    pub skipped_parents: usize,
    /// Rows dropped because their SKU was already emitted
    pub duplicate_skus: usize,
    /// Rows in the output sheet
    pub rows_written: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::from("   ").is_blank());
        assert!(CellValue::Number(f64::NAN).is_blank());
        assert!(!CellValue::from(0.0).is_blank());
        assert!(!CellValue::from("0").is_blank());
    }

    #[test]
    fn test_integral_numbers_render_without_fraction() {
        assert_eq!(CellValue::from(1001.0).to_string(), "1001");
        assert_eq!(CellValue::from(19.99).to_string(), "19.99");
        assert_eq!(CellValue::from(1001.0).text().unwrap(), "1001");
    }

    #[test]
    fn test_text_is_trimmed() {
        assert_eq!(CellValue::from("  M-01 ").text().unwrap(), "M-01");
        assert_eq!(CellValue::from(" ").text(), None);
    }

    #[test]
    fn test_cell_json_shapes() {
        assert_eq!(CellValue::Empty.to_json(), Value::String(String::new()));
        assert_eq!(CellValue::from(20.0).to_json(), serde_json::json!(20.0));
        assert_eq!(CellValue::from(true).to_json(), Value::Bool(true));
    }

    #[test]
    fn test_source_row_missing_column_is_empty() {
        let row = SourceRow::new(2).with("SKU", "A-1");
        assert_eq!(row.get("SKU"), &CellValue::from("A-1"));
        assert_eq!(row.get("Variant"), &CellValue::Empty);
    }

    #[test]
    fn test_layout_appends_extras_once() {
        let template = vec![
            "Handle".to_string(),
            "Title".to_string(),
            "Variant Inventory Qty".to_string(),
        ];
        let layout = TargetLayout::from_template(&template);

        assert_eq!(&layout.columns()[..3], &template[..]);
        assert_eq!(layout.columns()[3], "Variant Inventory Tracker");
        let qty = layout
            .columns()
            .iter()
            .filter(|c| *c == "Variant Inventory Qty")
            .count();
        assert_eq!(qty, 1);
        assert!(layout.contains(target::SHORT_DESCRIPTION));
        assert!(layout.contains("Inventory Incoming: Shop location"));
    }

    #[test]
    fn test_blank_output_row_covers_layout() {
        let layout = TargetLayout::from_template(&["Tags".to_string()]);
        let row = OutputRow::blank(&layout);
        assert_eq!(row.values_in(&layout).count(), layout.len());
        assert!(row.values_in(&layout).all(|v| *v == CellValue::Empty));
    }

    #[test]
    fn test_variant_record_display_title() {
        let parent = ParentContext {
            line: 4,
            title: "Lamp".into(),
            body: CellValue::Empty,
            short_description: CellValue::Empty,
            closing_title: CellValue::Empty,
            closing_body: CellValue::Empty,
        };
        let variant = VariantCandidate {
            line: 2,
            sku: "L-1".into(),
            label: "Red".into(),
            normal_price: 10.0.into(),
            discount_price: CellValue::Empty,
        };
        let record = ProductRecord::variant(&parent, &variant);
        assert!(record.is_variant());
        assert_eq!(record.display_title(), "Lamp - Red");
    }
}
