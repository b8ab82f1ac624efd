//! Build one Matrixify row from a logical product or variant.

use crate::config::target;
use crate::models::{CellValue, OutputRow, ProductRecord, TargetLayout};

use super::handle::generate_handle;
use super::text::{clean_cell, clean_html, to_rich_text};

/// The cell itself when present (not missing, not blank), else `None`.
///
/// A literal `0` counts as present.
fn price_or_none(value: &CellValue) -> Option<&CellValue> {
    value.is_present().then_some(value)
}

/// Pick `(Variant Price, Variant Compare At Price)`.
///
/// Price is the discount price when given, otherwise the normal price.
/// Compare-at is always the normal price.
pub fn select_prices(normal: &CellValue, discount: &CellValue) -> (CellValue, CellValue) {
    let normal = price_or_none(normal);
    let discount = price_or_none(discount);

    let price = discount.or(normal).cloned().unwrap_or_default();
    let compare_at = normal.cloned().unwrap_or_default();
    (price, compare_at)
}

/// Produce a complete output row for `record`.
///
/// Every column of `layout` is present; columns the builder does not
/// own stay empty.
pub fn build_row(record: &ProductRecord, layout: &TargetLayout) -> OutputRow {
    let mut row = OutputRow::blank(layout);

    let title = record.title.text_or_empty();
    let label = record.variant.as_deref().unwrap_or("");

    if record.is_variant() && !label.is_empty() {
        row.set(target::TITLE, clean_html(&format!("{} - {}", title, label)));
    } else {
        row.set(target::TITLE, clean_html(&title));
    }

    row.set(target::HANDLE, generate_handle(&title, label));
    row.set(target::VARIANT_SKU, record.sku.text_or_empty());

    let (price, compare_at) = select_prices(&record.normal_price, &record.discount_price);
    row.set(target::VARIANT_PRICE, price);
    row.set(target::VARIANT_COMPARE_AT_PRICE, compare_at);

    row.set(target::BODY_HTML, clean_cell(&record.body));
    row.set(target::VARIANT_REQUIRES_SHIPPING, true);
    row.set(target::VARIANT_TAXABLE, true);
    row.set(target::OPTION1_NAME, "Title");
    row.set(target::OPTION1_VALUE, "Default Title");
    row.set(target::STATUS, "active");

    row.set(target::SHORT_DESCRIPTION, to_rich_text(&record.short_description));
    row.set(target::CLOSING_SUMMARY_TITLE, to_rich_text(&record.closing_title));
    row.set(target::CLOSING_SUMMARY_BODY, to_rich_text(&record.closing_body));

    row.set(target::INVENTORY_TRACKER, target::INVENTORY_TRACKER_SHOPIFY);
    row.set(target::INVENTORY_QTY, 0.0);
    row.set(target::INVENTORY_POLICY, "deny");
    row.set(target::FULFILLMENT_SERVICE, "manual");
    for col in target::LOCATION_COLUMNS {
        row.set(col, 0.0);
    }

    row
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> TargetLayout {
        TargetLayout::from_template(&["Handle".to_string(), "Title".to_string(), "Tags".to_string()])
    }

    fn standalone(title: &str, sku: &str) -> ProductRecord {
        ProductRecord {
            title: title.into(),
            sku: sku.into(),
            ..ProductRecord::default()
        }
    }

    #[test]
    fn test_standalone_row() {
        let row = build_row(&standalone("Blue Mug", "M-01"), &layout());

        assert_eq!(row.get(target::TITLE), &CellValue::from("Blue Mug"));
        assert_eq!(row.get(target::HANDLE), &CellValue::from("blue-mug"));
        assert_eq!(row.sku(), "M-01");
        assert_eq!(row.get("Tags"), &CellValue::Empty);
    }

    #[test]
    fn test_variant_row_title_and_handle() {
        let record = ProductRecord {
            title: "Lamp".into(),
            sku: "L-1".into(),
            variant: Some("Red".into()),
            ..ProductRecord::default()
        };
        let row = build_row(&record, &layout());

        assert_eq!(row.title(), "Lamp - Red");
        assert_eq!(row.get(target::HANDLE), &CellValue::from("lamp-red"));
    }

    #[test]
    fn test_numeric_sku_is_stringified() {
        let record = ProductRecord {
            title: "Bolt".into(),
            sku: 1001.0.into(),
            ..ProductRecord::default()
        };
        assert_eq!(build_row(&record, &layout()).sku(), "1001");
    }

    #[test]
    fn test_price_falls_back_to_normal() {
        let (price, compare_at) = select_prices(&20.0.into(), &CellValue::from("  "));
        assert_eq!(price, CellValue::Number(20.0));
        assert_eq!(compare_at, CellValue::Number(20.0));
    }

    #[test]
    fn test_discount_price_preferred() {
        let (price, compare_at) = select_prices(&20.0.into(), &15.0.into());
        assert_eq!(price, CellValue::Number(15.0));
        assert_eq!(compare_at, CellValue::Number(20.0));
    }

    #[test]
    fn test_zero_discount_counts_as_present() {
        let (price, _) = select_prices(&20.0.into(), &0.0.into());
        assert_eq!(price, CellValue::Number(0.0));
    }

    #[test]
    fn test_no_prices() {
        let (price, compare_at) = select_prices(&CellValue::Empty, &CellValue::Empty);
        assert_eq!(price, CellValue::Empty);
        assert_eq!(compare_at, CellValue::Empty);

        let (price, compare_at) = select_prices(&CellValue::Empty, &9.5.into());
        assert_eq!(price, CellValue::Number(9.5));
        assert_eq!(compare_at, CellValue::Empty);
    }

    #[test]
    fn test_fixed_defaults() {
        let row = build_row(&standalone("Blue Mug", "M-01"), &layout());

        assert_eq!(row.get(target::VARIANT_REQUIRES_SHIPPING), &CellValue::Bool(true));
        assert_eq!(row.get(target::VARIANT_TAXABLE), &CellValue::Bool(true));
        assert_eq!(row.get(target::OPTION1_NAME), &CellValue::from("Title"));
        assert_eq!(row.get(target::OPTION1_VALUE), &CellValue::from("Default Title"));
        assert_eq!(row.get(target::STATUS), &CellValue::from("active"));
        assert_eq!(row.get(target::INVENTORY_TRACKER), &CellValue::from("shopify"));
        assert_eq!(row.get(target::INVENTORY_QTY), &CellValue::Number(0.0));
        assert_eq!(row.get(target::INVENTORY_POLICY), &CellValue::from("deny"));
        assert_eq!(row.get(target::FULFILLMENT_SERVICE), &CellValue::from("manual"));
        for col in target::LOCATION_COLUMNS {
            assert_eq!(row.get(col), &CellValue::Number(0.0), "{}", col);
        }
    }

    #[test]
    fn test_text_fields_cleaned() {
        let record = ProductRecord {
            title: "<b>Mug</b>".into(),
            sku: "M-02".into(),
            body: "<p>Holds   tea</p>".into(),
            short_description: "Short".into(),
            ..ProductRecord::default()
        };
        let row = build_row(&record, &layout());

        assert_eq!(row.title(), "Mug");
        assert_eq!(row.get(target::BODY_HTML), &CellValue::from("Holds tea"));
        let short = row.get(target::SHORT_DESCRIPTION).text_or_empty();
        assert!(short.contains(r#""value":"Short""#));
        let closing = row.get(target::CLOSING_SUMMARY_BODY).text_or_empty();
        assert!(closing.contains(r#""value":"""#));
    }
}
