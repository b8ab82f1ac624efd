//! Run configuration: file locations, the source header contract and the
//! fixed Matrixify column names.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SchemaError};

/// Vendor sheet read when no source is given.
pub const DEFAULT_SOURCE: &str = "./read-from/products.xlsx";
/// Matrixify template supplying the output column order.
pub const DEFAULT_TEMPLATE: &str = "./read-from/test_products_excel_matrixify.xlsx";
/// Where the import-ready sheet is written.
pub const DEFAULT_OUTPUT: &str = "./write-to/matrixify_ready.xlsx";

pub const ENV_SOURCE: &str = "MATRIXIFY_SOURCE";
pub const ENV_TEMPLATE: &str = "MATRIXIFY_TEMPLATE";
pub const ENV_OUTPUT: &str = "MATRIXIFY_OUTPUT";

// =============================================================================
// Target (Matrixify) columns
// =============================================================================

pub mod target {
    pub const HANDLE: &str = "Handle";
    pub const TITLE: &str = "Title";
    pub const BODY_HTML: &str = "Body HTML";
    pub const STATUS: &str = "Status";
    pub const OPTION1_NAME: &str = "Option1 Name";
    pub const OPTION1_VALUE: &str = "Option1 Value";
    pub const VARIANT_SKU: &str = "Variant SKU";
    pub const VARIANT_PRICE: &str = "Variant Price";
    pub const VARIANT_COMPARE_AT_PRICE: &str = "Variant Compare At Price";
    pub const VARIANT_REQUIRES_SHIPPING: &str = "Variant Requires Shipping";
    pub const VARIANT_TAXABLE: &str = "Variant Taxable";
    pub const SHORT_DESCRIPTION: &str = "Metafield: custom.short_description [rich_text_field]";
    pub const CLOSING_SUMMARY_TITLE: &str = "Metafield: custom.closing_summary_title [rich_text_field]";
    pub const CLOSING_SUMMARY_BODY: &str = "Metafield: custom.closing_summary_body [rich_text_field]";

    pub const INVENTORY_TRACKER: &str = "Variant Inventory Tracker";
    pub const INVENTORY_QTY: &str = "Variant Inventory Qty";
    pub const INVENTORY_POLICY: &str = "Variant Inventory Policy";
    pub const FULFILLMENT_SERVICE: &str = "Variant Fulfillment Service";

    /// Per-location inventory columns; Matrixify needs at least one location.
    pub const LOCATION_COLUMNS: [&str; 13] = [
        "Inventory Available: Shop location",
        "Inventory Available Adjust: Shop location",
        "Inventory On Hand: Shop location",
        "Inventory On Hand Adjust: Shop location",
        "Inventory Committed: Shop location",
        "Inventory Reserved: Shop location",
        "Inventory Damaged: Shop location",
        "Inventory Damaged Adjust: Shop location",
        "Inventory Safety Stock: Shop location",
        "Inventory Safety Stock Adjust: Shop location",
        "Inventory Quality Control: Shop location",
        "Inventory Quality Control Adjust: Shop location",
        "Inventory Incoming: Shop location",
    ];

    /// Appended to the template columns when missing, in this order.
    pub fn extra_columns() -> impl Iterator<Item = &'static str> {
        [INVENTORY_TRACKER, INVENTORY_QTY, INVENTORY_POLICY, FULFILLMENT_SERVICE]
            .into_iter()
            .chain(LOCATION_COLUMNS)
    }

    /// Every column the row builder writes to.
    pub const BUILDER_COLUMNS: [&str; 14] = [
        HANDLE,
        TITLE,
        BODY_HTML,
        STATUS,
        OPTION1_NAME,
        OPTION1_VALUE,
        VARIANT_SKU,
        VARIANT_PRICE,
        VARIANT_COMPARE_AT_PRICE,
        VARIANT_REQUIRES_SHIPPING,
        VARIANT_TAXABLE,
        SHORT_DESCRIPTION,
        CLOSING_SUMMARY_TITLE,
        CLOSING_SUMMARY_BODY,
    ];

    pub const INVENTORY_TRACKER_SHOPIFY: &str = "shopify";
}

// =============================================================================
// Source column contract
// =============================================================================

/// Header names expected in the vendor sheet.
///
/// Defaults match the vendor export; a JSON file may override any subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SourceColumns {
    pub title: String,
    pub sku: String,
    pub variant: String,
    pub normal_price: String,
    pub discount_price: String,
    pub description: String,
    pub short_description: String,
    pub closing_summary_title: String,
    pub closing_summary_body: String,
}

impl Default for SourceColumns {
    fn default() -> Self {
        Self {
            title: "title_us (NEW)".to_string(),
            sku: "SKU".to_string(),
            variant: "Variant".to_string(),
            normal_price: "normalPrice (GBP)".to_string(),
            discount_price: "discountPrice (GBP)".to_string(),
            description: "description_us (NEW)".to_string(),
            short_description: "shortDescription_us (NEW)".to_string(),
            closing_summary_title: "closingSummaryTitle_us".to_string(),
            closing_summary_body: "closingSummaryMainText_us".to_string(),
        }
    }
}

impl SourceColumns {
    /// Parse an override mapping from JSON.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load an override mapping from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, crate::error::PipelineError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            ConfigError::MappingUnreadable {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(Self::from_json(&content)?)
    }

    /// All required headers, in contract order.
    pub fn required(&self) -> [&str; 9] {
        [
            self.title.as_str(),
            self.sku.as_str(),
            self.variant.as_str(),
            self.normal_price.as_str(),
            self.discount_price.as_str(),
            self.description.as_str(),
            self.short_description.as_str(),
            self.closing_summary_title.as_str(),
            self.closing_summary_body.as_str(),
        ]
    }
}

// =============================================================================
// Options
// =============================================================================

/// Options for a file-to-file conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Vendor product sheet
    pub source: PathBuf,

    /// Matrixify template (only its header row is used)
    pub template: PathBuf,

    /// Output sheet, `.xlsx` or `.csv`
    pub output: PathBuf,

    /// Optional JSON file overriding source header names
    pub columns: Option<PathBuf>,

    /// Optional JSON run report
    pub report: Option<PathBuf>,

    /// Skip output row validation
    pub skip_validation: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            template: PathBuf::from(DEFAULT_TEMPLATE),
            output: PathBuf::from(DEFAULT_OUTPUT),
            columns: None,
            report: None,
            skip_validation: false,
        }
    }
}

impl ConvertOptions {
    /// Resolve the source column contract for this run.
    pub fn source_columns(&self) -> Result<SourceColumns, crate::error::PipelineError> {
        match self.columns {
            Some(ref path) => SourceColumns::from_file(path),
            None => Ok(SourceColumns::default()),
        }
    }

    /// Fail fast when an input file is missing.
    pub fn check_inputs(&self) -> Result<(), ConfigError> {
        if !self.source.exists() {
            return Err(ConfigError::FileNotFound {
                role: "Source file",
                path: self.source.clone(),
            });
        }
        if !self.template.exists() {
            return Err(ConfigError::FileNotFound {
                role: "Template file",
                path: self.template.clone(),
            });
        }
        Ok(())
    }
}
