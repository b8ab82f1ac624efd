//! # Matrixify - vendor product sheets to Shopify bulk-import sheets
//!
//! Matrixify converts a vendor's product spreadsheet (one row per product,
//! variants as continuation rows above their parent) into the flat sheet
//! the Matrixify app imports into Shopify.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Vendor Sheet│────▶│   Parser    │────▶│  Transform  │────▶│  Matrixify  │
//! │ (xlsx/csv)  │     │ (auto-enc)  │     │ (scan+dedup)│     │ (xlsx/csv)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                            ▲                   │
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │  Template   │     │ Validation  │
//!                     │  (headers)  │     │ (row schema)│
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use matrixify::{convert_files, ConvertOptions};
//!
//! fn main() {
//!     let report = convert_files(&ConvertOptions::default()).unwrap();
//!     println!("Wrote {} rows", report.summary.rows_written);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`logs`] - Leveled console logging
//! - [`config`] - Defaults, target columns and the source column contract
//! - [`models`] - Cells, rows, records and the target layout
//! - [`parser`] - CSV and workbook reading with auto-detection
//! - [`transform`] - Text cleanup, handles, grouping and the pipeline
//! - [`validation`] - Column checks and output row schema
//! - [`export`] - Writing the Matrixify sheet

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Reading and writing
pub mod export;
pub mod parser;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError,
    PipelineError,
    PipelineResult,
    SchemaError,
    SheetError,
    SheetResult,
};

// =============================================================================
// Re-exports - Models and configuration
// =============================================================================

pub use config::{ConvertOptions, SourceColumns};

pub use models::{
    CellValue,
    OutputRow,
    ParentContext,
    ProductRecord,
    RunSummary,
    SourceRow,
    Table,
    TargetLayout,
    VariantCandidate,
};

// =============================================================================
// Re-exports - Parsing and export
// =============================================================================

pub use parser::{
    decode_content,
    detect_delimiter,
    detect_encoding,
    format_delimiter,
    parse_csv_str,
    parse_sheet_file,
    read_headers,
    ParseResult,
    SheetFormat,
};

pub use export::{write_sheet, OutputFormat};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    build_row,
    clean_html,
    generate_handle,
    is_variant_marker,
    scan,
    to_rich_text,
    ScanEvent,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{
    check_required_columns,
    is_valid_output_row,
    validate_output_row,
    validate_sheet,
    ValidationStats,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{convert_files, convert_rows, Conversion, ConversionReport};
