//! Transformation module.
//!
//! This module turns vendor rows into Matrixify rows:
//! - Text: HTML cleanup and rich-text JSON
//! - Handle: URL slugs
//! - Row builder: one record to one output row
//! - Grouper: standalone products and variant groups
//! - Pipeline: deduplication, counting and file orchestration

pub mod grouper;
pub mod handle;
pub mod pipeline;
pub mod row_builder;
pub mod text;

pub use grouper::{is_variant_marker, scan, GroupScanner, ScanEvent};
pub use handle::generate_handle;
pub use pipeline::*;
pub use row_builder::{build_row, select_prices};
pub use text::{clean_cell, clean_html, to_rich_text};
