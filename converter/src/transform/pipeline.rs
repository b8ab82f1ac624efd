//! High-level pipeline API: vendor sheet in, Matrixify sheet out.
//!
//! [`convert_rows`] is the pure core: scan, build, deduplicate by SKU,
//! count. [`convert_files`] wraps it with reading, contract checks,
//! validation, writing and the optional JSON report.
//!
//! # Example
//!
//! ```rust,ignore
//! use matrixify::{convert_files, ConvertOptions};
//!
//! let report = convert_files(&ConvertOptions::default())?;
//! println!("{} single products", report.summary.single_products);
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

use super::grouper::{scan, ScanEvent};
use super::row_builder::build_row;
use crate::config::{ConvertOptions, SourceColumns};
use crate::error::{PipelineResult, SheetError};
use crate::export::write_sheet;
use crate::logs::{log_error, log_info, log_success, log_warning, LogEntry, LOGGER};
use crate::models::{OutputRow, ProductRecord, RunSummary, SourceRow, TargetLayout};
use crate::parser::{format_delimiter, parse_sheet_file, read_headers};
use crate::validation::{check_required_columns, validate_rows, ValidationStats};

/// Outcome of converting an in-memory sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversion {
    /// Accepted rows, in emission order
    pub rows: Vec<OutputRow>,
    pub summary: RunSummary,
    /// SKUs dropped as duplicates, in encounter order
    pub duplicates: Vec<String>,
    /// Per-row progress messages
    pub log: Vec<LogEntry>,
}

enum Admission {
    Accepted,
    Duplicate,
}

/// Accumulates accepted rows and enforces SKU uniqueness for one run.
struct Assembler {
    seen_skus: HashSet<String>,
    conversion: Conversion,
}

impl Assembler {
    fn new() -> Self {
        Self {
            seen_skus: HashSet::new(),
            conversion: Conversion::default(),
        }
    }

    /// Accept `row` unless its non-empty SKU was already emitted.
    fn offer(&mut self, row: OutputRow) -> Admission {
        let sku = row.sku();

        if !sku.is_empty() && self.seen_skus.contains(&sku) {
            self.conversion
                .log
                .push(LogEntry::warning(format!("Skipped duplicate SKU: {}", sku)));
            self.conversion.summary.duplicate_skus += 1;
            self.conversion.duplicates.push(sku);
            return Admission::Duplicate;
        }

        if !sku.is_empty() {
            self.seen_skus.insert(sku);
        }
        self.conversion.rows.push(row);
        Admission::Accepted
    }

    fn note(&mut self, entry: LogEntry) {
        self.conversion.log.push(entry);
    }

    fn finish(mut self) -> Conversion {
        self.conversion.summary.rows_written = self.conversion.rows.len();
        self.conversion
    }
}

/// Convert vendor rows into Matrixify rows.
///
/// Pure: the same rows, columns and layout always give the same result.
pub fn convert_rows(
    rows: &[SourceRow],
    columns: &SourceColumns,
    layout: &TargetLayout,
) -> Conversion {
    let mut assembler = Assembler::new();

    for event in scan(rows, columns) {
        match event {
            ScanEvent::Standalone { record, .. } => {
                let row = build_row(&record, layout);
                if let Admission::Accepted = assembler.offer(row) {
                    assembler.conversion.summary.single_products += 1;
                    assembler.note(LogEntry::success(format!(
                        "Added product: {}",
                        record.display_title()
                    )));
                }
            }

            ScanEvent::Group { parent, variants } => {
                assembler.note(LogEntry::success(format!(
                    "Group parent (no SKU) -> only variants: {}",
                    parent.title
                )));

                for variant in &variants {
                    let record = ProductRecord::variant(&parent, variant);
                    let row = build_row(&record, layout);
                    if let Admission::Accepted = assembler.offer(row) {
                        let message = format!("Added variant: {}", record.display_title());
                        assembler.note(LogEntry::success(message).with_indent(1));
                    }
                }

                assembler.conversion.summary.product_groups += 1;
            }

            ScanEvent::EmptyGroup { parent } => {
                assembler.conversion.summary.skipped_parents += 1;
                assembler.note(LogEntry::warning(format!(
                    "Skipped group parent without valid variants: {} (line {})",
                    parent.title, parent.line
                )));
            }
        }
    }

    assembler.finish()
}

/// What a file conversion did, also written as the JSON run report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReport {
    pub generated_at: DateTime<Utc>,
    pub source: PathBuf,
    pub template: PathBuf,
    pub output: PathBuf,
    pub source_rows: usize,
    pub output_columns: usize,
    pub summary: RunSummary,
    pub duplicates: Vec<String>,
    /// `None` when validation was skipped
    pub validation: Option<ValidationStats>,
}

/// Convert the source sheet named in `options` and write the Matrixify sheet.
///
/// Missing files and missing source columns fail before any row is processed.
pub fn convert_files(options: &ConvertOptions) -> PipelineResult<ConversionReport> {
    options.check_inputs()?;
    let columns = options.source_columns()?;

    log_info(format!("📖 Reading source: {}", options.source.display()));
    let source = parse_sheet_file(&options.source)?;
    if let (Some(encoding), Some(delimiter)) = (&source.encoding, source.delimiter) {
        log_success(format!("Detected encoding: {}", encoding));
        log_success(format!("Detected separator: '{}'", format_delimiter(delimiter)));
    }
    log_success(format!("Read {} rows", source.table.rows.len()));

    check_required_columns(&source.table, &columns)?;

    log_info(format!("📋 Reading template: {}", options.template.display()));
    let template_headers = read_headers(&options.template)?;
    let layout = TargetLayout::from_template(&template_headers);
    log_success(format!(
        "{} template columns, {} after required additions",
        template_headers.len(),
        layout.len()
    ));

    log_info("⚙️  Converting rows...");
    let conversion = convert_rows(&source.table.rows, &columns, &layout);
    LOGGER.replay(&conversion.log);

    let validation = if options.skip_validation {
        log_info("(validation skipped)");
        None
    } else {
        log_info("✔️  Validating rows...");
        let stats = validate_rows(&conversion.rows);
        print_validation_result(&stats, &conversion.rows);
        Some(stats)
    };

    write_sheet(&options.output, &layout, &conversion.rows)?;
    log_success(format!("💾 Output written to: {}", options.output.display()));

    let report = ConversionReport {
        generated_at: Utc::now(),
        source: options.source.clone(),
        template: options.template.clone(),
        output: options.output.clone(),
        source_rows: source.table.rows.len(),
        output_columns: layout.len(),
        summary: conversion.summary,
        duplicates: conversion.duplicates,
        validation,
    };

    if let Some(ref path) = options.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json).map_err(SheetError::from)?;
        log_success(format!("Report written to: {}", path.display()));
    }

    print_summary(&report.summary);
    Ok(report)
}

fn print_summary(summary: &RunSummary) {
    log_info("📊 Summary:");
    log_success(format!("Single products: {}", summary.single_products));
    log_success(format!("Product groups: {}", summary.product_groups));
    log_success(format!("Skipped parents: {}", summary.skipped_parents));
    if summary.duplicate_skus > 0 {
        log_warning(format!("Duplicate SKUs dropped: {}", summary.duplicate_skus));
    }
}

fn print_validation_result(stats: &ValidationStats, rows: &[OutputRow]) {
    if stats.invalid == 0 {
        log_success(format!("All {} rows valid!", stats.valid));
        return;
    }

    log_success(format!("Valid: {}", stats.valid));
    log_warning(format!("Invalid: {} (written anyway)", stats.invalid));
    for (index, errors) in stats.errors.iter().take(5) {
        let title = rows.get(*index).map(|r| r.title()).unwrap_or_default();
        log_error(format!("Row {} ({}): {}", index + 1, title, errors.join(", ")));
    }
}
