//! Error types for the Matrixify conversion pipeline.
//!
//! - [`SheetError`] - reading and writing tabular files
//! - [`SchemaError`] - source column contract violations
//! - [`ConfigError`] - missing input files
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Sheet I/O Errors
// =============================================================================

/// Errors while reading or writing a spreadsheet.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Failed to read or write the file.
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    /// Extension we have no reader or writer for.
    #[error("Unsupported file type '{extension}' for {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// File has no content at all.
    #[error("Sheet is empty: {}", .0.display())]
    EmptyFile(PathBuf),

    /// No header row could be found.
    #[error("No headers found in {}", .0.display())]
    NoHeaders(PathBuf),

    /// Malformed CSV content.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook backend (calamine / rust_xlsxwriter) failure.
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// Row-level parse failure with position.
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl From<calamine::Error> for SheetError {
    fn from(e: calamine::Error) -> Self {
        SheetError::Workbook(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for SheetError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        SheetError::Workbook(e.to_string())
    }
}

// =============================================================================
// Schema Errors
// =============================================================================

/// The source sheet does not satisfy the column contract.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// One or more required headers are absent.
    #[error("Missing required column(s) in source file: {}", quote_all(.0))]
    MissingColumns(Vec<String>),

    /// Column contract override could not be parsed.
    #[error("Invalid column mapping: {0}")]
    InvalidMapping(#[from] serde_json::Error),
}

fn quote_all(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| format!("'{}'", c))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Invalid run configuration, detected before any row is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An input file does not exist.
    #[error("{role} not found: {}", .path.display())]
    FileNotFound { role: &'static str, path: PathBuf },

    /// Column mapping file could not be read.
    #[error("Cannot read column mapping {}: {source}", .path.display())]
    MappingUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::convert_files`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Schema error.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Sheet I/O error.
    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    /// Report serialization error.
    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for sheet operations.
pub type SheetResult<T> = Result<T, SheetError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let sheet_err = SheetError::EmptyFile(PathBuf::from("products.csv"));
        let pipeline_err: PipelineError = sheet_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        let schema_err = SchemaError::MissingColumns(vec!["SKU".into()]);
        let pipeline_err: PipelineError = schema_err.into();
        assert!(pipeline_err.to_string().contains("'SKU'"));
    }

    #[test]
    fn test_missing_columns_lists_all() {
        let err = SchemaError::MissingColumns(vec!["SKU".into(), "Variant".into()]);
        let msg = err.to_string();
        assert!(msg.contains("'SKU', 'Variant'"));
    }

    #[test]
    fn test_file_not_found_names_role() {
        let err = ConfigError::FileNotFound {
            role: "Template file",
            path: PathBuf::from("read-from/template.xlsx"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Template file not found"));
        assert!(msg.contains("read-from/template.xlsx"));
    }

    #[test]
    fn test_parse_error_format() {
        let err = SheetError::Parse {
            line: 5,
            message: "unterminated quote".into(),
        };
        assert_eq!(err.to_string(), "Line 5: unterminated quote");
    }
}
