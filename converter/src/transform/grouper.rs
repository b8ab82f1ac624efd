//! Detect standalone products and variant groups in the vendor sheet.
//!
//! The vendor sheet lists variants as title-less continuation rows placed
//! *above* their group parent. The parent has a title, no SKU, and a
//! variant marker ("Variants", "var.", ...) in its variant column.
//!
//! # Architecture
//!
//! ```text
//! line 2 │        │ L-1 │ Red      │   ┐
//! line 3 │        │ L-2 │ Blue     │   ├─ collected while CollectingGroup
//! line 4 │ Lamp   │     │ Variants │ ◀─┘  parent: Idle → CollectingGroup
//! line 5 │ Mug    │ M-1 │          │   standalone
//!          scan direction: bottom → top
//! ```
//!
//! [`GroupScanner`] walks the rows from the last to the first with a single
//! cursor. In `Idle` it classifies one row; in `CollectingGroup` it consumes
//! title-less rows and stops, without consuming it, at the first titled
//! row, which the next `Idle` step then classifies normally.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::SourceColumns;
use crate::models::{ParentContext, ProductRecord, SourceRow, VariantCandidate};

static VARIANT_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bvar(?:iant)?s?\.?\b").expect("valid variant marker regex"));

/// Whether a variant-column value marks a group parent (or a placeholder
/// continuation row that must not become a variant).
pub fn is_variant_marker(text: &str) -> bool {
    VARIANT_MARKER.is_match(text)
}

/// What the scanner found, in scan order (bottom of the sheet first).
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent<'a> {
    /// Row with its own SKU.
    Standalone {
        row: &'a SourceRow,
        record: ProductRecord,
    },
    /// Group parent with its valid variants, in sheet order.
    Group {
        parent: ParentContext,
        variants: Vec<VariantCandidate>,
    },
    /// Group parent without a single valid variant.
    EmptyGroup { parent: ParentContext },
}

#[derive(Debug)]
enum ScanState {
    Idle,
    CollectingGroup {
        parent: ParentContext,
        /// Bottom-up collection order
        variants: Vec<VariantCandidate>,
    },
}

/// Reverse scanner over an immutable row slice.
pub struct GroupScanner<'a> {
    rows: &'a [SourceRow],
    columns: &'a SourceColumns,
    /// Rows `[0, remaining)` are not consumed yet
    remaining: usize,
    state: ScanState,
}

impl<'a> GroupScanner<'a> {
    pub fn new(rows: &'a [SourceRow], columns: &'a SourceColumns) -> Self {
        Self {
            rows,
            columns,
            remaining: rows.len(),
            state: ScanState::Idle,
        }
    }

    fn peek(&self) -> Option<&'a SourceRow> {
        let rows = self.rows;
        self.remaining.checked_sub(1).map(|i| &rows[i])
    }

    fn take(&mut self) -> Option<&'a SourceRow> {
        let row = self.peek()?;
        self.remaining -= 1;
        Some(row)
    }

    fn has_title(&self, row: &SourceRow) -> bool {
        row.get(&self.columns.title).is_present()
    }

    fn variant_text(&self, row: &SourceRow) -> String {
        row.get(&self.columns.variant).text_or_empty()
    }

    /// A continuation row qualifies when it has a SKU and a real label.
    fn variant_candidate(&self, row: &SourceRow) -> Option<VariantCandidate> {
        if row.get(&self.columns.sku).is_blank() {
            return None;
        }
        let label = self.variant_text(row);
        if label.is_empty() || is_variant_marker(&label) {
            return None;
        }
        Some(VariantCandidate::from_row(row, self.columns))
    }
}

impl<'a> Iterator for GroupScanner<'a> {
    type Item = ScanEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match std::mem::replace(&mut self.state, ScanState::Idle) {
                ScanState::Idle => {
                    let row = self.take()?;

                    if !self.has_title(row) {
                        continue;
                    }

                    if row.get(&self.columns.sku).is_present() {
                        return Some(ScanEvent::Standalone {
                            row,
                            record: ProductRecord::standalone(row, self.columns),
                        });
                    }

                    if is_variant_marker(&self.variant_text(row)) {
                        self.state = ScanState::CollectingGroup {
                            parent: ParentContext::from_row(row, self.columns),
                            variants: Vec::new(),
                        };
                    }
                    // Titled, no SKU, no marker: ignored.
                }

                ScanState::CollectingGroup { parent, mut variants } => match self.peek() {
                    Some(row) if !self.has_title(row) => {
                        self.remaining -= 1;
                        if let Some(candidate) = self.variant_candidate(row) {
                            variants.push(candidate);
                        }
                        self.state = ScanState::CollectingGroup { parent, variants };
                    }
                    // Titled row (left for Idle) or top of sheet ends the group.
                    _ => {
                        if variants.is_empty() {
                            return Some(ScanEvent::EmptyGroup { parent });
                        }
                        variants.reverse();
                        return Some(ScanEvent::Group { parent, variants });
                    }
                },
            }
        }
    }
}

/// Scan `rows` from the bottom up.
pub fn scan<'a>(rows: &'a [SourceRow], columns: &'a SourceColumns) -> GroupScanner<'a> {
    GroupScanner::new(rows, columns)
}
