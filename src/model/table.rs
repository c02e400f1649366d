//! Table types.

use super::BBox;
use serde::{Deserialize, Serialize};

/// How a table region was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    /// Grid recovered from ruling lines and rectangles
    Bordered,
    /// Grid inferred from text alignment, no borders
    Inferred,
}

impl DetectionMethod {
    /// Lowercase name used by the renderers.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::Bordered => "bordered",
            DetectionMethod::Inferred => "inferred",
        }
    }
}

/// A table detected on a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Page index (0-based)
    pub page: u32,

    /// Bounding box of the table region
    pub bbox: BBox,

    /// Rows in top-to-bottom order
    pub rows: Vec<TableRow>,

    /// Detection stage that produced the table
    pub method: DetectionMethod,

    /// Detection confidence in `[0, 1]`
    pub confidence: f32,
}

impl Table {
    /// Create a new empty table.
    pub fn new(page: u32, bbox: BBox, method: DetectionMethod) -> Self {
        Self {
            page,
            bbox,
            rows: Vec::new(),
            method,
            confidence: match method {
                DetectionMethod::Bordered => 0.9,
                DetectionMethod::Inferred => 0.5,
            },
        }
    }

    /// Set confidence and return self.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of grid columns (widest row).
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.width()).max().unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check whether every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.rows.iter().flat_map(|r| &r.cells).all(|c| c.is_empty())
    }

    /// Number of spans merged into the table's cells.
    pub fn span_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| &r.cells)
            .map(|c| c.span_count)
            .sum()
    }

    /// Pad ragged rows so every row has the same width.
    ///
    /// Zero spans are raised to 1. Applying this twice yields the same table.
    pub fn normalize(&mut self) {
        for cell in self.rows.iter_mut().flat_map(|r| r.cells.iter_mut()) {
            cell.col_span = cell.col_span.max(1);
            cell.row_span = cell.row_span.max(1);
        }

        let width = self.column_count();
        for row in &mut self.rows {
            let missing = width - row.width();
            row.cells
                .extend(std::iter::repeat_with(TableCell::empty).take(missing));
        }
    }

    /// Check whether every row has the same width.
    pub fn is_rectangular(&self) -> bool {
        let width = self.column_count();
        self.rows.iter().all(|r| r.width() == width)
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if the table has merged cells.
    pub fn has_merged_cells(&self) -> bool {
        self.rows
            .iter()
            .flat_map(|r| &r.cells)
            .any(|c| c.is_merged())
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }

    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(TableCell::text).collect())
    }

    /// Row width in grid columns (sum of column spans).
    pub fn width(&self) -> usize {
        self.cells.iter().map(|c| c.col_span.max(1) as usize).sum()
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell text
    pub text: String,

    /// Number of columns this cell spans
    pub col_span: u32,

    /// Number of rows this cell spans
    pub row_span: u32,

    /// Number of spans merged into this cell
    pub span_count: usize,
}

impl TableCell {
    /// Create a new cell with text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            col_span: 1,
            row_span: 1,
            span_count: 0,
        }
    }

    /// Create an empty cell.
    pub fn empty() -> Self {
        Self::text("")
    }

    /// Set colspan and return self.
    pub fn colspan(mut self, span: u32) -> Self {
        self.col_span = span;
        self
    }

    /// Set the merged span count and return self.
    pub fn with_span_count(mut self, count: usize) -> Self {
        self.span_count = count;
        self
    }

    /// Check if the cell is empty.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Check if this cell spans multiple rows or columns.
    pub fn is_merged(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }
}
