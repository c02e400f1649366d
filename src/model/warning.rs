//! Recoverable conditions recorded during a parse.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a recorded warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The outline could not be read or contained unusable entries
    InvalidOutline,
    /// No heading structure could be inferred
    AmbiguousStructure,
    /// A page had too many vector primitives for grid detection
    TableGeometryOverflow,
    /// A block or table referenced a page outside the document
    InconsistentReference,
    /// A page's primitives could not be read
    PageReadFailure,
}

impl WarningKind {
    /// Stable snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::InvalidOutline => "invalid_outline",
            WarningKind::AmbiguousStructure => "ambiguous_structure",
            WarningKind::TableGeometryOverflow => "table_geometry_overflow",
            WarningKind::InconsistentReference => "inconsistent_reference",
            WarningKind::PageReadFailure => "page_read_failure",
        }
    }
}

/// A recoverable problem attached to the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    /// Warning category
    pub kind: WarningKind,

    /// Page index (0-based), when the problem is page-specific
    pub page: Option<u32>,

    /// Human-readable description
    pub message: String,
}

impl Warning {
    /// Create a document-level warning.
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            page: None,
            message: message.into(),
        }
    }

    /// Create a warning tied to a page.
    pub fn on_page(kind: WarningKind, page: u32, message: impl Into<String>) -> Self {
        Self {
            kind,
            page: Some(page),
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.page {
            Some(page) => write!(f, "[{}] page {}: {}", self.kind.as_str(), page + 1, self.message),
            None => write!(f, "[{}] {}", self.kind.as_str(), self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let w = Warning::on_page(WarningKind::PageReadFailure, 2, "bad stream");
        assert_eq!(w.to_string(), "[page_read_failure] page 3: bad stream");

        let w = Warning::new(WarningKind::AmbiguousStructure, "no headings");
        assert_eq!(w.to_string(), "[ambiguous_structure] no headings");
    }
}
