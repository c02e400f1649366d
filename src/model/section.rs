//! Section tree nodes.

use super::{ContentBlock, Table};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Index of a section in the document's section arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub usize);

impl SectionId {
    /// Arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node of the section hierarchy.
///
/// Children are owned through `children`; `parent` is only a lookup id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Arena id
    pub id: SectionId,

    /// Section title
    pub title: String,

    /// Heading level (`Some(0)` for top-level sections, `None` for the document root)
    pub level: Option<u8>,

    /// Parent section, `None` for the root
    pub parent: Option<SectionId>,

    /// Child sections in document order
    pub children: Vec<SectionId>,

    /// Heading spans when the section came from typographic heuristics
    pub heading: Option<ContentBlock>,

    /// Content blocks in reading order
    pub blocks: Vec<ContentBlock>,

    /// Tables in page order
    pub tables: Vec<Table>,

    /// First page (0-based, inclusive)
    pub start_page: u32,

    /// Last page (0-based, inclusive)
    pub end_page: u32,

    /// Vertical position of the heading on its start page
    pub anchor_y: Option<f32>,
}

impl Section {
    /// Create a section with an empty body.
    pub fn new(id: SectionId, title: impl Into<String>, level: Option<u8>) -> Self {
        Self {
            id,
            title: title.into(),
            level,
            parent: None,
            children: Vec::new(),
            heading: None,
            blocks: Vec::new(),
            tables: Vec::new(),
            start_page: 0,
            end_page: 0,
            anchor_y: None,
        }
    }

    /// Check whether this is the synthetic document root.
    pub fn is_root(&self) -> bool {
        self.level.is_none()
    }

    /// Inclusive page range.
    pub fn page_range(&self) -> RangeInclusive<u32> {
        self.start_page..=self.end_page
    }

    /// Check whether the page lies in this section's range.
    pub fn contains_page(&self, page: u32) -> bool {
        self.page_range().contains(&page)
    }

    /// Number of pages covered.
    pub fn page_count(&self) -> u32 {
        self.end_page.saturating_sub(self.start_page) + 1
    }

    /// Check whether a position `(page, y)` lies at or after the section start.
    ///
    /// Sections without an anchor start at the top of their first page.
    pub fn starts_before(&self, page: u32, y: f32) -> bool {
        if page != self.start_page {
            return self.start_page < page;
        }
        self.anchor_y.map_or(true, |anchor| anchor <= y)
    }

    /// Human-readable 1-based page label: "Page 3" or "Pages 3-5".
    pub fn page_label(&self) -> String {
        if self.start_page == self.end_page {
            format!("Page {}", self.start_page + 1)
        } else {
            format!("Pages {}-{}", self.start_page + 1, self.end_page + 1)
        }
    }

    /// Plain text of the body blocks.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
