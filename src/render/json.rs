//! JSON rendering for structured documents.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{BBox, Document, DocumentStats, Metadata, Section, Table, Warning};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON with sections nested under their parents.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let view = DocumentView::new(doc);
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&view),
        JsonFormat::Compact => serde_json::to_string(&view),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[derive(Serialize)]
struct DocumentView<'a> {
    title: &'a str,
    page_count: u32,
    metadata: &'a Metadata,
    stats: DocumentStats,
    /// Content before the first heading
    blocks: Vec<BlockView<'a>>,
    tables: &'a [Table],
    sections: Vec<SectionView<'a>>,
    warnings: &'a [Warning],
}

#[derive(Serialize)]
struct SectionView<'a> {
    title: &'a str,
    level: Option<u8>,
    start_page: u32,
    end_page: u32,
    blocks: Vec<BlockView<'a>>,
    tables: &'a [Table],
    children: Vec<SectionView<'a>>,
}

#[derive(Serialize)]
struct BlockView<'a> {
    page: u32,
    bbox: BBox,
    text: &'a str,
}

impl<'a> DocumentView<'a> {
    fn new(doc: &'a Document) -> Self {
        let root = doc.root();
        Self {
            title: &doc.title,
            page_count: doc.page_count,
            metadata: &doc.metadata,
            stats: doc.stats(),
            blocks: blocks(root),
            tables: &root.tables,
            sections: doc.children(root.id).map(|s| SectionView::new(doc, s)).collect(),
            warnings: &doc.warnings,
        }
    }
}

impl<'a> SectionView<'a> {
    fn new(doc: &'a Document, section: &'a Section) -> Self {
        Self {
            title: &section.title,
            level: section.level,
            start_page: section.start_page,
            end_page: section.end_page,
            blocks: blocks(section),
            tables: &section.tables,
            children: doc.children(section.id).map(|s| SectionView::new(doc, s)).collect(),
        }
    }
}

fn blocks(section: &Section) -> Vec<BlockView<'_>> {
    section
        .blocks
        .iter()
        .map(|b| BlockView {
            page: b.page,
            bbox: b.bbox,
            text: &b.text,
        })
        .collect()
}
