//! Final document assembly.

use crate::model::{ContentBlock, Document, Metadata, SectionId, Table, Warning, WarningKind};

use super::structure::SectionTree;

/// Attaches blocks and tables to the section tree and freezes the result.
pub struct DocumentAssembler {
    title: String,
    metadata: Metadata,
    page_count: u32,
}

impl DocumentAssembler {
    /// Create an assembler for a document.
    pub fn new(title: impl Into<String>, metadata: Metadata, page_count: u32) -> Self {
        Self {
            title: title.into(),
            metadata,
            page_count,
        }
    }

    /// Build the document.
    ///
    /// Blocks go to the section they were assigned to; tables go to the
    /// section owning their page and top edge. Anything referencing a page
    /// or section outside the document is dropped with a warning.
    pub fn assemble(
        self,
        tree: SectionTree,
        blocks: Vec<(SectionId, ContentBlock)>,
        tables: Vec<Table>,
        page_warnings: Vec<Warning>,
    ) -> Document {
        let placements: Vec<Option<SectionId>> = tables
            .iter()
            .map(|t| (t.page < self.page_count).then(|| tree.section_at(t.page, t.bbox.y0)))
            .collect();

        let SectionTree {
            mut sections,
            root,
            mut warnings,
            ..
        } = tree;
        warnings.extend(page_warnings);

        for (id, block) in blocks {
            if block.page >= self.page_count || id.index() >= sections.len() {
                warnings.push(Warning::on_page(
                    WarningKind::InconsistentReference,
                    block.page,
                    format!("content block for section {} dropped", id),
                ));
                continue;
            }
            sections[id.index()].blocks.push(block);
        }

        for (table, placement) in tables.into_iter().zip(placements) {
            match placement {
                Some(id) => sections[id.index()].tables.push(table),
                None => warnings.push(Warning::on_page(
                    WarningKind::InconsistentReference,
                    table.page,
                    "table outside the document's pages dropped",
                )),
            }
        }

        let title = self.title;
        sections[root.index()].title = title.clone();

        Document {
            title,
            metadata: self.metadata,
            page_count: self.page_count,
            sections,
            root,
            warnings,
        }
    }
}
