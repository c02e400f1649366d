//! Content organization: spans to ordered blocks per section.

use std::collections::HashSet;

use crate::model::{ContentBlock, SectionId, Span};

use super::options::ParseOptions;
use super::structure::SectionTree;
use super::text::TextNormalizer;
use super::SpanRef;

/// Assigns prose spans to sections and merges them into blocks.
pub struct ContentOrganizer<'a> {
    options: &'a ParseOptions,
    normalizer: &'a TextNormalizer,
}

impl<'a> ContentOrganizer<'a> {
    /// Create an organizer.
    pub fn new(options: &'a ParseOptions, normalizer: &'a TextNormalizer) -> Self {
        Self {
            options,
            normalizer,
        }
    }

    /// Build content blocks in document order, each tagged with its section.
    ///
    /// `pages` holds each page's spans in reading order. Spans in `excluded`
    /// (table cells and headings) are skipped.
    pub fn organize(
        &self,
        tree: &SectionTree,
        pages: &[Vec<Span>],
        excluded: &HashSet<SpanRef>,
    ) -> Vec<(SectionId, ContentBlock)> {
        let mut blocks = Vec::new();

        for (page_index, spans) in pages.iter().enumerate() {
            let page = page_index as u32;
            let mut current: Option<(SectionId, Vec<&Span>)> = None;

            for (index, span) in spans.iter().enumerate() {
                if excluded.contains(&SpanRef { page, index }) {
                    continue;
                }
                let section = tree.section_at(page, span.bbox.y0);

                if let Some((current_section, group)) = current.as_mut() {
                    let joins = *current_section == section
                        && group.last().is_some_and(|last| self.continues(last, span));
                    if joins {
                        group.push(span);
                        continue;
                    }
                }

                if let Some((id, group)) = current.take() {
                    blocks.extend(self.finish(id, group));
                }
                current = Some((section, vec![span]));
            }

            if let Some((id, group)) = current {
                blocks.extend(self.finish(id, group));
            }
        }

        log::debug!("organized {} content blocks", blocks.len());
        blocks
    }

    /// Check whether `next` continues the block ending with `last`.
    fn continues(&self, last: &Span, next: &Span) -> bool {
        if last.page != next.page
            || last.font != next.font
            || (last.size - next.size).abs() > self.options.font_size_tolerance
        {
            return false;
        }
        if last.same_line(next) {
            return true;
        }
        let gap = next.bbox.y0 - last.bbox.y1;
        next.bbox.y0 >= last.bbox.y0 && gap <= self.options.line_gap_ratio * last.size.max(next.size)
    }

    fn finish(&self, section: SectionId, group: Vec<&Span>) -> Option<(SectionId, ContentBlock)> {
        let text = self.normalizer.compose(&group);
        let spans = group.into_iter().cloned().collect();
        ContentBlock::new(spans, text).map(|block| (section, block))
    }
}
