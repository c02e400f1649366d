//! Section hierarchy detection.
//!
//! Sections come from the embedded outline when one is available, otherwise
//! from typography: the dominant (size, weight) pair is taken as body text and
//! noticeably larger or emphasized lines become headings.

use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::model::{ContentBlock, OutlineEntry, Section, SectionId, Span, Warning, WarningKind};

use super::options::ParseOptions;
use super::text::{line_ranges, visible_len, TextNormalizer};
use super::SpanRef;

/// Title given to outline entries without one.
pub const UNTITLED_SECTION: &str = "Untitled section";

/// Section arena produced by structure detection.
#[derive(Debug, Clone)]
pub struct SectionTree {
    /// Section arena; index 0 is the root
    pub sections: Vec<Section>,
    /// Root id
    pub root: SectionId,
    /// Spans used as heading text
    pub heading_spans: HashSet<SpanRef>,
    /// Warnings raised while building the tree
    pub warnings: Vec<Warning>,
}

impl SectionTree {
    /// Create a tree holding only the root section.
    pub fn root_only(page_count: u32) -> Self {
        let mut root = Section::new(SectionId(0), "", None);
        root.end_page = page_count.saturating_sub(1);
        Self {
            sections: vec![root],
            root: SectionId(0),
            heading_spans: HashSet::new(),
            warnings: Vec::new(),
        }
    }

    /// Number of sections excluding the root.
    pub fn heading_count(&self) -> usize {
        self.sections.len() - 1
    }

    /// Resolve the section owning a position.
    ///
    /// The active section is the last one, in document order, whose heading
    /// starts at or above `(page, y)`. When its range no longer covers `page`
    /// the nearest ancestor that does takes over.
    pub fn section_at(&self, page: u32, y: f32) -> SectionId {
        // Sections after the root are sorted by (start page, anchor)
        let headed = self.sections.get(1..).unwrap_or(&[]);
        let started = headed.partition_point(|s| s.starts_before(page, y));

        let mut current = match started.checked_sub(1) {
            Some(last) => headed[last].id,
            None => return self.root,
        };
        loop {
            let section = &self.sections[current.index()];
            if section.contains_page(page) {
                return current;
            }
            match section.parent {
                Some(parent) => current = parent,
                None => return self.root,
            }
        }
    }
}

/// A heading found in the outline or in the page text.
#[derive(Debug, Clone)]
struct Heading {
    title: String,
    level: u8,
    page: u32,
    anchor_y: Option<f32>,
    block: Option<ContentBlock>,
    spans: Vec<SpanRef>,
}

/// Histogram of (font size, bold) pairs over all spans.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    histogram: HashMap<(i32, bool), usize>,
}

impl FontStatistics {
    /// Build statistics from pages of spans.
    pub fn from_pages(pages: &[Vec<Span>]) -> Self {
        let mut stats = Self::default();
        for span in pages.iter().flatten().filter(|s| !s.is_blank()) {
            stats.add(span);
        }
        stats
    }

    /// Add a span observation.
    pub fn add(&mut self, span: &Span) {
        *self.histogram.entry((span.size_key(), span.bold)).or_insert(0) += 1;
    }

    /// Check if no spans were observed.
    pub fn is_empty(&self) -> bool {
        self.histogram.is_empty()
    }

    /// Dominant (size key, bold) pair; ties go to the smaller size, then non-bold.
    pub fn body(&self) -> Option<(i32, bool)> {
        self.histogram
            .iter()
            .max_by(|(ka, ca), (kb, cb)| {
                ca.cmp(cb)
                    .then_with(|| kb.0.cmp(&ka.0))
                    .then_with(|| kb.1.cmp(&ka.1))
            })
            .map(|(key, _)| *key)
    }
}

/// Builds the section tree.
pub struct StructureDetector<'a> {
    options: &'a ParseOptions,
    normalizer: &'a TextNormalizer,
}

impl<'a> StructureDetector<'a> {
    /// Create a detector.
    pub fn new(options: &'a ParseOptions, normalizer: &'a TextNormalizer) -> Self {
        Self {
            options,
            normalizer,
        }
    }

    /// Detect sections.
    ///
    /// `pages` holds each page's spans in reading order (empty for unreadable
    /// pages); spans in `claimed` already belong to table cells and never
    /// become headings. Never fails: outline problems fall back to heuristics
    /// and are reported as warnings.
    pub fn detect(
        &self,
        outline: Result<Vec<OutlineEntry>>,
        pages: &[Vec<Span>],
        page_count: u32,
        claimed: &HashSet<SpanRef>,
    ) -> SectionTree {
        let mut warnings = Vec::new();

        let outline = match outline {
            Ok(entries) => entries,
            Err(e) => {
                warnings.push(Warning::new(
                    WarningKind::InvalidOutline,
                    format!("outline unreadable, using typography: {}", e),
                ));
                Vec::new()
            }
        };

        let headings = if self.options.use_toc && !outline.is_empty() {
            log::debug!("building sections from {} outline entries", outline.len());
            self.headings_from_outline(&outline, page_count, &mut warnings)
        } else {
            self.headings_from_typography(pages, claimed)
        };

        let mut tree = build_tree(headings, page_count);
        if tree.heading_count() == 0 {
            warnings.push(Warning::new(
                WarningKind::AmbiguousStructure,
                "no headings found; document has a single section",
            ));
        }
        tree.warnings = warnings;
        tree
    }

    fn headings_from_outline(
        &self,
        entries: &[OutlineEntry],
        page_count: u32,
        warnings: &mut Vec<Warning>,
    ) -> Vec<Heading> {
        let last_page = i64::from(page_count.saturating_sub(1));
        let mut headings = Vec::with_capacity(entries.len());
        let mut prev_page: i64 = 0;
        let mut prev_level: Option<i32> = None;
        let mut adjusted = 0usize;

        for entry in entries {
            let target = match entry.page {
                Some(p) => {
                    let clamped = p.clamp(0, last_page);
                    if clamped != p {
                        adjusted += 1;
                    }
                    clamped
                }
                None => {
                    adjusted += 1;
                    prev_page
                }
            };
            if target < prev_page {
                adjusted += 1;
            }
            let page = target.max(prev_page);
            prev_page = page;

            let max_level = prev_level.map_or(0, |l| l + 1);
            let level = entry.level.max(0);
            if level > max_level || entry.level < 0 {
                adjusted += 1;
            }
            let level = level.min(max_level).min(i32::from(u8::MAX));
            prev_level = Some(level);

            let title = entry.title.trim();
            let title = if title.is_empty() {
                UNTITLED_SECTION.to_string()
            } else {
                self.normalizer.normalize(title)
            };

            headings.push(Heading {
                title,
                level: level as u8,
                page: page as u32,
                anchor_y: None,
                block: None,
                spans: Vec::new(),
            });
        }

        if adjusted > 0 {
            warnings.push(Warning::new(
                WarningKind::InvalidOutline,
                format!("{} outline adjustments (missing or out-of-order targets, level skips)", adjusted),
            ));
        }
        headings
    }

    fn headings_from_typography(&self, pages: &[Vec<Span>], claimed: &HashSet<SpanRef>) -> Vec<Heading> {
        let stats = FontStatistics::from_pages(pages);
        let Some((body_key, body_bold)) = stats.body() else {
            return Vec::new();
        };
        let body_size = body_key as f32 / 10.0;
        let threshold = body_size * self.options.heading_size_ratio;
        log::debug!(
            "body text {:.1}pt{}, heading threshold {:.1}pt",
            body_size,
            if body_bold { " bold" } else { "" },
            threshold
        );

        // Candidate runs: (page, span indices) sharing a line and a size
        let mut runs: Vec<(u32, Vec<usize>, i32)> = Vec::new();
        for (page_index, spans) in pages.iter().enumerate() {
            let page = page_index as u32;
            for line in line_ranges(spans) {
                let line_spans = &spans[line.clone()];
                let line_bold = line_spans.iter().filter(|s| !s.is_blank()).all(|s| s.bold);

                let mut current: Option<(Vec<usize>, i32)> = None;
                for index in line {
                    let span = &spans[index];
                    if span.is_blank() {
                        continue;
                    }
                    let candidate = !claimed.contains(&SpanRef { page, index })
                        && (span.size >= threshold - 0.01
                            || (span.bold && !body_bold && line_bold && span.size_key() == body_key));

                    let key = span.size_key();
                    let extends = candidate && matches!(&current, Some((_, k)) if *k == key);
                    if extends {
                        if let Some((indices, _)) = current.as_mut() {
                            indices.push(index);
                        }
                        continue;
                    }

                    if let Some((indices, k)) = current.take() {
                        runs.push((page, indices, k));
                    }
                    if candidate {
                        current = Some((vec![index], key));
                    }
                }
                if let Some((indices, key)) = current {
                    runs.push((page, indices, key));
                }
            }
        }

        let mut headings = Vec::new();
        let mut sizes: Vec<i32> = Vec::new();
        for (page, indices, key) in runs {
            let spans: Vec<&Span> = indices.iter().map(|&i| &pages[page as usize][i]).collect();
            let title = self.normalizer.compose(&spans);
            let len = visible_len(&title);
            if len < self.options.min_heading_chars || len > self.options.max_heading_chars {
                log::debug!("rejected heading candidate {:?} ({} chars)", title, len);
                continue;
            }

            let owned: Vec<Span> = spans.into_iter().cloned().collect();
            let Some(block) = ContentBlock::new(owned, title.clone()) else {
                continue;
            };
            if !sizes.contains(&key) {
                sizes.push(key);
            }
            headings.push((
                key,
                Heading {
                    title,
                    level: 0,
                    page,
                    anchor_y: Some(block.top()),
                    block: Some(block),
                    spans: indices.iter().map(|&index| SpanRef { page, index }).collect(),
                },
            ));
        }

        sizes.sort_unstable_by(|a, b| b.cmp(a));
        let max_level = self.options.max_heading_depth.saturating_sub(1) as usize;
        log::debug!("{} typographic headings over sizes {:?}", headings.len(), sizes);

        headings
            .into_iter()
            .map(|(key, mut heading)| {
                let rank = sizes.iter().position(|s| *s == key).unwrap_or(0);
                heading.level = rank.min(max_level) as u8;
                heading
            })
            .collect()
    }
}

/// Nest headings with a level stack and assign page ranges.
fn build_tree(headings: Vec<Heading>, page_count: u32) -> SectionTree {
    let mut tree = SectionTree::root_only(page_count);
    let mut stack: Vec<(u8, SectionId)> = Vec::new();

    for heading in headings {
        while stack.last().is_some_and(|(level, _)| *level >= heading.level) {
            stack.pop();
        }
        let parent = stack.last().map_or(tree.root, |(_, id)| *id);

        let id = SectionId(tree.sections.len());
        let mut section = Section::new(id, heading.title, Some(heading.level));
        section.parent = Some(parent);
        section.start_page = heading.page;
        section.anchor_y = heading.anchor_y;
        section.heading = heading.block;
        tree.heading_spans.extend(heading.spans);

        tree.sections[parent.index()].children.push(id);
        tree.sections.push(section);
        stack.push((heading.level, id));
    }

    assign_page_ranges(&mut tree.sections, tree.root);
    tree
}

/// Assign inclusive page ranges top-down.
///
/// Children are clamped into their parent's range; each child ends one page
/// before its next sibling starts (or on that page when its own subtree
/// reaches it) and the last child ends with its parent.
pub(crate) fn assign_page_ranges(sections: &mut [Section], id: SectionId) {
    let (start, end) = {
        let s = &sections[id.index()];
        (s.start_page, s.end_page)
    };
    let children = sections[id.index()].children.clone();

    for child in &children {
        let c = &mut sections[child.index()];
        c.start_page = c.start_page.clamp(start, end);
    }

    for (i, child) in children.iter().enumerate() {
        let child_start = sections[child.index()].start_page;
        let mut child_end = match children.get(i + 1) {
            Some(next) => child_start.max(sections[next.index()].start_page.saturating_sub(1)),
            None => end,
        };
        child_end = child_end.max(latest_descendant_start(sections, *child)).min(end);
        sections[child.index()].end_page = child_end;
    }

    for child in children {
        assign_page_ranges(sections, child);
    }
}

fn latest_descendant_start(sections: &[Section], id: SectionId) -> u32 {
    let mut latest = sections[id.index()].start_page;
    let mut stack = sections[id.index()].children.clone();
    while let Some(current) = stack.pop() {
        let s = &sections[current.index()];
        latest = latest.max(s.start_page);
        stack.extend(s.children.iter().copied());
    }
    latest
}
