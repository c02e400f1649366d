//! End-to-end structural pass over a primitive source.

use std::collections::HashSet;

use rayon::prelude::*;

use crate::error::Result;
use crate::model::{Document, Span, Table, Warning, WarningKind};
use crate::source::PrimitiveSource;

use super::assembler::DocumentAssembler;
use super::content::ContentOrganizer;
use super::options::ParseOptions;
use super::structure::StructureDetector;
use super::table_detector::{PageTables, TableDetector};
use super::text::{into_reading_order, line_ranges, TextNormalizer};
use super::SpanRef;

/// Title used when neither metadata nor page text provides one.
pub const UNTITLED_DOCUMENT: &str = "Untitled document";

const MAX_TITLE_CHARS: usize = 100;

/// Everything read from a single page.
#[derive(Debug, Default)]
struct PageRead {
    spans: Vec<Span>,
    tables: PageTables,
    warnings: Vec<Warning>,
}

/// Infers sections, content blocks and tables from a [`PrimitiveSource`].
///
/// # Example
///
/// ```
/// use pdfstruct::parser::{ParseOptions, StructureParser};
/// use pdfstruct::source::MemorySource;
///
/// let source = MemorySource::new(2);
/// let parser = StructureParser::new(ParseOptions::default()).unwrap();
/// let doc = parser.parse(&source).unwrap();
/// assert_eq!(doc.sections.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct StructureParser {
    options: ParseOptions,
    normalizer: TextNormalizer,
}

impl StructureParser {
    /// Create a parser with the given options.
    pub fn new(options: ParseOptions) -> Result<Self> {
        Ok(Self {
            options,
            normalizer: TextNormalizer::new()?,
        })
    }

    /// Get the parse options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Run the full pass and build a [`Document`].
    ///
    /// Recoverable problems (unreadable pages, bad outlines, oversized
    /// vector sets) are recorded as warnings on the document.
    pub fn parse<S: PrimitiveSource + ?Sized>(&self, source: &S) -> Result<Document> {
        let page_count = source.page_count();
        log::info!("parsing {} pages", page_count);

        let reads: Vec<PageRead> = if self.options.parallel {
            (0..page_count)
                .into_par_iter()
                .map(|page| self.read_page(source, page))
                .collect()
        } else {
            (0..page_count).map(|page| self.read_page(source, page)).collect()
        };

        let mut pages = Vec::with_capacity(reads.len());
        let mut tables: Vec<Table> = Vec::new();
        let mut page_warnings = Vec::new();
        let mut claimed: HashSet<SpanRef> = HashSet::new();

        for (page, read) in (0..page_count).zip(reads) {
            claimed.extend(read.tables.claimed.iter().map(|&index| SpanRef { page, index }));
            tables.extend(read.tables.tables);
            page_warnings.extend(read.warnings);
            page_warnings.extend(read.tables.warnings);
            pages.push(read.spans);
        }
        log::info!("detected {} tables", tables.len());

        let tree = StructureDetector::new(&self.options, &self.normalizer).detect(
            source.outline(),
            &pages,
            page_count,
            &claimed,
        );
        log::info!("detected {} sections", tree.heading_count());

        let mut excluded = claimed;
        excluded.extend(tree.heading_spans.iter().copied());
        let blocks = ContentOrganizer::new(&self.options, &self.normalizer).organize(&tree, &pages, &excluded);

        let metadata = source.metadata();
        let title = extract_title(
            metadata.title.as_deref(),
            pages.first().map(Vec::as_slice).unwrap_or_default(),
            &self.normalizer,
        )
        .or_else(|| self.options.fallback_title.clone())
        .unwrap_or_else(|| UNTITLED_DOCUMENT.to_string());

        let doc = DocumentAssembler::new(title, metadata, page_count).assemble(tree, blocks, tables, page_warnings);

        for warning in &doc.warnings {
            log::warn!("{}", warning);
        }
        log::info!(
            "parsed '{}': {} sections, {} warnings",
            doc.title,
            doc.sections.len(),
            doc.warnings.len()
        );
        Ok(doc)
    }

    /// Read one page and detect its tables. Read failures leave the page empty.
    fn read_page<S: PrimitiveSource + ?Sized>(&self, source: &S, page: u32) -> PageRead {
        let primitives = source
            .page_spans(page)
            .and_then(|spans| Ok((spans, source.page_vectors(page)?)));

        let (mut spans, vectors) = match primitives {
            Ok(read) => read,
            Err(e) => {
                return PageRead {
                    warnings: vec![Warning::on_page(
                        WarningKind::PageReadFailure,
                        page,
                        format!("page skipped: {}", e),
                    )],
                    ..PageRead::default()
                };
            }
        };

        // The page index is ours; sources may leave it unset
        for span in &mut spans {
            span.page = page;
        }
        let spans = into_reading_order(spans);
        let tables = if self.options.detect_tables {
            TableDetector::new(&self.options.table, &self.normalizer).detect_page(page, &spans, &vectors)
        } else {
            PageTables::default()
        };

        PageRead {
            spans,
            tables,
            warnings: Vec::new(),
        }
    }
}

/// Pick a document title.
///
/// The metadata title wins when present; otherwise the first non-empty line
/// of the first page (in reading order), truncated to 100 characters.
pub fn extract_title(metadata_title: Option<&str>, first_page: &[Span], normalizer: &TextNormalizer) -> Option<String> {
    if let Some(title) = metadata_title.map(str::trim).filter(|t| !t.is_empty()) {
        return Some(title.to_string());
    }

    line_ranges(first_page).into_iter().find_map(|range| {
        let line: Vec<&Span> = first_page[range].iter().collect();
        let text = normalizer.compose(&line);
        if text.is_empty() {
            return None;
        }
        if text.chars().count() > MAX_TITLE_CHARS {
            let truncated: String = text.chars().take(MAX_TITLE_CHARS).collect();
            Some(format!("{}...", truncated))
        } else {
            Some(text)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Metadata, OutlineEntry, VectorPrimitive};
    use crate::source::MemorySource;

    fn span(text: &str, x0: f32, y0: f32, page: u32) -> Span {
        let width = text.chars().count() as f32 * 5.0;
        Span::new(text, BBox::new(x0, y0, x0 + width, y0 + 10.0), "Times", 10.0, page)
    }

    #[test]
    fn test_extract_title_prefers_metadata() {
        let normalizer = TextNormalizer::new().unwrap();
        let spans = vec![span("First line", 0.0, 0.0, 0)];
        assert_eq!(
            extract_title(Some("  Annual Report "), &spans, &normalizer).as_deref(),
            Some("Annual Report")
        );
        assert_eq!(extract_title(Some(""), &spans, &normalizer).as_deref(), Some("First line"));
    }

    #[test]
    fn test_extract_title_skips_blank_lines_and_truncates() {
        let normalizer = TextNormalizer::new().unwrap();
        let long = "x".repeat(150);
        let spans = vec![span("   ", 0.0, 0.0, 0), span(&long, 0.0, 20.0, 0)];

        let title = extract_title(None, &spans, &normalizer).unwrap();
        assert_eq!(title.chars().count(), 103);
        assert!(title.ends_with("..."));
        assert_eq!(extract_title(None, &[], &normalizer), None);
    }

    #[test]
    fn test_parse_empty_source() {
        let parser = StructureParser::new(ParseOptions::default()).unwrap();
        let doc = parser.parse(&MemorySource::new(3)).unwrap();

        assert_eq!(doc.title, UNTITLED_DOCUMENT);
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.root().page_range(), 0..=2);
        assert!(doc
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::AmbiguousStructure));
    }

    #[test]
    fn test_parse_uses_fallback_title() {
        let options = ParseOptions::default().with_fallback_title("report");
        let parser = StructureParser::new(options).unwrap();
        let doc = parser.parse(&MemorySource::new(1)).unwrap();
        assert_eq!(doc.title, "report");

        let source = MemorySource::new(1).with_metadata(Metadata {
            title: Some("From metadata".to_string()),
            ..Metadata::default()
        });
        assert_eq!(parser.parse(&source).unwrap().title, "From metadata");
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let spans = (0..4u32).flat_map(|page| {
            vec![
                span("Body text on the page", 72.0, 100.0, page),
                span("continues here.", 72.0, 112.0, page),
            ]
        });
        let source = MemorySource::new(4).with_spans(spans);

        let parallel = StructureParser::new(ParseOptions::default()).unwrap().parse(&source).unwrap();
        let sequential = StructureParser::new(ParseOptions::default().sequential())
            .unwrap()
            .parse(&source)
            .unwrap();

        assert_eq!(
            serde_json::to_string(&parallel).unwrap(),
            serde_json::to_string(&sequential).unwrap()
        );
    }

    #[test]
    fn test_failed_page_is_skipped() {
        let mut source = MemorySource::new(2).with_spans(vec![span("Hello", 0.0, 0.0, 0), span("World", 0.0, 0.0, 1)]);
        source.fail_page(1, "corrupt content stream");

        let parser = StructureParser::new(ParseOptions::default()).unwrap();
        let doc = parser.parse(&source).unwrap();

        let failures: Vec<_> = doc
            .warnings
            .iter()
            .filter(|w| w.kind == WarningKind::PageReadFailure)
            .collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].page, Some(1));
        assert!(!doc.plain_text().contains("World"));
    }

    /// Source that leaves every span on page 0.
    struct UnstampedSource;

    impl PrimitiveSource for UnstampedSource {
        fn page_count(&self) -> u32 {
            3
        }

        fn outline(&self) -> Result<Vec<OutlineEntry>> {
            Ok(Vec::new())
        }

        fn page_spans(&self, page: u32) -> Result<Vec<Span>> {
            Ok(vec![span(&format!("Text of page {}.", page + 1), 72.0, 100.0, 0)])
        }

        fn page_vectors(&self, _page: u32) -> Result<Vec<VectorPrimitive>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_span_pages_come_from_read_index() {
        let parser = StructureParser::new(ParseOptions::default()).unwrap();
        let doc = parser.parse(&UnstampedSource).unwrap();

        let pages: Vec<_> = doc.root().blocks.iter().map(|b| (b.page, b.text.as_str())).collect();
        assert_eq!(
            pages,
            vec![(0, "Text of page 1."), (1, "Text of page 2."), (2, "Text of page 3.")]
        );
        assert!(doc.root().blocks.iter().all(|b| b.spans.iter().all(|s| s.page == b.page)));
    }
}
