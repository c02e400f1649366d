//! Property tests for section ranges and table normalization.

use proptest::prelude::*;

use pdfstruct::{parse_source_with_options, Document, MemorySource, OutlineEntry, ParseOptions, TableCell, TableRow};
use pdfstruct::{BBox, DetectionMethod, PrimitiveSource, Span, Table, VectorPrimitive};

fn outline_entry() -> impl Strategy<Value = OutlineEntry> {
    (-2i32..6, prop::option::weighted(0.8, -5i64..40), "[a-z ]{0,8}")
        .prop_map(|(level, page, title)| OutlineEntry::new(title, level, page))
}

fn parse_outline(page_count: u32, outline: Vec<OutlineEntry>) -> Document {
    let source = MemorySource::new(page_count).with_outline(outline);
    parse_source_with_options(&source, ParseOptions::default().sequential()).unwrap()
}

/// One generated line: 0 body, 1 chapter heading, 2 subsection heading, 3 aligned row.
fn line() -> impl Strategy<Value = (u8, Vec<String>)> {
    (0u8..4, prop::collection::vec("[A-Z][a-z]{1,7}", 1..4))
}

fn page_layout() -> impl Strategy<Value = (Vec<(u8, Vec<String>)>, bool)> {
    (prop::collection::vec(line(), 0..24), any::<bool>())
}

fn layout_source(pages: &[(Vec<(u8, Vec<String>)>, bool)]) -> MemorySource {
    let mut source = MemorySource::new(pages.len() as u32);

    for (page, (lines, with_grid)) in pages.iter().enumerate() {
        let page = page as u32;
        let mut y = 40.0;
        for (kind, words) in lines {
            let (size, font) = match kind {
                1 => (20.0, "Times-Bold"),
                2 => (14.0, "Times-Bold"),
                _ => (10.0, "Times"),
            };
            let mut x = 72.0;
            for word in words {
                let width = word.chars().count() as f32 * size * 0.5;
                source.add_span(Span::new(word.clone(), BBox::new(x, y, x + width, y + size), font, size, page));
                x = if *kind == 3 { x + 120.0 } else { x + width + size * 0.3 };
            }
            y += size + 6.0;
        }

        if *with_grid {
            for (x0, y0, x1, y1) in [
                (100.0, 700.0, 300.0, 700.0),
                (100.0, 730.0, 300.0, 730.0),
                (100.0, 760.0, 300.0, 760.0),
                (100.0, 700.0, 100.0, 760.0),
                (300.0, 700.0, 300.0, 760.0),
            ] {
                source.add_vector(page, VectorPrimitive::line(x0, y0, x1, y1));
            }
            source.add_span(Span::new("Alpha", BBox::new(110.0, 708.0, 135.0, 718.0), "Times", 10.0, page));
            source.add_span(Span::new("Beta", BBox::new(110.0, 738.0, 130.0, 748.0), "Times", 10.0, page));
        }
    }
    source
}

/// Levels after negative values are raised to 0 and skips are cut to one step.
fn clamped_levels(outline: &[OutlineEntry]) -> Vec<u8> {
    let mut levels = Vec::with_capacity(outline.len());
    let mut prev: Option<i32> = None;
    for entry in outline {
        let level = entry.level.max(0).min(prev.map_or(0, |p| p + 1));
        levels.push(level as u8);
        prev = Some(level);
    }
    levels
}

proptest! {
    #[test]
    fn section_ranges_are_nested(page_count in 1u32..30, outline in prop::collection::vec(outline_entry(), 1..20)) {
        let entries = outline.len();
        let doc = parse_outline(page_count, outline);

        prop_assert_eq!(doc.sections.len(), entries + 1);
        prop_assert_eq!(doc.root().page_range(), 0..=page_count - 1);

        for section in &doc.sections {
            prop_assert!(section.start_page <= section.end_page);
            prop_assert!(section.end_page < page_count);

            if let Some(parent) = section.parent.and_then(|id| doc.section(id)) {
                prop_assert!(parent.start_page <= section.start_page);
                prop_assert!(section.end_page <= parent.end_page);
            }

            let children: Vec<_> = doc.children(section.id).collect();
            for pair in children.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                prop_assert!(a.start_page <= b.start_page);
                // Contiguous: no gap, at most one shared boundary page
                prop_assert!(
                    a.end_page + 1 == b.start_page || a.end_page == b.start_page,
                    "siblings {:?} and {:?} are not contiguous",
                    a.page_range(),
                    b.page_range()
                );
            }
            if let Some(last) = children.last() {
                prop_assert_eq!(last.end_page, section.end_page);
            }
        }
    }

    #[test]
    fn nesting_follows_clamped_levels(page_count in 1u32..30, outline in prop::collection::vec(outline_entry(), 1..20)) {
        let expected = clamped_levels(&outline);
        let doc = parse_outline(page_count, outline);

        for (section, level) in doc.sections[1..].iter().zip(expected) {
            prop_assert_eq!(section.level, Some(level));
            prop_assert_eq!(doc.depth(section.id), usize::from(level) + 1);
        }
    }

    #[test]
    fn titles_are_never_empty(page_count in 1u32..10, outline in prop::collection::vec(outline_entry(), 1..10)) {
        let doc = parse_outline(page_count, outline);
        for (_, section) in doc.walk() {
            prop_assert!(!section.title.trim().is_empty());
        }
    }

    #[test]
    fn normalize_is_idempotent(rows in prop::collection::vec(prop::collection::vec(("[a-z]{0,4}", 0u32..4), 0..5), 0..6)) {
        let mut table = Table::new(0, BBox::new(0.0, 0.0, 100.0, 100.0), DetectionMethod::Inferred);
        for row in rows {
            table.add_row(TableRow::new(
                row.into_iter().map(|(text, span)| TableCell::text(text).colspan(span)).collect(),
            ));
        }

        table.normalize();
        let once = table.clone();
        table.normalize();

        prop_assert_eq!(&table, &once);
        prop_assert!(table.is_rectangular());
    }

    #[test]
    fn every_span_is_placed_once(pages in prop::collection::vec(page_layout(), 1..4)) {
        let source = layout_source(&pages);
        let total: usize = (0..source.page_count())
            .map(|page| source.page_spans(page).map_or(0, |spans| spans.len()))
            .sum();

        for options in [ParseOptions::default().sequential(), ParseOptions::default().with_tables(false)] {
            let doc = parse_source_with_options(&source, options).unwrap();
            prop_assert_eq!(doc.stats().span_count, total);
        }
    }
}
