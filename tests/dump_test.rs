//! Tests for loading primitive dumps from disk.

use std::io::Write;

use pdfstruct::{parse_dump_file, BBox, Error, MemorySource, OutlineEntry, PdfStruct, PrimitiveSource, Span};
use tempfile::NamedTempFile;

const DUMP: &str = r#"{
  "metadata": {
    "title": "  ",
    "author": "Research Group",
    "created": "D:20240115103000+09'00'"
  },
  "outline": [
    {"title": "Summary", "level": 0, "page": 0},
    {"title": "Details", "level": 0, "page": 1}
  ],
  "pages": [
    {
      "spans": [
        {"text": "Quarterly figures", "bbox": {"x0": 72, "y0": 90, "x1": 180, "y1": 100}, "font": "Times", "size": 10}
      ]
    },
    {
      "spans": [
        {"text": "Alpha", "bbox": {"x0": 110, "y0": 108, "x1": 135, "y1": 118}, "font": "Times", "size": 10},
        {"text": "Beta", "bbox": {"x0": 110, "y0": 138, "x1": 130, "y1": 148}, "font": "Times", "size": 10}
      ],
      "vectors": [
        {"kind": "line", "x0": 100, "y0": 100, "x1": 300, "y1": 100},
        {"kind": "line", "x0": 100, "y0": 130, "x1": 300, "y1": 130},
        {"kind": "line", "x0": 100, "y0": 160, "x1": 300, "y1": 160},
        {"kind": "line", "x0": 100, "y0": 100, "x1": 100, "y1": 160},
        {"kind": "line", "x0": 300, "y0": 100, "x1": 300, "y1": 160}
      ]
    }
  ]
}"#;

fn write_dump(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_parse_dump_file() {
    let file = write_dump(DUMP);
    let doc = parse_dump_file(file.path()).unwrap();

    assert_eq!(doc.page_count, 2);
    // Blank metadata title falls through to the first line
    assert_eq!(doc.title, "Quarterly figures");
    assert_eq!(doc.metadata.author.as_deref(), Some("Research Group"));
    assert_eq!(
        doc.metadata.created.map(|d| d.to_rfc3339()).as_deref(),
        Some("2024-01-15T01:30:00+00:00")
    );

    let details = doc.find_by_title("Details").unwrap();
    assert_eq!(details.tables.len(), 1);
    assert_eq!(details.tables[0].rows[0].cells[0].text, "Alpha");
}

#[test]
fn test_builder_parse_file() {
    let file = write_dump(DUMP);
    let result = PdfStruct::new().with_toc().parse_file(file.path()).unwrap();

    let markdown = result.to_markdown().unwrap();
    assert!(markdown.contains("- [Summary](#summary) (Page 1)"));
    assert!(markdown.contains("| Alpha |"));
    assert_eq!(
        result.to_tree(),
        "Quarterly figures [Pages 1-2]\n|-- Summary [Page 1]\n`-- Details [Page 2]\n"
    );
}

#[test]
fn test_invalid_dump_is_an_error() {
    let file = write_dump("{\"pages\": 3}");
    assert!(matches!(parse_dump_file(file.path()), Err(Error::InvalidDump(_))));
}

#[test]
fn test_dump_round_trip_through_disk() {
    let mut source = MemorySource::new(1)
        .with_outline(vec![OutlineEntry::new("Only", 0, Some(0))])
        .with_spans(vec![Span::new("Hello", BBox::new(0.0, 0.0, 25.0, 10.0), "Times", 10.0, 0)]);
    source.fail_page(0, "broken");

    let file = write_dump(&source.to_json().unwrap());
    let loaded = MemorySource::from_path(file.path()).unwrap();

    assert_eq!(loaded.page_count(), 1);
    assert_eq!(loaded.outline().unwrap(), vec![OutlineEntry::new("Only", 0, Some(0))]);
    assert!(matches!(loaded.page_spans(0), Err(Error::PageReadFailure { page: 0, .. })));
}
