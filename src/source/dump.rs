//! In-memory primitive source and its JSON dump format.
//!
//! A dump is a JSON object of the form
//!
//! ```json
//! {
//!   "metadata": { "title": "Report", "created": "D:20240115103045" },
//!   "outline": [ { "title": "Intro", "level": 0, "page": 0 } ],
//!   "pages": [
//!     {
//!       "spans": [ { "text": "Intro", "bbox": { "x0": 72, "y0": 72, "x1": 120, "y1": 88 },
//!                    "font": "Helvetica-Bold", "size": 16, "bold": true } ],
//!       "vectors": [ { "kind": "line", "x0": 72, "y0": 200, "x1": 500, "y1": 200 } ]
//!     }
//!   ]
//! }
//! ```
//!
//! Dates accept RFC 3339 or the PDF `D:YYYYMMDDHHmmSS` form. A page may carry
//! an `"error"` string to record that the decoder could not read it.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PrimitiveSource;
use crate::error::{Error, Result};
use crate::model::{Metadata, OutlineEntry, Span, VectorPrimitive};

/// Primitives of a single page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageDump {
    /// Text spans
    #[serde(default)]
    pub spans: Vec<Span>,

    /// Vector primitives
    #[serde(default)]
    pub vectors: Vec<VectorPrimitive>,

    /// Decoder failure for this page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A [`PrimitiveSource`] holding every page in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDump")]
pub struct MemorySource {
    metadata: Metadata,
    outline: Vec<OutlineEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outline_error: Option<String>,
    pages: Vec<PageDump>,
}

impl MemorySource {
    /// Create a source with `page_count` empty pages.
    pub fn new(page_count: u32) -> Self {
        Self {
            pages: vec![PageDump::default(); page_count as usize],
            ..Default::default()
        }
    }

    /// Parse a dump from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a dump from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a dump file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let source = Self::from_reader(BufReader::new(file))?;
        log::debug!(
            "loaded primitive dump {} ({} pages)",
            path.as_ref().display(),
            source.pages.len()
        );
        Ok(source)
    }

    /// Serialize the source back to dump JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Set metadata and return self.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set the outline and return self.
    pub fn with_outline(mut self, outline: Vec<OutlineEntry>) -> Self {
        self.outline = outline;
        self
    }

    /// Mark the outline as unreadable.
    pub fn with_outline_error(mut self, reason: impl Into<String>) -> Self {
        self.outline_error = Some(reason.into());
        self
    }

    /// Add a span to the page named by `span.page`, growing the document if needed.
    pub fn add_span(&mut self, span: Span) {
        let page = self.page_mut(span.page);
        page.spans.push(span);
    }

    /// Add several spans.
    pub fn with_spans(mut self, spans: impl IntoIterator<Item = Span>) -> Self {
        for span in spans {
            self.add_span(span);
        }
        self
    }

    /// Add a vector primitive to a page, growing the document if needed.
    pub fn add_vector(&mut self, page: u32, vector: VectorPrimitive) {
        self.page_mut(page).vectors.push(vector);
    }

    /// Mark a page as unreadable.
    pub fn fail_page(&mut self, page: u32, reason: impl Into<String>) {
        self.page_mut(page).error = Some(reason.into());
    }

    fn page_mut(&mut self, page: u32) -> &mut PageDump {
        let index = page as usize;
        if index >= self.pages.len() {
            self.pages.resize_with(index + 1, PageDump::default);
        }
        &mut self.pages[index]
    }

    fn page(&self, page: u32) -> Result<&PageDump> {
        let dump = self
            .pages
            .get(page as usize)
            .ok_or(Error::PageOutOfRange(page, self.page_count()))?;
        match &dump.error {
            Some(reason) => Err(Error::PageReadFailure {
                page,
                reason: reason.clone(),
            }),
            None => Ok(dump),
        }
    }
}

impl PrimitiveSource for MemorySource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn outline(&self) -> Result<Vec<OutlineEntry>> {
        match &self.outline_error {
            Some(reason) => Err(Error::InvalidOutline(reason.clone())),
            None => Ok(self.outline.clone()),
        }
    }

    fn page_spans(&self, page: u32) -> Result<Vec<Span>> {
        let dump = self.page(page)?;
        Ok(dump
            .spans
            .iter()
            .cloned()
            .map(|mut span| {
                span.page = page;
                span
            })
            .collect())
    }

    fn page_vectors(&self, page: u32) -> Result<Vec<VectorPrimitive>> {
        Ok(self.page(page)?.vectors.clone())
    }

    fn metadata(&self) -> Metadata {
        self.metadata.clone()
    }
}

/// Dump layout as read from disk, before date parsing.
#[derive(Deserialize)]
struct RawDump {
    #[serde(default)]
    metadata: RawMetadata,
    #[serde(default)]
    outline: Vec<OutlineEntry>,
    #[serde(default)]
    outline_error: Option<String>,
    #[serde(default)]
    pages: Vec<PageDump>,
}

#[derive(Default, Deserialize)]
struct RawMetadata {
    title: Option<String>,
    author: Option<String>,
    subject: Option<String>,
    keywords: Option<String>,
    creator: Option<String>,
    producer: Option<String>,
    created: Option<String>,
    modified: Option<String>,
}

impl From<RawDump> for MemorySource {
    fn from(raw: RawDump) -> Self {
        let m = raw.metadata;
        let metadata = Metadata {
            title: non_empty(m.title),
            author: non_empty(m.author),
            subject: non_empty(m.subject),
            keywords: non_empty(m.keywords),
            creator: non_empty(m.creator),
            producer: non_empty(m.producer),
            created: m.created.as_deref().and_then(parse_date),
            modified: m.modified.as_deref().and_then(parse_date),
        };

        Self {
            metadata,
            outline: raw.outline,
            outline_error: raw.outline_error,
            pages: raw.pages,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse an RFC 3339 timestamp or a PDF date string (`D:YYYYMMDDHHmmSS`).
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let Some(s) = s.strip_prefix("D:") else {
        log::debug!("unrecognized date {:?}", s);
        return None;
    };

    // At minimum we need YYYY
    if s.len() < 4 {
        return None;
    }

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month: u32 = s.get(4..6).and_then(|m| m.parse().ok()).unwrap_or(1);
    let day: u32 = s.get(6..8).and_then(|d| d.parse().ok()).unwrap_or(1);
    let hour: u32 = s.get(8..10).and_then(|h| h.parse().ok()).unwrap_or(0);
    let minute: u32 = s.get(10..12).and_then(|m| m.parse().ok()).unwrap_or(0);
    let second: u32 = s.get(12..14).and_then(|s| s.parse().ok()).unwrap_or(0);

    let local = chrono::NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    let offset = s.get(14..).map_or(0, utc_offset_seconds);
    Some(DateTime::from_naive_utc_and_offset(
        local - chrono::Duration::seconds(offset),
        Utc,
    ))
}

/// Offset suffix of a PDF date (`Z`, `+HH'mm'` or `-HH'mm'`) in seconds east of UTC.
fn utc_offset_seconds(suffix: &str) -> i64 {
    let sign = match suffix.chars().next() {
        Some('+') => 1,
        Some('-') => -1,
        _ => return 0,
    };
    let digits: String = suffix[1..].chars().filter(char::is_ascii_digit).collect();
    let hours: i64 = digits.get(0..2).and_then(|h| h.parse().ok()).unwrap_or(0);
    let minutes: i64 = digits.get(2..4).and_then(|m| m.parse().ok()).unwrap_or(0);
    sign * (hours * 3600 + minutes * 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;
    use chrono::Datelike;

    #[test]
    fn test_parse_pdf_date() {
        let date = parse_date("D:20240115103045").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_parse_pdf_date_with_offset() {
        let date = parse_date("D:20240115103000+09'00'").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-01-15T01:30:00+00:00");
        let date = parse_date("D:20240115103000-05'30'").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-01-15T16:00:00+00:00");
    }

    #[test]
    fn test_parse_pdf_date_minimal() {
        let date = parse_date("D:2024").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 1);
    }

    #[test]
    fn test_parse_rfc3339_date() {
        let date = parse_date("2023-06-01T12:00:00Z").unwrap();
        assert_eq!(date.year(), 2023);
        assert!(parse_date("yesterday").is_none());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "metadata": { "title": "Report", "author": "  ", "created": "D:20240115" },
            "outline": [ { "title": "Intro", "level": 0, "page": 0 } ],
            "pages": [
                { "spans": [ { "text": "Hi", "bbox": { "x0": 0, "y0": 0, "x1": 10, "y1": 10 },
                               "font": "Helvetica", "size": 10 } ] },
                { "error": "corrupt content stream" }
            ]
        }"#;

        let source = MemorySource::from_json(json).unwrap();
        assert_eq!(source.page_count(), 2);
        assert_eq!(source.metadata().title.as_deref(), Some("Report"));
        assert_eq!(source.metadata().author, None);
        assert!(source.metadata().created.is_some());
        assert_eq!(source.outline().unwrap().len(), 1);

        let spans = source.page_spans(0).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].page, 0);
        assert!(!spans[0].bold);

        assert!(matches!(
            source.page_spans(1),
            Err(Error::PageReadFailure { page: 1, .. })
        ));
        assert!(matches!(
            source.page_vectors(5),
            Err(Error::PageOutOfRange(5, 2))
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            MemorySource::from_json("{\"pages\": 3}"),
            Err(Error::InvalidDump(_))
        ));
    }

    #[test]
    fn test_builder_and_round_trip() {
        let mut source = MemorySource::new(1)
            .with_outline(vec![OutlineEntry::new("Intro", 0, Some(0))])
            .with_spans([Span::new(
                "Body",
                BBox::new(0.0, 0.0, 20.0, 10.0),
                "Times",
                10.0,
                2,
            )]);
        source.add_vector(0, VectorPrimitive::rect(0.0, 0.0, 5.0, 5.0));

        assert_eq!(source.page_count(), 3);
        assert_eq!(source.page_spans(2).unwrap()[0].text, "Body");

        let json = source.to_json().unwrap();
        let back = MemorySource::from_json(&json).unwrap();
        assert_eq!(back, source);
    }

    #[test]
    fn test_outline_error() {
        let source = MemorySource::new(1).with_outline_error("dangling reference");
        assert!(matches!(source.outline(), Err(Error::InvalidOutline(_))));
    }
}
