//! # pdfstruct
//!
//! Structural inference for PDF page primitives.
//!
//! Given the text spans and vector lines a PDF decoder produces for each
//! page, this library recovers the document's logical structure: a section
//! hierarchy with page ranges, reading-order content blocks attached to
//! sections, and tables extracted from ruling lines or text alignment.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfstruct::{parse_dump_file, render};
//!
//! fn main() -> pdfstruct::Result<()> {
//!     // Load primitives dumped by a PDF decoder
//!     let doc = parse_dump_file("report.json")?;
//!
//!     // Print the section outline
//!     print!("{}", render::to_tree(&doc, &render::RenderOptions::default()));
//!
//!     // Convert to Markdown
//!     let markdown = render::to_markdown(&doc, &render::RenderOptions::default())?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Outline or typography**: sections come from the embedded outline, or
//!   from font size and weight when there is none
//! - **Tables**: bordered grids from ruling lines, borderless tables from
//!   column alignment
//! - **Recoverable parsing**: problems become warnings on the document
//! - **Parallel processing**: pages are read and scanned for tables with Rayon
//! - **Output formats**: JSON, Markdown and a text tree

pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{
    BBox, ContentBlock, DetectionMethod, Document, DocumentStats, Metadata, OutlineEntry, Section, SectionId,
    Span, Table, TableCell, TableRow, VectorPrimitive, Warning, WarningKind,
};
pub use parser::{ParseOptions, StructureParser, TableDetectorConfig};
pub use render::{JsonFormat, RenderOptions, TableFallback, TreeStyle};
pub use source::{MemorySource, PrimitiveSource};

use std::io::Read;
use std::path::Path;

/// Parse a primitive source with default options.
///
/// # Example
///
/// ```
/// use pdfstruct::{parse_source, MemorySource};
///
/// let doc = parse_source(&MemorySource::new(3)).unwrap();
/// assert_eq!(doc.page_count, 3);
/// ```
pub fn parse_source<S: PrimitiveSource + ?Sized>(source: &S) -> Result<Document> {
    parse_source_with_options(source, ParseOptions::default())
}

/// Parse a primitive source with custom options.
pub fn parse_source_with_options<S: PrimitiveSource + ?Sized>(source: &S, options: ParseOptions) -> Result<Document> {
    StructureParser::new(options)?.parse(source)
}

/// Parse a primitive dump file.
///
/// The file stem is used as the title when neither the metadata nor the
/// first page provides one.
pub fn parse_dump_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    parse_dump_file_with_options(path, ParseOptions::default())
}

/// Parse a primitive dump file with custom options.
pub fn parse_dump_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let path = path.as_ref();
    let source = MemorySource::from_path(path)?;

    let options = match path.file_stem() {
        Some(stem) if options.fallback_title.is_none() => options.with_fallback_title(stem.to_string_lossy()),
        _ => options,
    };
    parse_source_with_options(&source, options)
}

/// Parse a primitive dump from a reader.
pub fn parse_dump_reader<R: Read>(reader: R) -> Result<Document> {
    let source = MemorySource::from_reader(reader)?;
    parse_source(&source)
}

/// Builder for parsing and rendering documents.
///
/// # Example
///
/// ```
/// use pdfstruct::{MemorySource, PdfStruct};
///
/// let markdown = PdfStruct::new()
///     .heuristic_only()
///     .with_toc()
///     .parse(&MemorySource::new(1))?
///     .to_markdown()?;
/// assert!(markdown.starts_with("# Untitled document"));
/// # Ok::<(), pdfstruct::Error>(())
/// ```
pub struct PdfStruct {
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl PdfStruct {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Ignore the outline and infer headings from typography.
    pub fn heuristic_only(mut self) -> Self {
        self.parse_options = self.parse_options.heuristic_only();
        self
    }

    /// Skip table detection.
    pub fn without_tables(mut self) -> Self {
        self.parse_options = self.parse_options.with_tables(false);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parse_options = self.parse_options.sequential();
        self
    }

    /// Replace the parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Enable frontmatter in Markdown output.
    pub fn with_frontmatter(mut self) -> Self {
        self.render_options = self.render_options.with_frontmatter(true);
        self
    }

    /// Emit a table of contents in Markdown output.
    pub fn with_toc(mut self) -> Self {
        self.render_options = self.render_options.with_toc(true);
        self
    }

    /// Set table fallback mode.
    pub fn with_table_fallback(mut self, fallback: TableFallback) -> Self {
        self.render_options = self.render_options.with_table_fallback(fallback);
        self
    }

    /// Replace the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Parse a source and return a result wrapper.
    pub fn parse<S: PrimitiveSource + ?Sized>(self, source: &S) -> Result<StructuredResult> {
        let document = parse_source_with_options(source, self.parse_options)?;
        Ok(StructuredResult {
            document,
            render_options: self.render_options,
        })
    }

    /// Parse a primitive dump file.
    pub fn parse_file<P: AsRef<Path>>(self, path: P) -> Result<StructuredResult> {
        let document = parse_dump_file_with_options(path, self.parse_options)?;
        Ok(StructuredResult {
            document,
            render_options: self.render_options,
        })
    }
}

impl Default for PdfStruct {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed document together with its render settings.
pub struct StructuredResult {
    /// The parsed document
    pub document: Document,
    render_options: RenderOptions,
}

impl StructuredResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.document, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Render the section outline.
    pub fn to_tree(&self) -> String {
        render::to_tree(&self.document, &self.render_options)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builder_options() {
        let builder = PdfStruct::new()
            .heuristic_only()
            .without_tables()
            .sequential()
            .with_frontmatter()
            .with_table_fallback(TableFallback::Html);

        assert!(!builder.parse_options.use_toc);
        assert!(!builder.parse_options.detect_tables);
        assert!(!builder.parse_options.parallel);
        assert!(builder.render_options.include_frontmatter);
        assert_eq!(builder.render_options.table_fallback, TableFallback::Html);
    }

    #[test]
    fn test_builder_default() {
        let builder = PdfStruct::default();
        assert!(!builder.render_options.include_frontmatter);
        assert!(builder.parse_options.use_toc);
    }

    #[test]
    fn test_parse_dump_file_uses_stem_as_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quarterly.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(br#"{"pages": [{"spans": []}, {"spans": []}]}"#).unwrap();

        let doc = parse_dump_file(&path).unwrap();
        assert_eq!(doc.title, "quarterly");
        assert_eq!(doc.page_count, 2);
    }

    #[test]
    fn test_parse_dump_file_missing() {
        let result = parse_dump_file("/nonexistent/dump.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_parse_dump_reader_invalid() {
        let result = parse_dump_reader(&b"not json"[..]);
        assert!(matches!(result, Err(Error::InvalidDump(_))));
    }

    #[test]
    fn test_result_renders_all_formats() {
        let result = PdfStruct::new().parse(&MemorySource::new(2)).unwrap();

        assert!(result.to_markdown().unwrap().starts_with("# Untitled document"));
        assert!(result.to_json(JsonFormat::Compact).unwrap().contains("\"page_count\":2"));
        assert_eq!(result.to_tree(), "Untitled document [Pages 1-2]\n");
        assert_eq!(result.document().sections.len(), 1);
    }
}
