//! Structural inference over page primitives.

mod assembler;
mod content;
mod options;
mod pipeline;
mod structure;
mod table_detector;
mod text;

pub use assembler::DocumentAssembler;
pub use content::ContentOrganizer;
pub use options::ParseOptions;
pub use pipeline::{extract_title, StructureParser, UNTITLED_DOCUMENT};
pub use structure::{FontStatistics, SectionTree, StructureDetector, UNTITLED_SECTION};
pub use table_detector::{PageTables, TableDetector, TableDetectorConfig};
pub use text::{into_reading_order, join_spans, TextNormalizer};

/// Identity of a span: page index plus position in that page's
/// reading-ordered span list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpanRef {
    /// Page index (0-based).
    pub page: u32,
    /// Index into the page's spans after reading-order sorting.
    pub index: usize,
}
