//! Document model types for structural inference.
//!
//! Page primitives ([`Span`], [`VectorPrimitive`], [`OutlineEntry`]) come in;
//! a [`Document`] holding a section arena, content blocks and tables comes
//! out. All coordinates use a top-left origin with `y` growing downward and
//! page indices are 0-based.

mod content;
mod document;
mod geometry;
mod section;
mod span;
mod table;
mod warning;

pub use content::ContentBlock;
pub use document::{Document, DocumentStats, Metadata};
pub use geometry::BBox;
pub use section::{Section, SectionId};
pub use span::{OutlineEntry, Span, VectorPrimitive};
pub use table::{DetectionMethod, Table, TableCell, TableRow};
pub use warning::{Warning, WarningKind};
