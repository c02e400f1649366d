//! Page primitive sources.
//!
//! A [`PrimitiveSource`] is the seam between a PDF decoding layer and the
//! structural pipeline: it hands out per-page text spans and vector
//! primitives plus an optional outline, without exposing any decoder
//! types. The pipeline reads pages concurrently, so sources must be `Sync`.

mod dump;

pub use dump::{MemorySource, PageDump};

use crate::error::Result;
use crate::model::{Metadata, OutlineEntry, Span, VectorPrimitive};

/// Abstract interface for decoded page content.
pub trait PrimitiveSource: Sync {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Embedded outline entries in document order (empty when absent).
    fn outline(&self) -> Result<Vec<OutlineEntry>>;

    /// Text spans of a page, in no particular order.
    fn page_spans(&self, page: u32) -> Result<Vec<Span>>;

    /// Vector line and rectangle primitives of a page.
    fn page_vectors(&self, page: u32) -> Result<Vec<VectorPrimitive>>;

    /// Document information dictionary.
    fn metadata(&self) -> Metadata {
        Metadata::default()
    }
}

impl<T: PrimitiveSource + ?Sized> PrimitiveSource for &T {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn outline(&self) -> Result<Vec<OutlineEntry>> {
        (**self).outline()
    }

    fn page_spans(&self, page: u32) -> Result<Vec<Span>> {
        (**self).page_spans(page)
    }

    fn page_vectors(&self, page: u32) -> Result<Vec<VectorPrimitive>> {
        (**self).page_vectors(page)
    }

    fn metadata(&self) -> Metadata {
        (**self).metadata()
    }
}
