//! Content blocks.

use super::{BBox, Span};
use serde::{Deserialize, Serialize};

/// A run of spans merged into one paragraph or line group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Page index (0-based)
    pub page: u32,

    /// Union of the span boxes
    pub bbox: BBox,

    /// Source spans in reading order
    pub spans: Vec<Span>,

    /// Normalized text of the block
    pub text: String,
}

impl ContentBlock {
    /// Create a block from spans and their derived text.
    ///
    /// Returns `None` when `spans` is empty.
    pub fn new(spans: Vec<Span>, text: impl Into<String>) -> Option<Self> {
        let first = spans.first()?;
        let page = first.page;
        let bbox = BBox::union_all(spans.iter().map(|s| &s.bbox))?;

        Some(Self {
            page,
            bbox,
            spans,
            text: text.into(),
        })
    }

    /// Number of spans merged into the block.
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    /// Check if the block has no visible text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Top edge of the block, used for ordering.
    pub fn top(&self) -> f32 {
        self.bbox.y0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_from_spans() {
        let spans = vec![
            Span::new("Hello", BBox::new(10.0, 100.0, 40.0, 112.0), "Helvetica", 12.0, 3),
            Span::new("world", BBox::new(45.0, 100.0, 80.0, 112.0), "Helvetica", 12.0, 3),
        ];
        let block = ContentBlock::new(spans, "Hello world").unwrap();
        assert_eq!(block.page, 3);
        assert_eq!(block.bbox, BBox::new(10.0, 100.0, 80.0, 112.0));
        assert_eq!(block.span_count(), 2);
        assert!(!block.is_empty());
    }

    #[test]
    fn test_block_requires_spans() {
        assert!(ContentBlock::new(Vec::new(), "").is_none());
    }
}
