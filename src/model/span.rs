//! Page primitives supplied by the decoding layer.

use serde::{Deserialize, Serialize};

use super::BBox;

/// A run of text with uniform font and position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The text content
    pub text: String,
    /// Bounding box in page coordinates
    pub bbox: BBox,
    /// Font family (e.g., "Helvetica")
    pub font: String,
    /// Font size in points
    pub size: f32,
    /// Bold weight
    #[serde(default)]
    pub bold: bool,
    /// Italic or oblique style
    #[serde(default)]
    pub italic: bool,
    /// Page index (0-based)
    #[serde(default)]
    pub page: u32,
}

impl Span {
    /// Create a span, inferring weight and style from the font name.
    pub fn new(text: impl Into<String>, bbox: BBox, font: impl Into<String>, size: f32, page: u32) -> Self {
        let font = font.into();
        let lower = font.to_lowercase();
        let bold = lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let italic = lower.contains("italic") || lower.contains("oblique");

        Self {
            text: text.into(),
            bbox,
            font,
            size,
            bold,
            italic,
            page,
        }
    }

    /// Set the bold flag and return self.
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set the italic flag and return self.
    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Font size rounded to 0.1pt, used as a histogram key.
    pub fn size_key(&self) -> i32 {
        (self.size * 10.0).round() as i32
    }

    /// Check whether the span carries any visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Check whether two spans sit on the same visual line.
    ///
    /// Spans share a line when their vertical overlap covers at least half
    /// of the smaller box.
    pub fn same_line(&self, other: &Span) -> bool {
        let min_height = self.bbox.height().min(other.bbox.height());
        if min_height <= 0.0 {
            return (self.bbox.y0 - other.bbox.y0).abs() <= self.size.max(other.size) * 0.3;
        }
        self.bbox.vertical_overlap(&other.bbox) >= min_height * 0.5
    }
}

/// A vector drawing primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VectorPrimitive {
    /// A straight line segment from `(x0, y0)` to `(x1, y1)`
    Line { x0: f32, y0: f32, x1: f32, y1: f32 },
    /// An axis-aligned rectangle
    Rect { x0: f32, y0: f32, x1: f32, y1: f32 },
}

impl VectorPrimitive {
    /// Create a line primitive.
    pub fn line(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        VectorPrimitive::Line { x0, y0, x1, y1 }
    }

    /// Create a rectangle primitive.
    pub fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        VectorPrimitive::Rect { x0, y0, x1, y1 }
    }
}

/// An entry of the embedded outline (bookmarks).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Entry title
    pub title: String,
    /// Nesting level (0 = top level)
    pub level: i32,
    /// Target page index (0-based), if the destination could be resolved
    pub page: Option<i64>,
}

impl OutlineEntry {
    /// Create a new outline entry.
    pub fn new(title: impl Into<String>, level: i32, page: Option<i64>) -> Self {
        Self {
            title: title.into(),
            level,
            page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_style_detection() {
        let span = Span::new("Test", BBox::default(), "Helvetica-Bold", 12.0, 0);
        assert!(span.bold);
        assert!(!span.italic);

        let span = Span::new("Test", BBox::default(), "Times-Oblique", 12.0, 0);
        assert!(!span.bold);
        assert!(span.italic);
    }

    #[test]
    fn test_same_line() {
        let a = Span::new("A", BBox::new(0.0, 100.0, 20.0, 112.0), "F", 12.0, 0);
        let b = Span::new("B", BBox::new(30.0, 101.0, 50.0, 113.0), "F", 12.0, 0);
        let c = Span::new("C", BBox::new(0.0, 115.0, 20.0, 127.0), "F", 12.0, 0);
        assert!(a.same_line(&b));
        assert!(!a.same_line(&c));
    }

    #[test]
    fn test_vector_primitive_json_shape() {
        let json = serde_json::to_string(&VectorPrimitive::line(0.0, 1.0, 2.0, 1.0)).unwrap();
        assert!(json.contains("\"kind\":\"line\""));
        let back: VectorPrimitive = serde_json::from_str(&json).unwrap();
        assert_eq!(back, VectorPrimitive::line(0.0, 1.0, 2.0, 1.0));
    }
}
