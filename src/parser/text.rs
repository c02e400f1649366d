//! Text composition from spans.

use std::cmp::Ordering;
use std::ops::Range;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::model::Span;

/// Joins spans into text and normalizes the result.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    hyphen_break: Regex,
    whitespace: Regex,
}

impl TextNormalizer {
    /// Compile the normalization patterns.
    pub fn new() -> Result<Self> {
        Ok(Self {
            hyphen_break: Regex::new(r"(\p{L})[-\u{00AD}][ \t]*\n\s*(\p{Ll})")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    /// Compose spans (already in reading order) into normalized text.
    pub fn compose(&self, spans: &[&Span]) -> String {
        self.normalize(&join_spans(spans))
    }

    /// NFC-normalize, repair line-break hyphenation and collapse whitespace.
    pub fn normalize(&self, raw: &str) -> String {
        let nfc: String = raw.nfc().collect();
        let joined = self.hyphen_break.replace_all(&nfc, "${1}${2}");
        self.whitespace.replace_all(&joined, " ").trim().to_string()
    }
}

/// Join spans, inserting spaces between words on a line and newlines between lines.
pub fn join_spans(spans: &[&Span]) -> String {
    let mut result = String::new();

    for (i, span) in spans.iter().enumerate() {
        if i == 0 {
            result.push_str(&span.text);
            continue;
        }

        let prev = spans[i - 1];
        if !prev.same_line(span) {
            result.push('\n');
            result.push_str(&span.text);
            continue;
        }

        let gap = span.bbox.x0 - prev.bbox.x1;

        // Estimate average character width from current span
        let char_count = span.text.chars().count();
        let avg_char_width = if char_count > 0 && span.bbox.width() > 0.0 {
            span.bbox.width() / char_count as f32
        } else {
            span.size * 0.5
        };

        let should_insert_space = if gap > avg_char_width * 0.2 {
            let prev_is_cjk = prev
                .text
                .chars()
                .last()
                .map(is_spaceless_script_char)
                .unwrap_or(false);
            let curr_is_cjk = span
                .text
                .chars()
                .next()
                .map(is_spaceless_script_char)
                .unwrap_or(false);
            !(prev_is_cjk && curr_is_cjk)
        } else {
            false
        };

        let prev_ends_with_space = prev.text.ends_with(' ') || prev.text.ends_with('\u{00A0}');
        let curr_starts_with_space = span.text.starts_with(' ') || span.text.starts_with('\u{00A0}');

        if should_insert_space && !prev_ends_with_space && !curr_starts_with_space {
            result.push(' ');
        }
        result.push_str(&span.text);
    }

    result
}

/// Reading order: top edge ascending, then left edge.
pub fn reading_order(a: &Span, b: &Span) -> Ordering {
    a.bbox
        .y0
        .partial_cmp(&b.bbox.y0)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap_or(Ordering::Equal))
}

/// Sort a page's spans into reading order: lines top to bottom, spans left to right.
pub fn into_reading_order(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by(reading_order);
    for range in line_ranges(&spans) {
        spans[range].sort_by(|a, b| a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap_or(Ordering::Equal));
    }
    spans
}

/// Ranges of consecutive spans (in reading order) that share a visual line.
pub fn line_ranges(spans: &[Span]) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;

    for i in 1..spans.len() {
        if !spans[start].same_line(&spans[i]) {
            ranges.push(start..i);
            start = i;
        }
    }
    if !spans.is_empty() {
        ranges.push(start..spans.len());
    }
    ranges
}

/// Count non-whitespace characters.
pub fn visible_len(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Scripts written without inter-word spaces.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn span(text: &str, x0: f32, y0: f32) -> Span {
        let width = text.chars().count() as f32 * 5.0;
        Span::new(text, BBox::new(x0, y0, x0 + width, y0 + 10.0), "Times", 10.0, 0)
    }

    #[test]
    fn test_join_inserts_spaces_by_gap() {
        let a = span("Hello", 0.0, 0.0);
        let b = span("world", 30.0, 0.0);
        let c = span("ly", 55.0, 0.0);
        assert_eq!(join_spans(&[&a, &b, &c]), "Hello worldly");
    }

    #[test]
    fn test_join_cjk_without_spaces() {
        let a = span("日本", 0.0, 0.0);
        let b = span("語", 15.0, 0.0);
        assert_eq!(join_spans(&[&a, &b]), "日本語");
    }

    #[test]
    fn test_normalize_repairs_hyphenation() {
        let normalizer = TextNormalizer::new().unwrap();
        let a = span("The docu-", 0.0, 0.0);
        let b = span("ment  is   here", 0.0, 12.0);
        assert_eq!(normalizer.compose(&[&a, &b]), "The document is here");
    }

    #[test]
    fn test_normalize_keeps_capitalized_hyphen() {
        let normalizer = TextNormalizer::new().unwrap();
        assert_eq!(normalizer.normalize("Jean-\nPaul"), "Jean- Paul");
    }

    #[test]
    fn test_normalize_nfc() {
        let normalizer = TextNormalizer::new().unwrap();
        assert_eq!(normalizer.normalize("Cafe\u{0301}"), "Caf\u{00E9}");
    }

    #[test]
    fn test_reading_order() {
        let mut spans = [span("b", 50.0, 10.0), span("c", 0.0, 20.0), span("a", 0.0, 10.0)];
        spans.sort_by(reading_order);
        let texts: Vec<_> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_into_reading_order_fixes_jitter() {
        let spans = vec![
            span("second", 40.0, 100.0),
            span("first", 0.0, 100.8),
            span("next", 0.0, 115.0),
        ];
        let ordered = into_reading_order(spans);
        let texts: Vec<_> = ordered.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "next"]);
        assert_eq!(line_ranges(&ordered), vec![0..2, 2..3]);
    }

    #[test]
    fn test_visible_len() {
        assert_eq!(visible_len(" a b\tc "), 3);
    }
}
