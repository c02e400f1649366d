//! Parsing options and configuration.

use super::table_detector::TableDetectorConfig;

/// Options for structural parsing.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Whether to run table detection
    pub detect_tables: bool,

    /// Whether to build sections from the embedded outline when present
    pub use_toc: bool,

    /// Minimum ratio of heading size to body size
    pub heading_size_ratio: f32,

    /// Maximum number of heading levels inferred from typography
    pub max_heading_depth: u8,

    /// Minimum heading length in non-whitespace characters
    pub min_heading_chars: usize,

    /// Maximum heading length in non-whitespace characters
    pub max_heading_chars: usize,

    /// Maximum vertical gap between lines of one block, as a fraction of font size
    pub line_gap_ratio: f32,

    /// Maximum font size difference (points) between spans of one block
    pub font_size_tolerance: f32,

    /// Whether to use parallel processing
    pub parallel: bool,

    /// Title used when neither metadata nor the first page yields one
    pub fallback_title: Option<String>,

    /// Table detection tolerances
    pub table: TableDetectorConfig,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable table detection.
    pub fn with_tables(mut self, detect: bool) -> Self {
        self.detect_tables = detect;
        self
    }

    /// Enable or disable outline-driven sections.
    pub fn with_toc(mut self, use_toc: bool) -> Self {
        self.use_toc = use_toc;
        self
    }

    /// Ignore the embedded outline and infer sections from typography.
    pub fn heuristic_only(mut self) -> Self {
        self.use_toc = false;
        self
    }

    /// Set the heading size ratio.
    pub fn with_heading_size_ratio(mut self, ratio: f32) -> Self {
        self.heading_size_ratio = ratio;
        self
    }

    /// Set the maximum inferred heading depth (at least 1).
    pub fn with_max_heading_depth(mut self, depth: u8) -> Self {
        self.max_heading_depth = depth.max(1);
        self
    }

    /// Set the accepted heading length range.
    pub fn with_heading_chars(mut self, min: usize, max: usize) -> Self {
        self.min_heading_chars = min;
        self.max_heading_chars = max.max(min);
        self
    }

    /// Set the line gap ratio used when merging spans into blocks.
    pub fn with_line_gap_ratio(mut self, ratio: f32) -> Self {
        self.line_gap_ratio = ratio;
        self
    }

    /// Set the vector primitive cap above which grid detection is skipped for a page.
    pub fn with_table_candidate_cap(mut self, cap: usize) -> Self {
        self.table.candidate_cap = cap;
        self
    }

    /// Vector primitive cap for grid detection.
    pub fn table_candidate_cap(&self) -> usize {
        self.table.candidate_cap
    }

    /// Set table detector configuration.
    pub fn with_table_config(mut self, config: TableDetectorConfig) -> Self {
        self.table = config;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the fallback document title.
    pub fn with_fallback_title(mut self, title: impl Into<String>) -> Self {
        self.fallback_title = Some(title.into());
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            detect_tables: true,
            use_toc: true,
            heading_size_ratio: 1.15,
            max_heading_depth: 4,
            min_heading_chars: 2,
            max_heading_chars: 200,
            line_gap_ratio: 0.6,
            font_size_tolerance: 0.5,
            parallel: true,
            fallback_title: None,
            table: TableDetectorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .heuristic_only()
            .with_tables(false)
            .with_max_heading_depth(0)
            .with_table_candidate_cap(50)
            .sequential();

        assert!(!options.use_toc);
        assert!(!options.detect_tables);
        assert_eq!(options.max_heading_depth, 1);
        assert_eq!(options.table_candidate_cap(), 50);
        assert!(!options.parallel);
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert!(options.use_toc);
        assert!(options.detect_tables);
        assert!(options.parallel);
        assert_eq!(options.heading_size_ratio, 1.15);
        assert_eq!(options.max_heading_depth, 4);
        assert_eq!(options.table_candidate_cap(), 400);
        assert_eq!(options.line_gap_ratio, 0.6);
    }

    #[test]
    fn test_heading_chars_range() {
        let options = ParseOptions::new().with_heading_chars(5, 3);
        assert_eq!(options.min_heading_chars, 5);
        assert_eq!(options.max_heading_chars, 5);
    }
}
