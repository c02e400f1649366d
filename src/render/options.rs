//! Rendering options and configuration.

/// Options for rendering a structured document.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Include YAML frontmatter with metadata
    pub include_frontmatter: bool,

    /// Emit a table of contents after the title
    pub include_toc: bool,

    /// Deepest section level listed in the table of contents (1 = top level only)
    pub max_toc_depth: usize,

    /// Maximum Markdown heading level (1-6)
    pub max_heading_level: u8,

    /// Show page numbers next to section headings
    pub page_numbers: bool,

    /// Escape special Markdown characters in text
    pub escape_special_chars: bool,

    /// How to render tables with merged cells
    pub table_fallback: TableFallback,

    /// Branch characters for the tree outline
    pub tree_style: TreeStyle,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Enable or disable the table of contents.
    pub fn with_toc(mut self, include: bool) -> Self {
        self.include_toc = include;
        self
    }

    /// Set the table of contents depth.
    pub fn with_toc_depth(mut self, depth: usize) -> Self {
        self.max_toc_depth = depth.max(1);
        self
    }

    /// Set the maximum heading level.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.max_heading_level = level.clamp(1, 6);
        self
    }

    /// Show or hide page numbers.
    pub fn with_page_numbers(mut self, show: bool) -> Self {
        self.page_numbers = show;
        self
    }

    /// Enable or disable Markdown escaping.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Set the table fallback mode.
    pub fn with_table_fallback(mut self, fallback: TableFallback) -> Self {
        self.table_fallback = fallback;
        self
    }

    /// Set the tree branch style.
    pub fn with_tree_style(mut self, style: TreeStyle) -> Self {
        self.tree_style = style;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_frontmatter: false,
            include_toc: false,
            max_toc_depth: 3,
            max_heading_level: 6,
            page_numbers: true,
            escape_special_chars: true,
            table_fallback: TableFallback::Markdown,
            tree_style: TreeStyle::Ascii,
        }
    }
}

/// How to render tables that can't be expressed in simple Markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFallback {
    /// Use GFM table syntax, repeating merged cells as blanks
    #[default]
    Markdown,
    /// Use HTML table tags when a table has merged cells
    Html,
}

/// Branch characters for tree outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// `|--`, `` `-- `` and `|`
    #[default]
    Ascii,
    /// Box-drawing characters
    Unicode,
}

impl TreeStyle {
    /// Prefix for a child that has later siblings.
    pub fn branch(self) -> &'static str {
        match self {
            TreeStyle::Ascii => "|-- ",
            TreeStyle::Unicode => "├── ",
        }
    }

    /// Prefix for the last child.
    pub fn last_branch(self) -> &'static str {
        match self {
            TreeStyle::Ascii => "`-- ",
            TreeStyle::Unicode => "└── ",
        }
    }

    /// Indentation under a child that has later siblings.
    pub fn pipe(self) -> &'static str {
        match self {
            TreeStyle::Ascii => "|   ",
            TreeStyle::Unicode => "│   ",
        }
    }

    /// Indentation under the last child.
    pub fn blank(self) -> &'static str {
        "    "
    }
}
