//! Document-level types.

use super::{Section, SectionId, Table, Warning};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A structurally analyzed document.
///
/// Sections live in an arena indexed by [`SectionId`]; the root is a
/// synthetic section spanning every page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document title (metadata, first line, or a fallback)
    pub title: String,

    /// Document metadata (author, dates, etc.)
    pub metadata: Metadata,

    /// Total number of pages
    pub page_count: u32,

    /// Section arena
    pub sections: Vec<Section>,

    /// Id of the synthetic root section
    pub root: SectionId,

    /// Recoverable problems found during parsing
    pub warnings: Vec<Warning>,
}

impl Document {
    /// Get the root section.
    pub fn root(&self) -> &Section {
        &self.sections[self.root.index()]
    }

    /// Get a section by id.
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(id.index())
    }

    /// Iterate over a section's children.
    pub fn children(&self, id: SectionId) -> impl Iterator<Item = &Section> + '_ {
        self.section(id)
            .into_iter()
            .flat_map(|s| s.children.iter())
            .filter_map(move |child| self.section(*child))
    }

    /// Depth of a section in the tree (root = 0).
    pub fn depth(&self, id: SectionId) -> usize {
        let mut depth = 0;
        let mut current = self.section(id).and_then(|s| s.parent);
        while let Some(parent) = current {
            depth += 1;
            current = self.section(parent).and_then(|s| s.parent);
        }
        depth
    }

    /// All sections below the root in pre-order, paired with their depth (top level = 1).
    pub fn walk(&self) -> Vec<(usize, &Section)> {
        let mut out = Vec::new();
        let mut stack: Vec<(usize, SectionId)> = self
            .root()
            .children
            .iter()
            .rev()
            .map(|id| (1, *id))
            .collect();

        while let Some((depth, id)) = stack.pop() {
            if let Some(section) = self.section(id) {
                out.push((depth, section));
                stack.extend(section.children.iter().rev().map(|c| (depth + 1, *c)));
            }
        }
        out
    }

    /// Find the first section whose title matches, ignoring case and surrounding whitespace.
    pub fn find_by_title(&self, title: &str) -> Option<&Section> {
        let needle = title.trim().to_lowercase();
        self.walk()
            .into_iter()
            .map(|(_, s)| s)
            .find(|s| s.title.trim().to_lowercase() == needle)
    }

    /// Tables attached to a section and its descendants.
    pub fn tables_in(&self, id: SectionId) -> Vec<&Table> {
        let mut tables = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(section) = self.section(current) {
                tables.extend(section.tables.iter());
                stack.extend(section.children.iter().rev());
            }
        }
        tables.sort_by_key(|t| t.page);
        tables
    }

    /// Every table in the document, in page order.
    pub fn all_tables(&self) -> Vec<&Table> {
        self.tables_in(self.root)
    }

    /// Check if the document has no pages.
    pub fn is_empty(&self) -> bool {
        self.page_count == 0
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        let mut parts = Vec::new();
        let root_text = self.root().plain_text();
        if !root_text.is_empty() {
            parts.push(root_text);
        }
        for (_, section) in self.walk() {
            parts.push(section.title.clone());
            let body = section.plain_text();
            if !body.is_empty() {
                parts.push(body);
            }
        }
        parts.join("\n\n")
    }

    /// Summary counts.
    pub fn stats(&self) -> DocumentStats {
        let walked = self.walk();
        let all = std::iter::once(self.root()).chain(walked.iter().map(|(_, s)| *s));

        let mut stats = DocumentStats {
            page_count: self.page_count,
            section_count: walked.len(),
            max_depth: walked.iter().map(|(d, _)| *d).max().unwrap_or(0),
            warning_count: self.warnings.len(),
            ..Default::default()
        };

        for section in all {
            stats.block_count += section.blocks.len();
            stats.table_count += section.tables.len();
            stats.span_count += section.blocks.iter().map(|b| b.span_count()).sum::<usize>()
                + section.heading.as_ref().map_or(0, |h| h.span_count())
                + section.tables.iter().map(|t| t.span_count()).sum::<usize>();
        }
        stats
    }
}

/// Summary statistics of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Pages in the document
    pub page_count: u32,
    /// Sections excluding the root
    pub section_count: usize,
    /// Deepest nesting (top level = 1)
    pub max_depth: usize,
    /// Content blocks across all sections
    pub block_count: usize,
    /// Tables across all sections
    pub table_count: usize,
    /// Spans placed in blocks, headings or table cells
    pub span_count: usize,
    /// Recorded warnings
    pub warning_count: usize,
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Keywords
    pub keywords: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// PDF producer
    pub producer: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Convert metadata to YAML frontmatter format.
    pub fn to_yaml_frontmatter(&self, title: &str, page_count: u32) -> String {
        let mut lines = vec!["---".to_string()];

        lines.push(format!("title: \"{}\"", escape_yaml(title)));
        if let Some(ref author) = self.author {
            lines.push(format!("author: \"{}\"", escape_yaml(author)));
        }
        if let Some(ref subject) = self.subject {
            lines.push(format!("subject: \"{}\"", escape_yaml(subject)));
        }
        if let Some(ref keywords) = self.keywords {
            lines.push(format!("keywords: \"{}\"", escape_yaml(keywords)));
        }
        if let Some(ref creator) = self.creator {
            lines.push(format!("creator: \"{}\"", escape_yaml(creator)));
        }
        if let Some(ref producer) = self.producer {
            lines.push(format!("producer: \"{}\"", escape_yaml(producer)));
        }
        if let Some(ref created) = self.created {
            lines.push(format!("created: {}", created.to_rfc3339()));
        }
        if let Some(ref modified) = self.modified {
            lines.push(format!("modified: {}", modified.to_rfc3339()));
        }
        lines.push(format!("pages: {}", page_count));

        lines.push("---".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

/// Escape special characters for YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut root = Section::new(SectionId(0), "Doc", None);
        root.end_page = 9;
        root.children = vec![SectionId(1), SectionId(3)];

        let mut intro = Section::new(SectionId(1), "Intro", Some(0));
        intro.parent = Some(SectionId(0));
        intro.children = vec![SectionId(2)];
        intro.end_page = 3;

        let mut background = Section::new(SectionId(2), "Background", Some(1));
        background.parent = Some(SectionId(1));
        background.start_page = 1;
        background.end_page = 3;

        let mut method = Section::new(SectionId(3), "Method", Some(0));
        method.parent = Some(SectionId(0));
        method.start_page = 4;
        method.end_page = 9;

        Document {
            title: "Doc".to_string(),
            metadata: Metadata::default(),
            page_count: 10,
            sections: vec![root, intro, background, method],
            root: SectionId(0),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_walk_preorder() {
        let doc = sample();
        let titles: Vec<_> = doc
            .walk()
            .into_iter()
            .map(|(d, s)| (d, s.title.as_str()))
            .collect();
        assert_eq!(titles, vec![(1, "Intro"), (2, "Background"), (1, "Method")]);
        assert_eq!(doc.depth(SectionId(2)), 2);
    }

    #[test]
    fn test_find_by_title() {
        let doc = sample();
        let found = doc.find_by_title("  background ").unwrap();
        assert_eq!(found.id, SectionId(2));
        assert!(doc.find_by_title("Missing").is_none());
    }

    #[test]
    fn test_stats() {
        let doc = sample();
        let stats = doc.stats();
        assert_eq!(stats.section_count, 3);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.table_count, 0);
        assert_eq!(doc.children(SectionId(0)).count(), 2);
    }

    #[test]
    fn test_metadata_frontmatter() {
        let metadata = Metadata {
            author: Some("John Doe".to_string()),
            ..Default::default()
        };

        let yaml = metadata.to_yaml_frontmatter("Test \"Doc\"", 10);
        assert!(yaml.contains("title: \"Test \\\"Doc\\\"\""));
        assert!(yaml.contains("author: \"John Doe\""));
        assert!(yaml.contains("pages: 10"));
    }
}
