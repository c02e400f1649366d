//! Markdown rendering for structured documents.

use std::cmp::Ordering;

use crate::error::Result;
use crate::model::{ContentBlock, Document, Section, Table, TableRow};

use super::{RenderOptions, TableFallback};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

/// Body element of a section, in page order.
enum Item<'a> {
    Block(&'a ContentBlock),
    Table(&'a Table),
}

impl Item<'_> {
    fn position(&self) -> (u32, f32) {
        match self {
            Item::Block(b) => (b.page, b.top()),
            Item::Table(t) => (t.page, t.bbox.y0),
        }
    }
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a document to Markdown.
    pub fn render(&self, doc: &Document) -> Result<String> {
        let mut output = String::new();

        if self.options.include_frontmatter {
            output.push_str(&doc.metadata.to_yaml_frontmatter(&doc.title, doc.page_count));
            output.push('\n');
        }

        output.push_str("# ");
        output.push_str(&self.escape(&doc.title));
        output.push_str("\n\n");

        if self.options.include_toc {
            self.render_toc(&mut output, doc);
        }

        self.render_body(&mut output, doc.root());

        for (depth, section) in doc.walk() {
            self.render_section(&mut output, section, depth);
        }

        Ok(output.trim_end().to_string() + "\n")
    }

    fn render_toc(&self, output: &mut String, doc: &Document) {
        let entries: Vec<_> = doc
            .walk()
            .into_iter()
            .filter(|(depth, _)| *depth <= self.options.max_toc_depth)
            .collect();
        if entries.is_empty() {
            return;
        }

        output.push_str("## Table of Contents\n\n");
        for (depth, section) in entries {
            output.push_str(&"  ".repeat(depth - 1));
            output.push_str(&format!("- [{}](#{})", self.escape(&section.title), slugify(&section.title)));
            if self.options.page_numbers {
                output.push_str(&format!(" ({})", section.page_label()));
            }
            output.push('\n');
        }
        output.push('\n');
    }

    fn render_section(&self, output: &mut String, section: &Section, depth: usize) {
        // Depth 1 renders as `##`, below the document title
        let level = (depth + 1).min(self.options.max_heading_level as usize);
        output.push_str(&"#".repeat(level));
        output.push(' ');
        output.push_str(&self.escape(&section.title));
        output.push_str("\n\n");

        if self.options.page_numbers {
            output.push_str(&format!("*{}*\n\n", section.page_label()));
        }

        self.render_body(output, section);
    }

    fn render_body(&self, output: &mut String, section: &Section) {
        let mut items: Vec<Item<'_>> = section
            .blocks
            .iter()
            .map(Item::Block)
            .chain(section.tables.iter().map(Item::Table))
            .collect();
        // Stable: equal positions keep blocks before tables
        items.sort_by(|a, b| {
            let (pa, ya) = a.position();
            let (pb, yb) = b.position();
            pa.cmp(&pb).then(ya.partial_cmp(&yb).unwrap_or(Ordering::Equal))
        });

        for item in items {
            match item {
                Item::Block(block) => {
                    if block.text.is_empty() {
                        continue;
                    }
                    output.push_str(&self.escape(&block.text));
                    output.push_str("\n\n");
                }
                Item::Table(table) => self.render_table(output, table),
            }
        }
    }

    fn render_table(&self, output: &mut String, table: &Table) {
        if table.is_empty() {
            return;
        }

        if table.has_merged_cells() && self.options.table_fallback == TableFallback::Html {
            self.render_table_html(output, table);
        } else {
            self.render_table_markdown(output, table);
        }
    }

    fn render_table_markdown(&self, output: &mut String, table: &Table) {
        let col_count = table.column_count();
        if col_count == 0 {
            return;
        }

        for (i, row) in table.rows.iter().enumerate() {
            output.push('|');
            for cell in expand_row(row, col_count) {
                let content = self.escape_cell(cell);
                output.push_str(&format!(" {} |", content));
            }
            output.push('\n');

            // First row doubles as the header
            if i == 0 {
                output.push('|');
                output.push_str(&" --- |".repeat(col_count));
                output.push('\n');
            }
        }

        output.push('\n');
    }

    fn render_table_html(&self, output: &mut String, table: &Table) {
        output.push_str("<table>\n");

        for row in &table.rows {
            output.push_str("<tr>");
            for cell in &row.cells {
                let mut attrs = String::new();
                if cell.row_span > 1 {
                    attrs.push_str(&format!(" rowspan=\"{}\"", cell.row_span));
                }
                if cell.col_span > 1 {
                    attrs.push_str(&format!(" colspan=\"{}\"", cell.col_span));
                }
                output.push_str(&format!("<td{}>{}</td>", attrs, escape_html(&cell.text)));
            }
            output.push_str("</tr>\n");
        }

        output.push_str("</table>\n\n");
    }

    fn escape(&self, text: &str) -> String {
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }

    fn escape_cell(&self, text: &str) -> String {
        let flat = text.replace('\n', " ");
        let flat = flat.trim();
        if self.options.escape_special_chars {
            escape_markdown(flat)
        } else {
            // Pipes always break the row
            flat.replace('|', "\\|")
        }
    }
}

/// Cell texts of a row, with merged cells followed by blanks for the
/// columns they cover and padding up to `width`.
fn expand_row(row: &TableRow, width: usize) -> Vec<&str> {
    let mut cells = Vec::with_capacity(width);
    for cell in &row.cells {
        cells.push(cell.text.as_str());
        for _ in 1..cell.col_span.max(1) {
            cells.push("");
        }
    }
    cells.resize(width.max(cells.len()), "");
    cells
}

/// Escape special Markdown characters.
/// Only escape characters that could be misinterpreted as Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// GitHub-style heading anchor.
fn slugify(title: &str) -> String {
    title
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}
