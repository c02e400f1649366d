//! Indented outline of the section hierarchy.

use crate::model::{Document, SectionId};

use super::{RenderOptions, TreeStyle};

/// Render the section hierarchy as a text tree.
///
/// ```text
/// Report
/// |-- Intro [Pages 1-4]
/// |   `-- Background [Pages 2-4]
/// `-- Method [Pages 5-10]
/// ```
pub fn to_tree(doc: &Document, options: &RenderOptions) -> String {
    let mut output = String::new();
    output.push_str(&doc.title);
    if options.page_numbers && doc.page_count > 0 {
        output.push_str(&format!(" [{}]", doc.root().page_label()));
    }
    output.push('\n');

    render_children(&mut output, doc, doc.root, "", options);
    output
}

fn render_children(output: &mut String, doc: &Document, parent: SectionId, prefix: &str, options: &RenderOptions) {
    let style: TreeStyle = options.tree_style;
    let children: Vec<_> = doc.children(parent).collect();

    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        output.push_str(prefix);
        output.push_str(if last { style.last_branch() } else { style.branch() });
        output.push_str(&child.title);
        if options.page_numbers {
            output.push_str(&format!(" [{}]", child.page_label()));
        }
        output.push('\n');

        let nested = format!("{}{}", prefix, if last { style.blank() } else { style.pipe() });
        render_children(output, doc, child.id, &nested, options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Metadata, Section};

    fn sample() -> Document {
        let mut root = Section::new(SectionId(0), "Report", None);
        root.end_page = 9;
        root.children = vec![SectionId(1), SectionId(3)];

        let mut intro = Section::new(SectionId(1), "Intro", Some(0));
        intro.parent = Some(SectionId(0));
        intro.end_page = 3;
        intro.children = vec![SectionId(2)];

        let mut background = Section::new(SectionId(2), "Background", Some(1));
        background.parent = Some(SectionId(1));
        background.start_page = 1;
        background.end_page = 3;

        let mut method = Section::new(SectionId(3), "Method", Some(0));
        method.parent = Some(SectionId(0));
        method.start_page = 4;
        method.end_page = 9;

        Document {
            title: "Report".to_string(),
            metadata: Metadata::default(),
            page_count: 10,
            sections: vec![root, intro, background, method],
            root: SectionId(0),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_ascii_tree() {
        let tree = to_tree(&sample(), &RenderOptions::new());
        assert_eq!(
            tree,
            "Report [Pages 1-10]\n\
             |-- Intro [Pages 1-4]\n\
             |   `-- Background [Pages 2-4]\n\
             `-- Method [Pages 5-10]\n"
        );
    }

    #[test]
    fn test_unicode_tree_without_pages() {
        let options = RenderOptions::new()
            .with_tree_style(TreeStyle::Unicode)
            .with_page_numbers(false);
        let tree = to_tree(&sample(), &options);
        assert_eq!(tree, "Report\n├── Intro\n│   └── Background\n└── Method\n");
    }
}
