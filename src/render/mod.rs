//! Rendering module for converting documents to various output formats.

mod json;
mod markdown;
mod options;
mod tree;

pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, MarkdownRenderer};
pub use options::{RenderOptions, TableFallback, TreeStyle};
pub use tree::to_tree;
