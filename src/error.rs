//! Error types for pdfstruct.

use std::io;
use thiserror::Error;

/// Result type alias for pdfstruct operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading primitives or rendering output.
///
/// Problems inside a document (bad outline, unreadable page, oversized
/// geometry) are not errors; they are recorded as warnings on the parsed
/// document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The primitive dump is not valid JSON or does not match the dump layout.
    #[error("Invalid primitive dump: {0}")]
    InvalidDump(#[from] serde_json::Error),

    /// The outline could not be read.
    #[error("Invalid outline: {0}")]
    InvalidOutline(String),

    /// The primitives of a page could not be read.
    #[error("Failed to read page {page}: {reason}")]
    PageReadFailure {
        /// Page index (0-based)
        page: u32,
        /// Cause reported by the source
        reason: String,
    },

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// A text pattern failed to compile.
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Error during rendering (Markdown, tree, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
