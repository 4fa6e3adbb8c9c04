//! Code block records

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::info::{InfoString, Metadata};

/// Shape of an opening fence line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FenceMarker {
    /// Number of leading spaces before the backticks
    pub indent: usize,
    /// Length of the backtick run (3 or 4)
    pub ticks: usize,
}

impl FenceMarker {
    /// Render the fence prefix (indent plus backticks) without an info string
    pub fn render(&self) -> String {
        format!("{}{}", " ".repeat(self.indent), "`".repeat(self.ticks))
    }
}

/// A fenced code block found in a Markdown document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Zero-based position among all closed blocks in the document,
    /// counted before any filter is applied
    pub index: usize,
    /// Language tag, possibly empty
    pub language: String,
    /// `key=value` pairs from the info string
    pub metadata: Metadata,
    /// Body text without its final line terminator
    pub content: String,
    /// Byte range of the body in the source, including the final terminator
    pub span: Range<usize>,
    /// Byte range of the opening fence line, excluding its terminator
    pub header_span: Range<usize>,
    /// Indent and backtick count of the opening fence
    pub fence: FenceMarker,
}

impl CodeBlock {
    /// The `file` metadata entry, if any
    pub fn file(&self) -> Option<&str> {
        self.metadata.get("file").map(String::as_str)
    }

    /// The `region` metadata entry, if any
    pub fn region(&self) -> Option<&str> {
        self.metadata.get("region").map(String::as_str)
    }

    /// Whether the block asks for an outline of its file (`outline=true`)
    pub fn is_outline(&self) -> bool {
        self.metadata.get("outline").is_some_and(|v| v == "true")
    }

    /// The language and metadata as an [`InfoString`]
    pub fn info(&self) -> InfoString {
        InfoString {
            language: self.language.clone(),
            metadata: self.metadata.clone(),
        }
    }

    /// Number of lines in the body
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(info: &str, content: &str) -> CodeBlock {
        let info = InfoString::parse(info);
        CodeBlock {
            index: 0,
            language: info.language,
            metadata: info.metadata,
            content: content.to_string(),
            span: 0..0,
            header_span: 0..0,
            fence: FenceMarker {
                indent: 0,
                ticks: 3,
            },
        }
    }

    #[test]
    fn metadata_accessors() {
        let b = block("py file=a.py region=main outline=true", "");
        assert_eq!(b.file(), Some("a.py"));
        assert_eq!(b.region(), Some("main"));
        assert!(b.is_outline());
    }

    #[test]
    fn outline_requires_literal_true() {
        assert!(!block("py outline=yes", "").is_outline());
        assert!(!block("py", "").is_outline());
    }

    #[test]
    fn info_round_trips_language_and_metadata() {
        let b = block("js file=a.js", "x");
        assert_eq!(b.info().render(), "js file=a.js");
    }

    #[test]
    fn fence_marker_renders_indent_and_ticks() {
        let marker = FenceMarker {
            indent: 2,
            ticks: 4,
        };
        assert_eq!(marker.render(), "  ````");
    }

    #[test]
    fn line_count_ignores_missing_trailing_newline() {
        assert_eq!(block("", "a\nb").line_count(), 2);
        assert_eq!(block("", "").line_count(), 0);
    }
}
