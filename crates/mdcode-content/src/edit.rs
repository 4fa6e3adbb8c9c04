//! Byte-range replacement edits

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::{Error, Result};

/// Replace `span` of a source text with `new_content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// Byte range in the original source
    pub span: Range<usize>,
    /// Text currently at `span`
    pub old_content: String,
    /// Replacement text
    pub new_content: String,
}

impl Edit {
    /// Build an edit replacing `span` of `source`
    pub fn replace(source: &str, span: Range<usize>, new_content: impl Into<String>) -> Self {
        Self {
            old_content: source[span.clone()].to_string(),
            span,
            new_content: new_content.into(),
        }
    }

    /// Apply a batch of edits, all addressed against the same original source.
    ///
    /// Edits are sorted by descending start offset and spliced from the end
    /// of the document backwards, so no splice moves the offsets of one still
    /// to be applied. The output is assembled once at the end.
    pub fn apply_all(source: &str, mut edits: Vec<Edit>) -> Result<String> {
        edits.sort_by(|a, b| b.span.start.cmp(&a.span.start));

        let mut pieces: Vec<&str> = Vec::with_capacity(edits.len() * 2 + 1);
        let mut tail_start = source.len();
        for edit in &edits {
            if edit.span.end > tail_start {
                return Err(Error::OverlappingEdits {
                    start: edit.span.start,
                    end: edit.span.end,
                });
            }
            pieces.push(&source[edit.span.end..tail_start]);
            pieces.push(&edit.new_content);
            tail_start = edit.span.start;
        }
        pieces.push(&source[..tail_start]);

        let len = pieces.iter().map(|p| p.len()).sum();
        let mut result = String::with_capacity(len);
        for piece in pieces.iter().rev() {
            result.push_str(piece);
        }

        tracing::debug!(edits = edits.len(), "Applied edits");
        Ok(result)
    }
}

/// The line terminator used by the line ending just before `offset`,
/// defaulting to `\n`.
pub(crate) fn terminator_before(source: &str, offset: usize) -> &'static str {
    if source[..offset].ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}
