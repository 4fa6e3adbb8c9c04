//! Fence line metadata rewriting
//!
//! Patches the info string of selected opening fences, leaving block bodies
//! and everything else in the document untouched.

use std::collections::BTreeMap;

use crate::edit::Edit;
use crate::error::Result;
use crate::info::Metadata;
use crate::scanner::parse_blocks;

/// Merge metadata patches into the opening fence lines of `source`.
///
/// `patches` is keyed by unfiltered block index (see
/// [`CodeBlock::index`](crate::CodeBlock::index)). Patch entries win over
/// existing ones. Each patched fence line is rebuilt as its original indent
/// and backticks followed by the language and the merged `key=value` pairs
/// in key order. Lines whose merged metadata is unchanged are left alone,
/// as are indices with no block.
///
/// Fails with [`Error::OverlappingEdits`](crate::Error::OverlappingEdits)
/// if two patched fence lines share bytes, which well-formed scanner
/// output never produces.
///
/// ```
/// use std::collections::BTreeMap;
/// use mdcode_content::{Metadata, rewrite_metadata};
///
/// let doc = "```js\nlet a;\n```\n";
/// let patch = Metadata::from([("file".to_string(), "a.js".to_string())]);
/// let out = rewrite_metadata(doc, &BTreeMap::from([(0, patch)])).unwrap();
/// assert_eq!(out, "```js file=a.js\nlet a;\n```\n");
/// ```
pub fn rewrite_metadata(source: &str, patches: &BTreeMap<usize, Metadata>) -> Result<String> {
    if patches.is_empty() {
        return Ok(source.to_string());
    }

    let mut edits = Vec::new();
    for block in parse_blocks(source, None) {
        let Some(patch) = patches.get(&block.index) else {
            continue;
        };

        let mut info = block.info();
        info.merge(patch);
        if info.metadata == block.metadata {
            continue;
        }

        let line = format!("{}{}", block.fence.render(), info.render());
        tracing::debug!(index = block.index, %line, "Rewriting fence line");
        edits.push(Edit::replace(source, block.header_span.clone(), line));
    }

    if edits.is_empty() {
        return Ok(source.to_string());
    }

    Edit::apply_all(source, edits)
}
