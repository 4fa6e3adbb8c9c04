//! Block rewriting
//!
//! Walks the blocks of a document, hands each to a caller-supplied async
//! callback, and splices the callback's replacements back into the
//! original text. Everything outside the replaced block bodies comes
//! through byte-for-byte.

use std::future::Future;

use crate::block::CodeBlock;
use crate::edit::{Edit, terminator_before};
use crate::filter::BlockFilter;
use crate::scanner::parse_blocks;

/// What to do with a block after the callback has seen it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockAction {
    /// Leave the block as it is
    Keep,
    /// Replace the block body
    Replace(String),
    /// Empty the block body, keeping both fence lines
    Delete,
}

/// Result of [`rewrite_blocks`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// The rewritten document
    pub text: String,
    /// Every block passed to the callback, as found in the original
    pub blocks: Vec<CodeBlock>,
    /// The edits that were applied, in document order
    pub edits: Vec<Edit>,
    /// Whether `text` differs from the input
    pub modified: bool,
}

/// Rewrite the blocks of `source` that match `filter`.
///
/// The callback is awaited once per matching block, strictly one at a time
/// and in document order. A replacement equal to the current body is not an
/// edit. Every line of a non-empty replacement is terminated the way the
/// opening fence line is, so the closing fence stays on its own line and a
/// CRLF document stays CRLF; [`BlockAction::Delete`]
/// leaves a single empty line between the fences.
///
/// The first error returned by the callback aborts the walk and is passed
/// through; no partial document is produced.
///
/// ```
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// use mdcode_content::{BlockAction, rewrite_blocks};
///
/// let doc = "```js file=a.js\nold\n```";
/// let rewrite = rewrite_blocks(doc, None, |_| async {
///     Ok::<_, mdcode_content::Error>(BlockAction::Replace("new".into()))
/// })
/// .await
/// .unwrap();
/// assert_eq!(rewrite.text, "```js file=a.js\nnew\n```");
/// # });
/// ```
pub async fn rewrite_blocks<F, Fut, E>(
    source: &str,
    filter: Option<&BlockFilter>,
    mut callback: F,
) -> Result<Rewrite, E>
where
    F: FnMut(CodeBlock) -> Fut,
    Fut: Future<Output = Result<BlockAction, E>>,
    E: From<crate::Error>,
{
    let blocks = parse_blocks(source, filter);
    let mut edits = Vec::new();

    for block in &blocks {
        let action = callback(block.clone()).await?;
        let eol = terminator_before(source, block.span.start);

        let new_content = match action {
            BlockAction::Keep => continue,
            BlockAction::Replace(content) if content == block.content => continue,
            BlockAction::Replace(content) => with_terminator(&content, eol),
            BlockAction::Delete => eol.to_string(),
        };
        if source[block.span.clone()] == new_content {
            continue;
        }

        tracing::debug!(index = block.index, span = ?block.span, "Replacing block body");
        edits.push(Edit::replace(source, block.span.clone(), new_content));
    }

    if edits.is_empty() {
        return Ok(Rewrite {
            text: source.to_string(),
            blocks,
            edits,
            modified: false,
        });
    }

    let text = Edit::apply_all(source, edits.clone())?;
    Ok(Rewrite {
        text,
        blocks,
        edits,
        modified: true,
    })
}

/// Re-terminate every line of `content` with `eol`, ending with one.
fn with_terminator(content: &str, eol: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    let body = content.strip_suffix('\n').unwrap_or(content);
    let body = body.strip_suffix('\r').unwrap_or(body);
    let mut out = String::with_capacity(content.len() + eol.len());
    for line in body.split('\n') {
        out.push_str(line.strip_suffix('\r').unwrap_or(line));
        out.push_str(eol);
    }
    out
}
