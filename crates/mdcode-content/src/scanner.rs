//! Fence scanner
//!
//! A single pass over the document, one line at a time, with two states:
//! outside a fence and inside one. Only backtick fences of three or four
//! ticks open a block. A fence closes on a line holding nothing but a
//! backtick run at least as long as the opening one, indented no deeper.
//! Fences still open at the end of the document produce no block.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use crate::block::{CodeBlock, FenceMarker};
use crate::filter::{self, BlockFilter};
use crate::info::InfoString;

static OPEN_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^( *)(`+)(.*)$").expect("Invalid open fence regex"));

static CLOSE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)(`+)[ \t]*$").expect("Invalid close fence regex"));

const MIN_TICKS: usize = 3;
const MAX_TICKS: usize = 4;

/// Parse every closed fenced block in `source`, in document order, keeping
/// those that match `filter`.
///
/// Block indices always count every closed block, so they stay stable
/// whatever the filter.
///
/// ```
/// use mdcode_content::{BlockFilter, parse_blocks};
///
/// let doc = "# Title\n\n```js file=a.js\nlet a = 1;\n```\n\n```py\nb = 2\n```\n";
/// let blocks = parse_blocks(doc, Some(&BlockFilter::new().language("py")));
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].index, 1);
/// assert_eq!(blocks[0].content, "b = 2");
/// ```
pub fn parse_blocks(source: &str, filter: Option<&BlockFilter>) -> Vec<CodeBlock> {
    let mut scanner = Scanner::new(source);
    for line in source.split_inclusive('\n') {
        scanner.feed(line);
    }
    let blocks = scanner.finish();

    let matched: Vec<CodeBlock> = blocks
        .into_iter()
        .filter(|block| filter::matches(filter, block))
        .collect();
    tracing::debug!(matched = matched.len(), "Parsed fenced code blocks");
    matched
}

/// An opening fence waiting for its close
#[derive(Debug)]
struct OpenFence {
    fence: FenceMarker,
    info: InfoString,
    header_span: Range<usize>,
    content_start: usize,
}

#[derive(Debug)]
enum State {
    Outside,
    Inside(OpenFence),
}

/// Scanner state threaded through the line loop
struct Scanner<'a> {
    source: &'a str,
    state: State,
    /// Byte offset of the next line to be fed
    offset: usize,
    blocks: Vec<CodeBlock>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            state: State::Outside,
            offset: 0,
            blocks: Vec::new(),
        }
    }

    /// Feed one raw line, terminator included
    fn feed(&mut self, raw: &str) {
        let line_start = self.offset;
        self.offset += raw.len();
        let text = strip_terminator(raw);

        self.state = match std::mem::replace(&mut self.state, State::Outside) {
            State::Outside => match open_fence(text) {
                Some((fence, info)) => State::Inside(OpenFence {
                    fence,
                    info: InfoString::parse(info),
                    header_span: line_start..line_start + text.len(),
                    content_start: self.offset,
                }),
                None => State::Outside,
            },
            State::Inside(open) => {
                if closes(text, &open.fence) {
                    self.close(open, line_start);
                    State::Outside
                } else {
                    State::Inside(open)
                }
            }
        };
    }

    fn close(&mut self, open: OpenFence, content_end: usize) {
        let raw = &self.source[open.content_start..content_end];
        let content = raw
            .strip_suffix("\r\n")
            .or_else(|| raw.strip_suffix('\n'))
            .unwrap_or(raw);

        self.blocks.push(CodeBlock {
            index: self.blocks.len(),
            language: open.info.language,
            metadata: open.info.metadata,
            content: content.to_string(),
            span: open.content_start..content_end,
            header_span: open.header_span,
            fence: open.fence,
        });
    }

    fn finish(self) -> Vec<CodeBlock> {
        if let State::Inside(open) = &self.state {
            tracing::debug!(
                line_start = open.header_span.start,
                "Ignoring unterminated fence"
            );
        }
        self.blocks
    }
}

/// Match an opening fence line, returning its shape and raw info string
fn open_fence(text: &str) -> Option<(FenceMarker, &str)> {
    let caps = OPEN_FENCE.captures(text)?;
    let ticks = caps.get(2)?.as_str().len();
    if !(MIN_TICKS..=MAX_TICKS).contains(&ticks) {
        return None;
    }
    let fence = FenceMarker {
        indent: caps.get(1)?.as_str().len(),
        ticks,
    };
    Some((fence, caps.get(3)?.as_str()))
}

/// Whether `text` closes a fence opened with `fence`
fn closes(text: &str, fence: &FenceMarker) -> bool {
    let Some(caps) = CLOSE_FENCE.captures(text) else {
        return false;
    };
    let indent = caps.get(1).map_or(0, |m| m.as_str().len());
    let ticks = caps.get(2).map_or(0, |m| m.as_str().len());
    indent <= fence.indent && ticks >= fence.ticks
}

fn strip_terminator(raw: &str) -> &str {
    let text = raw.strip_suffix('\n').unwrap_or(raw);
    text.strip_suffix('\r').unwrap_or(text)
}
