//! Region markers in source files
//!
//! Source files referenced from code blocks can carry named regions:
//!
//! ```text
//! // #region setup
//! let server = Server::new();
//! // #endregion setup
//! ```
//!
//! The marker may sit behind any comment prefix in [`CommentStyle`]. The
//! name after `#endregion` is optional and not checked.
//!
//! [`read_region`], [`replace_region`] and [`outline`] scan line by line
//! and pair each start marker with the first following end marker in the
//! same comment style. Markers in between are ignored. [`strict_outline`]
//! instead validates the whole file first and pairs markers by position.

use regex::Regex;
use std::sync::LazyLock;

use crate::comment::CommentStyle;
use crate::error::{Error, Result};

/// Regex alternation of every known comment prefix
static PREFIXES: LazyLock<String> = LazyLock::new(|| {
    CommentStyle::ALL
        .iter()
        .map(|style| regex::escape(style.prefix()))
        .collect::<Vec<_>>()
        .join("|")
});

static START_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^\s*(?P<prefix>{})\s*#region\b[ \t]*(?P<name>.*?)\s*(?:\*/|-->)?\s*$",
        *PREFIXES
    ))
    .expect("Invalid region start regex")
});

static END_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\s*(?P<prefix>{})\s*#endregion\b", *PREFIXES))
        .expect("Invalid region end regex")
});

static STRICT_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?m)^[ \t]*(?:{})[ \t]*#region[ \t]+[A-Za-z_][A-Za-z0-9_]*\b",
        *PREFIXES
    ))
    .expect("Invalid strict region start regex")
});

static STRICT_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?m)^[ \t]*(?:{})[ \t]*#endregion\b", *PREFIXES))
        .expect("Invalid strict region end regex")
});

/// Result of reading or replacing a named region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRead {
    /// Region interior for reads, the whole new text for replacements
    pub content: String,
    /// Whether the named region was found
    pub found: bool,
}

/// Result of outlining a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    /// Text with region interiors removed
    pub content: String,
    /// Whether any region start marker was seen
    pub has_regions: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker<'a> {
    Start { prefix: &'a str, name: &'a str },
    End { prefix: &'a str },
}

fn marker(text: &str) -> Option<Marker<'_>> {
    if let Some(caps) = START_MARKER.captures(text) {
        return Some(Marker::Start {
            prefix: caps.name("prefix")?.as_str(),
            name: caps.name("name").map_or("", |m| m.as_str()),
        });
    }
    let caps = END_MARKER.captures(text)?;
    Some(Marker::End {
        prefix: caps.name("prefix")?.as_str(),
    })
}

fn strip_terminator(raw: &str) -> &str {
    let text = raw.strip_suffix('\n').unwrap_or(raw);
    text.strip_suffix('\r').unwrap_or(text)
}

fn terminator_of(raw: &str) -> &'static str {
    if raw.ends_with("\r\n") { "\r\n" } else { "\n" }
}

/// Read the interior of region `name`, joined with `\n`.
///
/// Only the first region called `name` is read. A start marker with no
/// matching end marker counts as not found.
///
/// ```
/// use mdcode_content::read_region;
///
/// let source = "a\n# #region greet\nprint('hi')\n# #endregion\nb\n";
/// let read = read_region(source, "greet");
/// assert!(read.found);
/// assert_eq!(read.content, "print('hi')");
/// ```
pub fn read_region(source: &str, name: &str) -> RegionRead {
    let mut open: Option<&str> = None;
    let mut captured: Vec<&str> = Vec::new();

    for raw in source.split_inclusive('\n') {
        let text = strip_terminator(raw);
        match (open, marker(text)) {
            (None, Some(Marker::Start { prefix, name: n })) if n == name => open = Some(prefix),
            (None, _) => {}
            (Some(p), Some(Marker::End { prefix })) if prefix == p => {
                return RegionRead {
                    content: captured.join("\n"),
                    found: true,
                };
            }
            (Some(_), Some(_)) => {}
            (Some(_), None) => captured.push(text),
        }
    }

    if open.is_some() {
        tracing::debug!(region = name, "Region start marker has no end marker");
    }
    RegionRead {
        content: String::new(),
        found: false,
    }
}

/// Replace the interior of region `name` with `new_content`, keeping both
/// marker lines and everything outside the region.
///
/// One trailing line terminator is trimmed from `new_content`; its lines
/// are then written with the start marker's terminator. When the region is
/// missing or unterminated the source comes back unchanged with
/// `found = false`.
pub fn replace_region(source: &str, name: &str, new_content: &str) -> RegionRead {
    enum State<'a> {
        Before,
        Inside { prefix: &'a str, eol: &'static str },
        After,
    }

    let body = new_content
        .strip_suffix('\n')
        .map(|b| b.strip_suffix('\r').unwrap_or(b))
        .unwrap_or(new_content);

    let mut out = String::with_capacity(source.len() + body.len());
    let mut state = State::Before;

    for raw in source.split_inclusive('\n') {
        let text = strip_terminator(raw);
        state = match state {
            State::Before => {
                out.push_str(raw);
                match marker(text) {
                    Some(Marker::Start { prefix, name: n }) if n == name => State::Inside {
                        prefix,
                        eol: terminator_of(raw),
                    },
                    _ => State::Before,
                }
            }
            State::Inside { prefix, eol } => match marker(text) {
                Some(Marker::End { prefix: p }) if p == prefix => {
                    if !body.is_empty() {
                        for line in body.split('\n') {
                            out.push_str(line.strip_suffix('\r').unwrap_or(line));
                            out.push_str(eol);
                        }
                    }
                    out.push_str(raw);
                    State::After
                }
                _ => State::Inside { prefix, eol },
            },
            State::After => {
                out.push_str(raw);
                State::After
            }
        };
    }

    match state {
        State::After => RegionRead {
            content: out,
            found: true,
        },
        _ => RegionRead {
            content: source.to_string(),
            found: false,
        },
    }
}

/// Keep every region's marker lines but drop their interiors.
///
/// Lines outside regions and all line terminators are kept as they are.
/// Without any start marker the source comes back unchanged with
/// `has_regions = false`.
///
/// ```
/// use mdcode_content::outline;
///
/// let out = outline("x\n// #region t\nBODY\n// #endregion\ny");
/// assert!(out.has_regions);
/// assert_eq!(out.content, "x\n// #region t\n// #endregion\ny");
/// ```
pub fn outline(source: &str) -> Outline {
    let mut out = String::with_capacity(source.len());
    let mut open: Option<&str> = None;
    let mut has_regions = false;

    for raw in source.split_inclusive('\n') {
        let text = strip_terminator(raw);
        match open {
            None => {
                out.push_str(raw);
                if let Some(Marker::Start { prefix, .. }) = marker(text) {
                    open = Some(prefix);
                    has_regions = true;
                }
            }
            Some(p) => {
                if let Some(Marker::End { prefix }) = marker(text) {
                    if prefix == p {
                        out.push_str(raw);
                        open = None;
                    }
                }
            }
        }
    }

    if !has_regions {
        return Outline {
            content: source.to_string(),
            has_regions: false,
        };
    }
    Outline {
        content: out,
        has_regions,
    }
}

/// Position of a marker line in the source
#[derive(Debug, Clone, Copy)]
struct MarkerLine {
    /// Offset of the first byte of the line
    start: usize,
    /// Offset just past the line's terminator
    next: usize,
    /// 1-based line number
    number: usize,
}

fn marker_lines(source: &str, re: &Regex) -> Vec<MarkerLine> {
    re.find_iter(source)
        .map(|m| MarkerLine {
            start: m.start(),
            next: next_line_start(source, m.end()),
            number: source[..m.start()].matches('\n').count() + 1,
        })
        .collect()
}

/// Offset just past the terminator of the line containing `pos`, keeping a
/// `\r\n` pair together.
fn next_line_start(source: &str, pos: usize) -> usize {
    let bytes = source.as_bytes();
    let mut end = pos;
    while end < bytes.len() && bytes[end] != b'\r' && bytes[end] != b'\n' {
        end += 1;
    }
    match (bytes.get(end), bytes.get(end + 1)) {
        (Some(b'\r'), Some(b'\n')) => end + 2,
        (Some(b'\n'), _) => end + 1,
        // A lone '\r' is part of the line; keep scanning for the real end.
        (Some(b'\r'), _) => next_line_start(source, end + 1),
        _ => end,
    }
}

/// Outline after validating every marker in the file.
///
/// Start and end markers are collected separately; their counts must be
/// equal and each start must come before the end at the same position in
/// the other list. Names must be identifier-like. Marker lines keep their
/// original terminators.
///
/// # Errors
///
/// Returns [`Error::RegionCountMismatch`] or [`Error::RegionOrder`] when
/// the markers are malformed.
pub fn strict_outline(source: &str) -> Result<Outline> {
    let starts = marker_lines(source, &STRICT_START);
    let ends = marker_lines(source, &STRICT_END);

    if starts.len() != ends.len() {
        return Err(Error::RegionCountMismatch {
            starts: starts.len(),
            ends: ends.len(),
        });
    }
    for (index, (start, end)) in starts.iter().zip(&ends).enumerate() {
        if start.start >= end.start {
            return Err(Error::RegionOrder {
                index,
                start_line: start.number,
                end_line: end.number,
            });
        }
    }

    if starts.is_empty() {
        return Ok(Outline {
            content: source.to_string(),
            has_regions: false,
        });
    }

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for (start, end) in starts.iter().zip(&ends) {
        // A start inside an interior already dropped has nothing left to keep.
        if start.start >= cursor {
            out.push_str(&source[cursor..start.next]);
        }
        cursor = cursor.max(end.start);
    }
    out.push_str(&source[cursor..]);

    tracing::debug!(regions = starts.len(), "Outlined source");
    Ok(Outline {
        content: out,
        has_regions: true,
    })
}
