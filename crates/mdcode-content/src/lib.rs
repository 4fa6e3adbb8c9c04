//! Fenced code block parsing, rewriting, and region extraction for mdcode
//!
//! Locates backtick-fenced code blocks in Markdown, parses their info
//! strings into a language tag plus `key=value` metadata, and rewrites
//! block bodies or fence lines in place without touching anything else in
//! the document. The [`region`] module works on the source files those
//! blocks point at, extracting or outlining `#region` marker pairs.

pub mod block;
pub mod comment;
pub mod edit;
pub mod error;
pub mod filter;
pub mod info;
pub mod metadata;
pub mod region;
pub mod rewrite;
pub mod scanner;

pub use block::{CodeBlock, FenceMarker};
pub use comment::{CommentStyle, comment_prefix, region_markers};
pub use edit::Edit;
pub use error::{Error, Result};
pub use filter::BlockFilter;
pub use info::{InfoString, Metadata};
pub use metadata::rewrite_metadata;
pub use region::{Outline, RegionRead, outline, read_region, replace_region, strict_outline};
pub use rewrite::{BlockAction, Rewrite, rewrite_blocks};
pub use scanner::parse_blocks;
