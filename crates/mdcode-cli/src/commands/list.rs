//! List command implementation

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use mdcode_content::{BlockFilter, parse_blocks};
use mdcode_fs::io;
use serde_json::json;

use crate::error::Result;

/// Run the list command
///
/// Prints one row per matching block, or one JSON object per line with
/// `json`.
pub fn run_list(
    doc: &Path,
    filter: Option<&BlockFilter>,
    json: bool,
    writer: &mut dyn Write,
) -> Result<()> {
    let source = io::read_text(doc)?;
    let blocks = parse_blocks(&source, filter);
    tracing::debug!(doc = %doc.display(), count = blocks.len(), "Listing blocks");

    if json {
        for block in &blocks {
            let line = json!({
                "index": block.index,
                "language": block.language,
                "metadata": block.metadata,
                "content": block.content,
                "span": [block.span.start, block.span.end],
            });
            writeln!(writer, "{}", serde_json::to_string(&line)?)?;
        }
        return Ok(());
    }

    if blocks.is_empty() {
        writeln!(writer, "{}", "No matching blocks.".dimmed())?;
        return Ok(());
    }

    for block in &blocks {
        let language = if block.language.is_empty() {
            "-"
        } else {
            block.language.as_str()
        };
        let mut row = format!(
            "{:>4}  {:<12} {:<32} {} lines",
            block.index,
            language,
            block.file().unwrap_or("-"),
            block.line_count()
        );
        if let Some(region) = block.region() {
            row.push_str(&format!("  region={region}"));
        }
        if block.is_outline() {
            row.push_str("  outline");
        }
        writeln!(writer, "{row}")?;
    }
    writeln!(
        writer,
        "{} {} block(s) in {}",
        "Total:".bold(),
        blocks.len(),
        doc.display()
    )?;
    Ok(())
}
