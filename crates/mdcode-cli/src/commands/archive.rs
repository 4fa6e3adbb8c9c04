//! Archive command implementation

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use mdcode_content::{BlockFilter, parse_blocks};
use mdcode_fs::{Config, io};

use super::file_content;
use crate::error::Result;

/// Run the archive command
///
/// Writes one tar entry per matching block. Entries are named after the
/// block's `file` metadata, or the configured name pattern when it has none.
pub fn run_archive(
    doc: &Path,
    config: &Config,
    out_path: &Path,
    filter: Option<&BlockFilter>,
    writer: &mut dyn Write,
) -> Result<()> {
    let source = io::read_text(doc)?;
    let blocks = parse_blocks(&source, filter);

    let mut builder = tar::Builder::new(Vec::new());
    for block in &blocks {
        let name = block
            .file()
            .map(str::to_string)
            .unwrap_or_else(|| config.generated_name(block.index, &block.language));
        let content = file_content(&block.content);

        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, &name, content.as_bytes())?;
        tracing::debug!(index = block.index, entry = %name, "Archived block");
    }
    let bytes = builder.into_inner()?;

    io::write_atomic(out_path, &bytes)?;
    writeln!(
        writer,
        "{} {} block(s) to {}",
        "Archived".green().bold(),
        blocks.len(),
        out_path.display()
    )?;
    Ok(())
}
