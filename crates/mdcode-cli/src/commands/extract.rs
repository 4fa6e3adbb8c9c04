//! Extract command implementation
//!
//! Writes blocks that name a `file` out to disk. A block with `region=NAME`
//! owns only that region of its target file.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use colored::Colorize;
use mdcode_content::{
    BlockFilter, CodeBlock, Metadata, parse_blocks, replace_region, rewrite_metadata,
};
use mdcode_fs::{Config, io, resolve_within};

use super::{doc_dir, file_content};
use crate::error::{CliError, Result};

/// Options for [`run_extract`]
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions<'a> {
    /// Output directory; falls back to the config, then the document's directory
    pub out_dir: Option<PathBuf>,
    /// Generate names for blocks without `file` and record them in the document
    pub name_anonymous: bool,
    pub filter: Option<&'a BlockFilter>,
}

/// Run the extract command
///
/// Every block is attempted; failures are reported as they happen and the
/// command fails at the end if any block could not be written.
pub fn run_extract(
    doc: &Path,
    config: &Config,
    options: &ExtractOptions<'_>,
    writer: &mut dyn Write,
) -> Result<()> {
    let source = io::read_text(doc)?;
    let base = doc_dir(doc);
    let out_dir = match (&options.out_dir, &config.extract.out_dir) {
        (Some(dir), _) => dir.clone(),
        (None, Some(dir)) => base.join(dir),
        (None, None) => base.to_path_buf(),
    };

    let blocks = parse_blocks(&source, options.filter);
    let mut patches: BTreeMap<usize, Metadata> = BTreeMap::new();
    let mut written = 0;
    let mut failed = 0;

    for block in &blocks {
        if block.is_outline() {
            tracing::debug!(index = block.index, "Skipping outline block");
            continue;
        }

        let (name, generated) = match block.file() {
            Some(file) => (file.to_string(), false),
            // A block without a language could not carry the name in its info string.
            None if options.name_anonymous && !block.language.is_empty() => {
                (config.generated_name(block.index, &block.language), true)
            }
            None => {
                tracing::debug!(index = block.index, "Skipping block without file metadata");
                continue;
            }
        };

        match extract_block(block, &name, &out_dir, config) {
            Ok(target) => {
                written += 1;
                // Only names of files that now exist are recorded in the document.
                if generated {
                    patches.insert(block.index, Metadata::from([("file".to_string(), name)]));
                }
                tracing::info!(index = block.index, path = %target.display(), "Extracted block");
                writeln!(writer, "{} {}", "Wrote".green(), target.display())?;
            }
            Err(e) => {
                failed += 1;
                tracing::warn!(index = block.index, file = %name, error = %e, "Extraction failed");
                writeln!(writer, "{} {}: {}", "Failed".red(), name, e)?;
            }
        }
    }

    if !patches.is_empty() {
        io::write_text(doc, &rewrite_metadata(&source, &patches)?)?;
        writeln!(
            writer,
            "{} {} anonymous block(s) in {}",
            "Named".cyan(),
            patches.len(),
            doc.display()
        )?;
    }

    if failed > 0 {
        return Err(CliError::user(format!(
            "{failed} of {} block(s) could not be extracted",
            written + failed
        )));
    }
    if written == 0 {
        writeln!(writer, "{}", "No blocks to extract.".dimmed())?;
    }
    Ok(())
}

fn extract_block(block: &CodeBlock, name: &str, out_dir: &Path, config: &Config) -> Result<PathBuf> {
    let target = resolve_within(out_dir, name)?;

    let Some(region) = block.region() else {
        io::write_text(&target, &file_content(&block.content))?;
        return Ok(target);
    };

    let content = match io::read_text(&target) {
        Ok(existing) => {
            let replaced = replace_region(&existing, region, &block.content);
            if !replaced.found {
                return Err(CliError::RegionNotFound {
                    path: target,
                    name: region.to_string(),
                });
            }
            replaced.content
        }
        Err(e) if e.is_not_found() => {
            let (start, end) = config.region_markers(&block.language, region);
            format!("{start}\n{}{end}\n", file_content(&block.content))
        }
        Err(e) => return Err(e.into()),
    };
    io::write_text(&target, &content)?;
    Ok(target)
}
