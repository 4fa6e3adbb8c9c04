//! Exec command implementation
//!
//! Runs a shell command once per block against a temporary copy of the
//! block's code.

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use mdcode_content::{BlockFilter, CodeBlock, parse_blocks};
use mdcode_fs::{Config, io};
use tokio::process::Command;

use super::{doc_dir, file_content};
use crate::error::{CliError, Result};

/// Placeholder in the command replaced with the temp file path
pub const FILE_PLACEHOLDER: &str = "{file}";

/// Options for [`run_exec`]
#[derive(Debug, Clone, Copy)]
pub struct ExecOptions<'a> {
    /// Command run through the configured shell
    pub command: &'a str,
    /// Keep temp files after the command has run
    pub keep: bool,
    pub filter: Option<&'a BlockFilter>,
}

/// Outcome of running the command for one block
#[derive(Debug)]
struct BlockRun {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl BlockRun {
    fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Run the exec command
///
/// Blocks run one after another from the document's directory. Every
/// block is run even after a failure; the command fails at the end if any
/// block's command exited non-zero.
pub async fn run_exec(
    doc: &Path,
    config: &Config,
    options: ExecOptions<'_>,
    writer: &mut dyn Write,
) -> Result<()> {
    let source = io::read_text(doc)?;
    let base = doc_dir(doc);
    let keep = options.keep || config.exec.keep;
    let blocks = parse_blocks(&source, options.filter);

    let mut failed = 0;
    for block in &blocks {
        let temp = write_temp(block, config)?;
        let command = options
            .command
            .replace(FILE_PLACEHOLDER, &temp.path().display().to_string());

        tracing::debug!(index = block.index, %command, "Running block command");
        let run = run_command(&config.exec.shell, &command, base).await?;
        report(writer, block, &run)?;
        if !run.success() {
            failed += 1;
        }

        if keep {
            let (_, path) = temp.keep().map_err(|e| e.error)?;
            writeln!(writer, "  {} {}", "kept".dimmed(), path.display())?;
        }
    }

    if failed > 0 {
        return Err(CliError::user(format!(
            "{failed} of {} block command(s) failed",
            blocks.len()
        )));
    }
    if blocks.is_empty() {
        writeln!(writer, "{}", "No matching blocks.".dimmed())?;
    }
    Ok(())
}

fn write_temp(block: &CodeBlock, config: &Config) -> Result<tempfile::NamedTempFile> {
    let suffix = format!(".{}", config.extension_for(&block.language));
    let mut temp = tempfile::Builder::new()
        .prefix("mdcode-")
        .suffix(&suffix)
        .tempfile()?;
    temp.write_all(file_content(&block.content).as_bytes())?;
    temp.flush()?;
    Ok(temp)
}

async fn run_command(shell: &str, command: &str, dir: &Path) -> Result<BlockRun> {
    let output = Command::new(shell)
        .arg("-c")
        .arg(command)
        .current_dir(dir)
        .output()
        .await?;
    Ok(BlockRun {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

fn report(writer: &mut dyn Write, block: &CodeBlock, run: &BlockRun) -> Result<()> {
    let status = match run.code {
        Some(0) => "exit 0".green(),
        Some(code) => format!("exit {code}").red(),
        None => "killed by signal".red(),
    };
    writeln!(
        writer,
        "{} {} {} {}",
        format!("[{}]", block.index).bold(),
        block.language,
        block.file().unwrap_or(""),
        status
    )?;
    for (label, text) in [("stdout", &run.stdout), ("stderr", &run.stderr)] {
        if text.is_empty() {
            continue;
        }
        writeln!(writer, "  {}:", label.dimmed())?;
        for line in text.lines() {
            writeln!(writer, "    {line}")?;
        }
    }
    Ok(())
}
