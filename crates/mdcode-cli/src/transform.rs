//! Code transforms applied by `update`

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use mdcode_content::Metadata;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::{CliError, Result};

/// Rewrites a block's code before it is written back to the document
#[async_trait]
pub trait Transform: Send + Sync {
    async fn apply(&self, tag: &str, metadata: &Metadata, code: &str) -> Result<String>;
}

/// Pipes code through a shell command
///
/// The code is written to the command's stdin and its stdout becomes the new
/// code. The block's language tag and metadata are passed in the
/// `MDCODE_TAG` and `MDCODE_METADATA` (JSON) environment variables.
#[derive(Debug, Clone)]
pub struct ShellTransform {
    shell: String,
    command: String,
    working_dir: PathBuf,
}

impl ShellTransform {
    pub fn new(
        shell: impl Into<String>,
        command: impl Into<String>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            shell: shell.into(),
            command: command.into(),
            working_dir: working_dir.into(),
        }
    }
}

#[async_trait]
impl Transform for ShellTransform {
    async fn apply(&self, tag: &str, metadata: &Metadata, code: &str) -> Result<String> {
        let mut child = Command::new(&self.shell)
            .arg("-c")
            .arg(&self.command)
            .current_dir(&self.working_dir)
            .env("MDCODE_TAG", tag)
            .env("MDCODE_METADATA", serde_json::to_string(metadata)?)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CliError::transform("stdin was not captured"))?;
        let feed = async move {
            let result = stdin.write_all(code.as_bytes()).await;
            drop(stdin);
            result
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CliError::transform(format!(
                "`{}` exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }
        // A command may exit successfully without reading its input.
        if let Err(e) = fed {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e.into());
            }
        }

        String::from_utf8(output.stdout)
            .map_err(|_| CliError::transform(format!("`{}` wrote non-UTF-8 output", self.command)))
    }
}
