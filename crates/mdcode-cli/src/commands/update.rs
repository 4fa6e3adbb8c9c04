//! Update command implementation
//!
//! Refreshes block bodies from the files their metadata points at.

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use mdcode_content::{
    BlockAction, BlockFilter, CodeBlock, read_region, rewrite_blocks, strict_outline,
};
use mdcode_fs::io;
use similar::TextDiff;

use super::doc_dir;
use crate::error::{CliError, Result};
use crate::transform::Transform;

/// Options for [`run_update`]
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions<'a> {
    pub filter: Option<&'a BlockFilter>,
    /// Print a unified diff instead of writing the document
    pub dry_run: bool,
}

/// Run the update command
///
/// Each matching block with `file` metadata gets the content of that file,
/// narrowed to `region=NAME` or reduced to an outline with `outline=true`.
/// A missing file or region aborts the whole update and leaves the
/// document untouched. A failing transform only costs its own block, which
/// keeps the untransformed content.
pub async fn run_update(
    doc: &Path,
    transform: Option<&dyn Transform>,
    options: UpdateOptions<'_>,
    writer: &mut dyn Write,
) -> Result<()> {
    let source = io::read_text(doc)?;
    let base = doc_dir(doc);

    let rewrite = rewrite_blocks(&source, options.filter, move |block| async move {
        refresh_block(base, transform, block).await
    })
    .await?;

    if !rewrite.modified {
        writeln!(
            writer,
            "{} {} is up to date.",
            "OK".green().bold(),
            doc.display()
        )?;
        return Ok(());
    }

    if options.dry_run {
        let name = doc.display().to_string();
        let diff = TextDiff::from_lines(&source, &rewrite.text);
        write!(
            writer,
            "{}",
            diff.unified_diff().context_radius(3).header(&name, &name)
        )?;
        writeln!(
            writer,
            "{} {} block(s) would change.",
            "Dry run:".yellow().bold(),
            rewrite.edits.len()
        )?;
        return Ok(());
    }

    io::write_text(doc, &rewrite.text)?;
    tracing::info!(doc = %doc.display(), edits = rewrite.edits.len(), "Updated document");
    writeln!(
        writer,
        "{} {} block(s) in {}",
        "Updated".green().bold(),
        rewrite.edits.len(),
        doc.display()
    )?;
    Ok(())
}

async fn refresh_block(
    base: &Path,
    transform: Option<&dyn Transform>,
    block: CodeBlock,
) -> Result<BlockAction> {
    let Some(file) = block.file() else {
        return Ok(BlockAction::Keep);
    };
    let path = base.join(file);
    let text = io::read_text(&path)?;

    let mut code = if let Some(region) = block.region() {
        let read = read_region(&text, region);
        if !read.found {
            return Err(CliError::RegionNotFound {
                path,
                name: region.to_string(),
            });
        }
        read.content
    } else if block.is_outline() {
        let outline =
            strict_outline(&text).map_err(|source| CliError::Region { path: path.clone(), source })?;
        if !outline.has_regions {
            return Err(CliError::NoRegions { path });
        }
        outline.content
    } else {
        text
    };

    if let Some(transform) = transform {
        match transform.apply(&block.language, &block.metadata, &code).await {
            Ok(transformed) => code = transformed,
            Err(e) => {
                tracing::warn!(
                    index = block.index,
                    file,
                    error = %e,
                    "Transform failed, keeping untransformed content"
                );
            }
        }
    }

    Ok(BlockAction::Replace(code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mdcode_content::Metadata;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    struct Upper;

    #[async_trait]
    impl Transform for Upper {
        async fn apply(&self, _tag: &str, _metadata: &Metadata, code: &str) -> Result<String> {
            Ok(code.to_uppercase())
        }
    }

    /// Fails for python blocks only
    struct FailPython;

    #[async_trait]
    impl Transform for FailPython {
        async fn apply(&self, tag: &str, _metadata: &Metadata, code: &str) -> Result<String> {
            if tag == "py" {
                Err(CliError::transform("no python"))
            } else {
                Ok(format!("// checked\n{code}"))
            }
        }
    }

    fn setup(doc: &str, files: &[(&str, &str)]) -> (TempDir, std::path::PathBuf) {
        let temp = TempDir::new().unwrap();
        for (name, content) in files {
            let path = temp.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let doc_path = temp.path().join("README.md");
        fs::write(&doc_path, doc).unwrap();
        (temp, doc_path)
    }

    async fn update(
        doc: &Path,
        transform: Option<&dyn Transform>,
        dry_run: bool,
    ) -> (Result<()>, String) {
        let mut out = Vec::new();
        let options = UpdateOptions {
            filter: None,
            dry_run,
        };
        let result = run_update(doc, transform, options, &mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn refreshes_whole_file_blocks() {
        let (_temp, doc) = setup(
            "Intro\n\n```js file=src/a.js\nstale\n```\n\nOutro\n",
            &[("src/a.js", "const a = 2;\n")],
        );
        let (result, out) = update(&doc, None, false).await;
        result.unwrap();
        assert_eq!(
            fs::read_to_string(&doc).unwrap(),
            "Intro\n\n```js file=src/a.js\nconst a = 2;\n```\n\nOutro\n"
        );
        assert!(out.contains("1 block(s)"));
    }

    #[tokio::test]
    async fn up_to_date_document_is_not_rewritten() {
        let doc_text = "```js file=a.js\nconst a = 1;\n```\n";
        let (_temp, doc) = setup(doc_text, &[("a.js", "const a = 1;\n")]);
        let (result, out) = update(&doc, None, false).await;
        result.unwrap();
        assert!(out.contains("up to date"));
        assert_eq!(fs::read_to_string(&doc).unwrap(), doc_text);
    }

    #[tokio::test]
    async fn narrows_to_region() {
        let (_temp, doc) = setup(
            "```py file=lib.py region=core\n\n```\n",
            &[("lib.py", "import os\n# #region core\ndef f():\n    pass\n# #endregion\n")],
        );
        update(&doc, None, false).await.0.unwrap();
        assert_eq!(
            fs::read_to_string(&doc).unwrap(),
            "```py file=lib.py region=core\ndef f():\n    pass\n```\n"
        );
    }

    #[tokio::test]
    async fn outline_blocks_keep_markers_only() {
        let (_temp, doc) = setup(
            "```js file=a.js outline=true\n```\n",
            &[("a.js", "head();\n// #region x\nbody();\n// #endregion\ntail();\n")],
        );
        update(&doc, None, false).await.0.unwrap();
        assert_eq!(
            fs::read_to_string(&doc).unwrap(),
            "```js file=a.js outline=true\nhead();\n// #region x\n// #endregion\ntail();\n```\n"
        );
    }

    #[tokio::test]
    async fn outline_without_regions_aborts() {
        let doc_text = "```js file=a.js outline=true\nkeep\n```\n";
        let (_temp, doc) = setup(doc_text, &[("a.js", "no markers\n")]);
        let (result, _) = update(&doc, None, false).await;
        assert!(matches!(result, Err(CliError::NoRegions { .. })));
        assert_eq!(fs::read_to_string(&doc).unwrap(), doc_text);
    }

    #[tokio::test]
    async fn malformed_markers_abort_with_path() {
        let (_temp, doc) = setup(
            "```js file=a.js outline=true\n```\n",
            &[("a.js", "// #region a\n// #region b\n// #endregion\n")],
        );
        let (result, _) = update(&doc, None, false).await;
        let err = result.unwrap_err();
        assert!(matches!(err, CliError::Region { .. }));
        assert!(err.to_string().contains("a.js"));
    }

    #[tokio::test]
    async fn missing_region_aborts_whole_update() {
        let doc_text = "```js file=a.js\nold\n```\n\n```py file=b.py region=gone\nold\n```\n";
        let (_temp, doc) = setup(doc_text, &[("a.js", "new\n"), ("b.py", "x = 1\n")]);
        let (result, _) = update(&doc, None, false).await;
        match result {
            Err(CliError::RegionNotFound { name, .. }) => assert_eq!(name, "gone"),
            other => panic!("expected RegionNotFound, got {other:?}"),
        }
        assert_eq!(fs::read_to_string(&doc).unwrap(), doc_text);
    }

    #[tokio::test]
    async fn missing_file_aborts() {
        let (_temp, doc) = setup("```js file=nope.js\nold\n```\n", &[]);
        let (result, _) = update(&doc, None, false).await;
        assert!(matches!(result, Err(CliError::Fs(_))));
    }

    #[tokio::test]
    async fn blocks_without_file_are_kept() {
        let doc_text = "```js\nuntouched\n```\n";
        let (_temp, doc) = setup(doc_text, &[]);
        update(&doc, Some(&Upper), false).await.0.unwrap();
        assert_eq!(fs::read_to_string(&doc).unwrap(), doc_text);
    }

    #[tokio::test]
    async fn transform_is_applied() {
        let (_temp, doc) = setup("```js file=a.js\n```\n", &[("a.js", "let a;\n")]);
        update(&doc, Some(&Upper), false).await.0.unwrap();
        assert_eq!(fs::read_to_string(&doc).unwrap(), "```js file=a.js\nLET A;\n```\n");
    }

    #[tokio::test]
    async fn failing_transform_falls_back_per_block() {
        let (_temp, doc) = setup(
            "```py file=a.py\n```\n\n```js file=b.js\n```\n",
            &[("a.py", "x = 1\n"), ("b.js", "y();\n")],
        );
        update(&doc, Some(&FailPython), false).await.0.unwrap();
        assert_eq!(
            fs::read_to_string(&doc).unwrap(),
            "```py file=a.py\nx = 1\n```\n\n```js file=b.js\n// checked\ny();\n```\n"
        );
    }

    #[tokio::test]
    async fn dry_run_prints_diff_and_leaves_document() {
        let doc_text = "```js file=a.js\nold();\n```\n";
        let (_temp, doc) = setup(doc_text, &[("a.js", "new();\n")]);
        let (result, out) = update(&doc, None, true).await;
        result.unwrap();
        assert!(out.contains("-old();"));
        assert!(out.contains("+new();"));
        assert!(out.contains("1 block(s) would change"));
        assert_eq!(fs::read_to_string(&doc).unwrap(), doc_text);
    }
}
