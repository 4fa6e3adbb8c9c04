//! Command implementations for mdcode-cli
//!
//! Each command writes its human-readable output to the given writer so it
//! can be captured in tests.

pub mod archive;
pub mod exec;
pub mod extract;
pub mod list;
pub mod update;

use std::path::Path;

pub use archive::run_archive;
pub use exec::{ExecOptions, run_exec};
pub use extract::{ExtractOptions, run_extract};
pub use list::run_list;
pub use update::{UpdateOptions, run_update};

/// Directory a document's relative paths are resolved against
pub fn doc_dir(doc: &Path) -> &Path {
    match doc.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Content as it is written to a standalone file
fn file_content(code: &str) -> String {
    if code.is_empty() || code.ends_with('\n') {
        code.to_string()
    } else {
        format!("{code}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_dir_of_bare_file_is_cwd() {
        assert_eq!(doc_dir(Path::new("README.md")), Path::new("."));
        assert_eq!(doc_dir(Path::new("docs/guide.md")), Path::new("docs"));
    }

    #[test]
    fn file_content_ends_with_one_newline() {
        assert_eq!(file_content("a"), "a\n");
        assert_eq!(file_content("a\n"), "a\n");
        assert_eq!(file_content(""), "");
    }
}
