//! Resolving block file names against a base directory

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Join `relative` onto `root`, refusing absolute paths and `..` components
/// that would leave `root`.
///
/// Paths are resolved lexically; nothing is read from disk.
///
/// ```
/// use std::path::Path;
/// use mdcode_fs::resolve_within;
///
/// let root = Path::new("/out");
/// assert_eq!(resolve_within(root, "src/./a.js").unwrap(), Path::new("/out/src/a.js"));
/// assert!(resolve_within(root, "../secret").is_err());
/// ```
pub fn resolve_within(root: &Path, relative: impl AsRef<Path>) -> Result<PathBuf> {
    let relative = relative.as_ref();
    let escape = || Error::PathEscape {
        path: relative.to_path_buf(),
        root: root.to_path_buf(),
    };

    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(escape());
                }
            }
            Component::RootDir | Component::Prefix(_) => return Err(escape()),
        }
    }

    let mut resolved = root.to_path_buf();
    resolved.extend(parts);
    Ok(resolved)
}
