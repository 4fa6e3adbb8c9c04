//! Error types for mdcode-content

/// Result type for mdcode-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mdcode-content operations.
///
/// Fence scanning never fails; these only come out of the strict region
/// validator and the edit splicer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Found {starts} #region markers but {ends} #endregion markers")]
    RegionCountMismatch { starts: usize, ends: usize },

    #[error("#endregion on line {end_line} comes before its #region on line {start_line} (pair {index})")]
    RegionOrder {
        index: usize,
        start_line: usize,
        end_line: usize,
    },

    #[error("Edits overlap at byte range {start}..{end}")]
    OverlappingEdits { start: usize, end: usize },
}
