//! Error types for mdcode-cli

use std::path::PathBuf;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from mdcode-content
    #[error(transparent)]
    Content(#[from] mdcode_content::Error),

    /// Error from mdcode-fs
    #[error(transparent)]
    Fs(#[from] mdcode_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Region '{name}' not found in {path}")]
    RegionNotFound { path: PathBuf, name: String },

    #[error("No #region markers found in {path}")]
    NoRegions { path: PathBuf },

    /// Malformed region markers in a source file
    #[error("{path}: {source}")]
    Region {
        path: PathBuf,
        #[source]
        source: mdcode_content::Error,
    },

    /// A transform command failed or produced unusable output
    #[error("Transform failed: {message}")]
    Transform { message: String },

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    pub fn transform(message: impl Into<String>) -> Self {
        Self::Transform {
            message: message.into(),
        }
    }
}
