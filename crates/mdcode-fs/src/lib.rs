//! Filesystem access and configuration loading for mdcode
//!
//! Everything that touches the disk lives here, so the parsing core in
//! `mdcode-content` stays filesystem-agnostic. Every error carries the path
//! it happened at.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::{Config, ConfigResolver};
pub use error::{Error, Result};
pub use path::resolve_within;
