//! Info string parsing
//!
//! The info string is the text after the opening backticks of a fence:
//!
//! ````text
//! ```js file=src/app.js region=main
//! ````
//!
//! The first whitespace-delimited token is the language tag; every later
//! token of the form `key=value` becomes a metadata entry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Block metadata, keyed by name. Iterates in sorted key order.
pub type Metadata = BTreeMap<String, String>;

/// A parsed fence info string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoString {
    /// First token of the info string, empty if there were none
    pub language: String,
    /// All later `key=value` tokens
    pub metadata: Metadata,
}

impl InfoString {
    /// Parse raw info string text. Never fails.
    ///
    /// Tokens without `=` are dropped. The key is everything before the first
    /// `=`, the value everything after it, verbatim. Later duplicates win.
    ///
    /// ```
    /// use mdcode_content::InfoString;
    ///
    /// let info = InfoString::parse("js file=a.js label=x=y flag");
    /// assert_eq!(info.language, "js");
    /// assert_eq!(info.metadata["file"], "a.js");
    /// assert_eq!(info.metadata["label"], "x=y");
    /// assert!(!info.metadata.contains_key("flag"));
    /// ```
    pub fn parse(raw: &str) -> Self {
        let mut tokens = raw.split_whitespace();
        let language = tokens.next().unwrap_or_default().to_string();

        let mut metadata = Metadata::new();
        for token in tokens {
            let Some((key, value)) = token.split_once('=') else {
                continue;
            };
            metadata.insert(key.to_string(), value.to_string());
        }

        Self { language, metadata }
    }

    /// Render back to info string text: the language followed by
    /// `key=value` tokens in key order.
    ///
    /// With an empty language the first metadata token would be read back as
    /// the language, so callers patching language-less fences should set one.
    pub fn render(&self) -> String {
        let mut out = self.language.clone();
        for (key, value) in &self.metadata {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(key);
            out.push('=');
            out.push_str(value);
        }
        out
    }

    /// Merge `patch` over the existing metadata; patch entries win.
    pub fn merge(&mut self, patch: &Metadata) {
        for (key, value) in patch {
            self.metadata.insert(key.clone(), value.clone());
        }
    }
}
