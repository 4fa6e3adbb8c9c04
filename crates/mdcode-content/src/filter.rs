//! Block filters

use serde::{Deserialize, Serialize};

use crate::block::CodeBlock;
use crate::info::Metadata;

/// Criteria a block must meet. Every criterion that is set must match
/// exactly; an empty filter matches every block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockFilter {
    pub language: Option<String>,
    pub file: Option<String>,
    pub region: Option<String>,
    pub metadata: Metadata,
}

impl BlockFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Whether no criteria are set
    pub fn is_empty(&self) -> bool {
        self.language.is_none()
            && self.file.is_none()
            && self.region.is_none()
            && self.metadata.is_empty()
    }

    /// Test a block against every criterion
    pub fn matches(&self, block: &CodeBlock) -> bool {
        if let Some(language) = &self.language {
            if block.language != *language {
                return false;
            }
        }
        if let Some(file) = &self.file {
            if block.file() != Some(file.as_str()) {
                return false;
            }
        }
        if let Some(region) = &self.region {
            if block.region() != Some(region.as_str()) {
                return false;
            }
        }
        self.metadata
            .iter()
            .all(|(key, value)| block.metadata.get(key) == Some(value))
    }
}

/// Apply an optional filter; `None` matches everything.
pub fn matches(filter: Option<&BlockFilter>, block: &CodeBlock) -> bool {
    filter.is_none_or(|f| f.matches(block))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::FenceMarker;
    use crate::info::InfoString;
    use rstest::rstest;

    fn block(info: &str) -> CodeBlock {
        let info = InfoString::parse(info);
        CodeBlock {
            index: 0,
            language: info.language,
            metadata: info.metadata,
            content: String::new(),
            span: 0..0,
            header_span: 0..0,
            fence: FenceMarker {
                indent: 0,
                ticks: 3,
            },
        }
    }

    #[test]
    fn no_filter_matches_everything() {
        assert!(matches(None, &block("")));
        assert!(matches(None, &block("js file=a.js")));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = BlockFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&block("")));
    }

    #[rstest]
    #[case("js", "a.js", true)]
    #[case("ts", "a.js", false)]
    #[case("js", "b.js", false)]
    #[case("ts", "b.js", false)]
    fn language_and_file_are_conjunctive(
        #[case] language: &str,
        #[case] file: &str,
        #[case] expected: bool,
    ) {
        let filter = BlockFilter::new().language(language).file(file);
        assert_eq!(filter.matches(&block("js file=a.js")), expected);
    }

    #[test]
    fn file_filter_rejects_blocks_without_file() {
        let filter = BlockFilter::new().file("a.js");
        assert!(!filter.matches(&block("js")));
    }

    #[test]
    fn region_filter_matches_region_metadata() {
        let filter = BlockFilter::new().region("main");
        assert!(filter.matches(&block("py file=a.py region=main")));
        assert!(!filter.matches(&block("py file=a.py region=other")));
    }

    #[test]
    fn every_metadata_key_must_match() {
        let filter = BlockFilter::new().meta("a", "1").meta("b", "2");
        assert!(filter.matches(&block("x a=1 b=2 c=3")));
        assert!(!filter.matches(&block("x a=1 b=3")));
        assert!(!filter.matches(&block("x a=1")));
    }

    #[test]
    fn language_match_is_exact() {
        let filter = BlockFilter::new().language("JS");
        assert!(!filter.matches(&block("js")));
    }
}
