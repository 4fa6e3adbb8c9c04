//! Comment styles for region markers

use serde::{Deserialize, Serialize};

/// Line comment syntaxes recognized around `#region` markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStyle {
    /// `// comment`
    Slash,
    /// `# comment`
    Hash,
    /// `-- comment`
    DoubleDash,
    /// `/* comment */`
    Block,
    /// `<!-- comment -->`
    Html,
    /// `; comment`
    Semicolon,
    /// `% comment`
    Percent,
    /// `' comment`
    Apostrophe,
}

impl CommentStyle {
    pub const ALL: [CommentStyle; 8] = [
        Self::Slash,
        Self::Hash,
        Self::DoubleDash,
        Self::Block,
        Self::Html,
        Self::Semicolon,
        Self::Percent,
        Self::Apostrophe,
    ];

    /// Style for a language tag (case-insensitive), `//` when unknown
    pub fn for_language(language: &str) -> Self {
        match language.to_ascii_lowercase().as_str() {
            "python" | "py" | "ruby" | "rb" | "sh" | "bash" | "zsh" | "fish" | "shell"
            | "console" | "perl" | "pl" | "r" | "yaml" | "yml" | "toml" | "dockerfile"
            | "makefile" | "make" | "cmake" | "powershell" | "ps1" | "elixir" | "ex" | "exs"
            | "nix" | "coffee" | "julia" | "jl" | "tcl" | "awk" | "conf" | "gitignore" => {
                Self::Hash
            }
            "sql" | "lua" | "haskell" | "hs" | "elm" | "ada" | "purescript" => Self::DoubleDash,
            "html" | "xml" | "svg" | "xhtml" | "vue" | "svelte" | "markdown" | "md" => Self::Html,
            "css" => Self::Block,
            "lisp" | "clojure" | "clj" | "scheme" | "racket" | "ini" | "asm" | "nasm" => {
                Self::Semicolon
            }
            "tex" | "latex" | "matlab" | "erlang" | "erl" | "prolog" => Self::Percent,
            "vb" | "vba" | "vbnet" | "vbscript" => Self::Apostrophe,
            _ => Self::Slash,
        }
    }

    /// Style whose prefix is exactly `prefix`
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.prefix() == prefix)
    }

    /// Text opening a comment
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Slash => "//",
            Self::Hash => "#",
            Self::DoubleDash => "--",
            Self::Block => "/*",
            Self::Html => "<!--",
            Self::Semicolon => ";",
            Self::Percent => "%",
            Self::Apostrophe => "'",
        }
    }

    /// Text closing a comment, empty for line comments
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Block => " */",
            Self::Html => " -->",
            _ => "",
        }
    }

    /// Render a `#region` start marker line (no terminator)
    pub fn format_start(&self, name: &str) -> String {
        format!("{} #region {}{}", self.prefix(), name, self.suffix())
    }

    /// Render a `#endregion` marker line (no terminator)
    pub fn format_end(&self, name: &str) -> String {
        format!("{} #endregion {}{}", self.prefix(), name, self.suffix())
    }
}

/// Comment prefix for a language tag, `//` when unknown
pub fn comment_prefix(language: &str) -> &'static str {
    CommentStyle::for_language(language).prefix()
}

/// Start and end marker lines for region `name` in `language`
pub fn region_markers(language: &str, name: &str) -> (String, String) {
    let style = CommentStyle::for_language(language);
    (style.format_start(name), style.format_end(name))
}
