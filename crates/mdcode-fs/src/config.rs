//! Layered configuration
//!
//! Configuration is read from up to three TOML files, later layers
//! overriding earlier ones key by key:
//! 1. Global (`<config_dir>/mdcode/config.toml`)
//! 2. Project (`mdcode.toml` next to the document)
//! 3. Explicit (`--config` / `MDCODE_CONFIG`)
//!
//! Every layer is optional. A layer that fails to parse is an error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mdcode_content::CommentStyle;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, io};

/// File name of the project-level config layer
pub const PROJECT_CONFIG_FILE: &str = "mdcode.toml";

/// Default pattern for names of anonymous blocks
pub const DEFAULT_NAME_PATTERN: &str = "block-{index}.{ext}";

/// A single config file as written on disk
///
/// Every value is optional so that a layer only overrides what it names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Language tag to comment prefix, e.g. `sql = "--"`
    #[serde(default)]
    pub comments: BTreeMap<String, String>,

    /// Language tag to file extension, e.g. `typescript = "ts"`
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,

    #[serde(default)]
    pub extract: ExtractFile,

    #[serde(default)]
    pub exec: ExecFile,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractFile {
    pub out_dir: Option<PathBuf>,
    pub name_pattern: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecFile {
    pub shell: Option<String>,
    pub keep: Option<bool>,
}

impl ConfigFile {
    /// Parse a config layer from TOML text
    ///
    /// ```
    /// use mdcode_fs::config::ConfigFile;
    ///
    /// let file = ConfigFile::parse(r#"
    /// [comments]
    /// sql = "--"
    ///
    /// [exec]
    /// shell = "bash"
    /// "#).unwrap();
    ///
    /// assert_eq!(file.comments["sql"], "--");
    /// assert_eq!(file.exec.shell.as_deref(), Some("bash"));
    /// ```
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a config layer from disk, attaching the path to any error
    pub fn load(path: &Path) -> Result<Self> {
        let content = io::read_text(path)?;
        let file = Self::parse(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;

        if let Some((language, prefix)) = file
            .comments
            .iter()
            .find(|(_, prefix)| CommentStyle::from_prefix(prefix).is_none())
        {
            return Err(Error::ConfigParse {
                path: path.to_path_buf(),
                message: format!("unsupported comment prefix {prefix:?} for {language}"),
            });
        }
        Ok(file)
    }
}

/// Effective configuration after all layers are merged
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub comments: BTreeMap<String, String>,
    pub extensions: BTreeMap<String, String>,
    pub extract: ExtractConfig,
    pub exec: ExecConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractConfig {
    /// Output directory; the document's directory when unset
    pub out_dir: Option<PathBuf>,
    pub name_pattern: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecConfig {
    pub shell: String,
    pub keep: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            comments: BTreeMap::new(),
            extensions: BTreeMap::new(),
            extract: ExtractConfig {
                out_dir: None,
                name_pattern: DEFAULT_NAME_PATTERN.to_string(),
            },
            exec: ExecConfig {
                shell: "sh".to_string(),
                keep: false,
            },
        }
    }
}

impl Config {
    /// Apply a config layer on top of this one
    ///
    /// Map entries are merged key by key (keys compared lowercase), scalars
    /// are replaced when the layer sets them.
    pub fn merge(&mut self, layer: &ConfigFile) {
        for (language, prefix) in &layer.comments {
            self.comments
                .insert(language.to_ascii_lowercase(), prefix.clone());
        }
        for (language, ext) in &layer.extensions {
            self.extensions.insert(
                language.to_ascii_lowercase(),
                ext.trim_start_matches('.').to_string(),
            );
        }
        if let Some(out_dir) = &layer.extract.out_dir {
            self.extract.out_dir = Some(out_dir.clone());
        }
        if let Some(pattern) = &layer.extract.name_pattern {
            self.extract.name_pattern = pattern.clone();
        }
        if let Some(shell) = &layer.exec.shell {
            self.exec.shell = shell.clone();
        }
        if let Some(keep) = layer.exec.keep {
            self.exec.keep = keep;
        }
    }

    /// Comment style for region markers in `language`, honoring overrides
    pub fn comment_style(&self, language: &str) -> CommentStyle {
        self.comments
            .get(&language.to_ascii_lowercase())
            .and_then(|prefix| CommentStyle::from_prefix(prefix))
            .unwrap_or_else(|| CommentStyle::for_language(language))
    }

    /// Start and end marker lines for region `name` in `language`
    pub fn region_markers(&self, language: &str, name: &str) -> (String, String) {
        let style = self.comment_style(language);
        (style.format_start(name), style.format_end(name))
    }

    /// File extension for `language`
    ///
    /// Falls back to a built-in table, then to the tag itself, then to `txt`.
    pub fn extension_for(&self, language: &str) -> String {
        let language = language.to_ascii_lowercase();
        if let Some(ext) = self.extensions.get(&language) {
            return ext.clone();
        }
        let builtin = match language.as_str() {
            "javascript" => "js",
            "typescript" => "ts",
            "python" => "py",
            "ruby" => "rb",
            "rust" => "rs",
            "shell" | "bash" | "zsh" | "console" => "sh",
            "markdown" => "md",
            "yaml" => "yml",
            "haskell" => "hs",
            "golang" => "go",
            "" => "txt",
            other => other,
        };
        builtin.to_string()
    }

    /// Generated file name for the anonymous block at `index`
    ///
    /// ```
    /// use mdcode_fs::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.generated_name(3, "python"), "block-3.py");
    /// ```
    pub fn generated_name(&self, index: usize, language: &str) -> String {
        self.extract
            .name_pattern
            .replace("{index}", &index.to_string())
            .replace("{lang}", language)
            .replace("{ext}", &self.extension_for(language))
    }
}

/// Resolves configuration by merging the global, project, and explicit layers
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    /// Directory holding the document; searched for `mdcode.toml`
    project_dir: Option<PathBuf>,

    /// Explicit config file, always loaded last
    explicit: Option<PathBuf>,

    /// Override for the global config directory (used for testing).
    /// When `None`, `dirs::config_dir()` is used.
    global_config_dir_override: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = Some(dir.into());
        self
    }

    pub fn explicit(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    pub fn with_global_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.global_config_dir_override = Some(dir.into());
        self
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref override_dir) = self.global_config_dir_override {
            return Some(override_dir.clone());
        }
        dirs::config_dir().map(|d| d.join("mdcode"))
    }

    /// Load and merge every layer that exists
    ///
    /// Missing global and project files are skipped. A missing explicit
    /// file is an error, since the user asked for it by name.
    pub fn resolve(&self) -> Result<Config> {
        let mut config = Config::default();

        // Layer 1 - Global (<config_dir>/mdcode/config.toml)
        if let Some(global_dir) = self.global_config_dir() {
            let global_config_path = global_dir.join("config.toml");
            if global_config_path.is_file() {
                tracing::debug!(?global_config_path, "Loading global config (layer 1)");
                config.merge(&ConfigFile::load(&global_config_path)?);
            } else {
                tracing::debug!(?global_config_path, "No global config found (layer 1)");
            }
        }

        // Layer 2 - Project (mdcode.toml beside the document)
        if let Some(project_dir) = &self.project_dir {
            let project_config_path = project_dir.join(PROJECT_CONFIG_FILE);
            if project_config_path.is_file() {
                tracing::debug!(?project_config_path, "Loading project config (layer 2)");
                config.merge(&ConfigFile::load(&project_config_path)?);
            }
        }

        // Layer 3 - Explicit
        if let Some(explicit_path) = &self.explicit {
            tracing::debug!(?explicit_path, "Loading explicit config (layer 3)");
            config.merge(&ConfigFile::load(explicit_path)?);
        }

        Ok(config)
    }
}
