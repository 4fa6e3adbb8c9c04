//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use mdcode_content::BlockFilter;

/// mdcode - Keep fenced code blocks in Markdown in sync with source files
#[derive(Parser, Debug)]
#[command(name = "mdcode")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file applied on top of the global and project config
    #[arg(long, global = true, env = "MDCODE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options selecting which blocks a command acts on
///
/// All given options must match.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterArgs {
    /// Only blocks with this language tag
    #[arg(long = "lang", value_name = "LANG")]
    pub language: Option<String>,

    /// Only blocks with this `file` metadata
    #[arg(long)]
    pub file: Option<String>,

    /// Only blocks with this `region` metadata
    #[arg(long)]
    pub region: Option<String>,

    /// Only blocks with this metadata pair (repeatable)
    #[arg(long = "meta", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub meta: Vec<(String, String)>,
}

impl FilterArgs {
    /// Build a block filter, or `None` when no option was given
    pub fn to_filter(&self) -> Option<BlockFilter> {
        let mut filter = BlockFilter::new();
        if let Some(language) = &self.language {
            filter = filter.language(language);
        }
        if let Some(file) = &self.file {
            filter = filter.file(file);
        }
        if let Some(region) = &self.region {
            filter = filter.region(region);
        }
        for (key, value) in &self.meta {
            filter = filter.meta(key, value);
        }
        (!filter.is_empty()).then_some(filter)
    }
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List fenced code blocks
    List {
        /// Markdown document
        doc: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// Print one JSON object per block
        #[arg(long)]
        json: bool,
    },

    /// Write blocks with `file` metadata out to disk
    ///
    /// Blocks with `region=NAME` are spliced into that region of the target
    /// file. Blocks with `outline=true` are skipped.
    ///
    /// Examples:
    ///   mdcode extract README.md                 # Next to the document
    ///   mdcode extract README.md --out build/    # Into build/
    ///   mdcode extract README.md --name-anonymous --lang python
    Extract {
        /// Markdown document
        doc: PathBuf,

        /// Output directory (default: config, then the document's directory)
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Generate names for blocks without `file` and record them in the document
        #[arg(long)]
        name_anonymous: bool,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Refresh blocks from the files their metadata names
    ///
    /// Examples:
    ///   mdcode update README.md
    ///   mdcode update README.md --dry-run
    ///   mdcode update README.md --transform 'sed s/foo/bar/'
    Update {
        /// Markdown document
        doc: PathBuf,

        /// Shell command the code is piped through before it is written
        #[arg(short, long, value_name = "CMD")]
        transform: Option<String>,

        /// Print a diff instead of writing the document
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Pack blocks into a tar archive
    Archive {
        /// Markdown document
        doc: PathBuf,

        /// Archive to write
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Run a command against each block
    ///
    /// Each block is written to a temporary file whose path replaces `{file}`
    /// in CMD.
    ///
    /// Examples:
    ///   mdcode exec README.md 'python3 {file}' --lang python
    Exec {
        /// Markdown document
        doc: PathBuf,

        /// Command to run; `{file}` is replaced with the block's temp file
        #[arg(value_name = "CMD")]
        command: String,

        /// Keep the temporary files
        #[arg(long)]
        keep: bool,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_no_args() {
        let cli = Cli::parse_from(["mdcode"]);
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_verbose_flag_after_subcommand() {
        let cli = Cli::parse_from(["mdcode", "list", "README.md", "-v"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_list_with_filters() {
        let cli = Cli::parse_from([
            "mdcode", "list", "doc.md", "--lang", "js", "--meta", "a=1", "--meta", "b=x=y",
            "--json",
        ]);
        match cli.command {
            Some(Commands::List { doc, filter, json }) => {
                assert_eq!(doc, PathBuf::from("doc.md"));
                assert!(json);
                assert_eq!(filter.language.as_deref(), Some("js"));
                assert_eq!(
                    filter.meta,
                    vec![
                        ("a".to_string(), "1".to_string()),
                        ("b".to_string(), "x=y".to_string())
                    ]
                );
            }
            other => panic!("Expected List command, got {other:?}"),
        }
    }

    #[rstest]
    #[case("a=1", Some(("a", "1")))]
    #[case("empty=", Some(("empty", "")))]
    #[case("url=a=b", Some(("url", "a=b")))]
    #[case("=value", None)]
    #[case("novalue", None)]
    fn key_val_parsing(#[case] raw: &str, #[case] expected: Option<(&str, &str)>) {
        let parsed = parse_key_val(raw).ok();
        let expected = expected.map(|(k, v)| (k.to_string(), v.to_string()));
        assert_eq!(parsed, expected);
    }

    #[test]
    fn parse_meta_without_equals_fails() {
        assert!(Cli::try_parse_from(["mdcode", "list", "doc.md", "--meta", "oops"]).is_err());
    }

    #[test]
    fn parse_extract_defaults() {
        let cli = Cli::parse_from(["mdcode", "extract", "doc.md"]);
        assert_eq!(
            cli.command,
            Some(Commands::Extract {
                doc: PathBuf::from("doc.md"),
                out: None,
                name_anonymous: false,
                filter: FilterArgs::default(),
            })
        );
    }

    #[test]
    fn parse_update_with_transform() {
        let cli = Cli::parse_from([
            "mdcode", "update", "doc.md", "-t", "tr a-z A-Z", "--dry-run", "--file", "a.js",
        ]);
        match cli.command {
            Some(Commands::Update {
                transform,
                dry_run,
                filter,
                ..
            }) => {
                assert_eq!(transform.as_deref(), Some("tr a-z A-Z"));
                assert!(dry_run);
                assert_eq!(filter.file.as_deref(), Some("a.js"));
            }
            other => panic!("Expected Update command, got {other:?}"),
        }
    }

    #[test]
    fn parse_archive_requires_out() {
        assert!(Cli::try_parse_from(["mdcode", "archive", "doc.md"]).is_err());
        let cli = Cli::parse_from(["mdcode", "archive", "doc.md", "-o", "blocks.tar"]);
        assert!(matches!(cli.command, Some(Commands::Archive { .. })));
    }

    #[test]
    fn parse_exec_command() {
        let cli = Cli::parse_from(["mdcode", "exec", "doc.md", "node {file}", "--keep"]);
        match cli.command {
            Some(Commands::Exec { command, keep, .. }) => {
                assert_eq!(command, "node {file}");
                assert!(keep);
            }
            other => panic!("Expected Exec command, got {other:?}"),
        }
    }

    #[test]
    fn parse_global_config() {
        let cli = Cli::parse_from(["mdcode", "list", "doc.md", "--config", "ci.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("ci.toml")));
    }

    #[test]
    fn parse_completions() {
        let cli = Cli::parse_from(["mdcode", "completions", "bash"]);
        assert_eq!(
            cli.command,
            Some(Commands::Completions { shell: Shell::Bash })
        );
    }

    #[test]
    fn empty_filter_args_build_no_filter() {
        assert!(FilterArgs::default().to_filter().is_none());
    }

    #[test]
    fn filter_args_build_conjunction() {
        let args = FilterArgs {
            language: Some("py".into()),
            region: Some("main".into()),
            ..Default::default()
        };
        let filter = args.to_filter().unwrap();
        assert_eq!(filter, BlockFilter::new().language("py").region("main"));
    }
}
