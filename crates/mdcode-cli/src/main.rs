//! mdcode CLI
//!
//! Keeps fenced code blocks in Markdown documents in sync with source files.

mod cli;
mod commands;
mod error;
mod transform;

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use colored::Colorize;
use mdcode_fs::{Config, ConfigResolver};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{ExecOptions, ExtractOptions, UpdateOptions};
use error::Result;
use transform::{ShellTransform, Transform};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(cmd, cli.config.as_deref()),
        None => {
            println!(
                "{} Keep Markdown code blocks in sync with source files",
                "mdcode".green().bold()
            );
            println!();
            println!("Run {} for available commands.", "mdcode --help".cyan());
            Ok(())
        }
    }
}

/// Log to stderr so that command output on stdout stays clean
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
    tracing::debug!("Verbose mode enabled");
}

fn execute_command(cmd: Commands, explicit_config: Option<&Path>) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cmd {
        Commands::List { doc, filter, json } => {
            commands::run_list(&doc, filter.to_filter().as_ref(), json, &mut out)
        }
        Commands::Extract {
            doc,
            out: out_dir,
            name_anonymous,
            filter,
        } => {
            let config = load_config(&doc, explicit_config)?;
            let filter = filter.to_filter();
            let options = ExtractOptions {
                out_dir,
                name_anonymous,
                filter: filter.as_ref(),
            };
            commands::run_extract(&doc, &config, &options, &mut out)
        }
        Commands::Update {
            doc,
            transform,
            dry_run,
            filter,
        } => {
            let config = load_config(&doc, explicit_config)?;
            let transform = transform.map(|command| {
                ShellTransform::new(&config.exec.shell, command, commands::doc_dir(&doc))
            });
            let filter = filter.to_filter();
            let options = UpdateOptions {
                filter: filter.as_ref(),
                dry_run,
            };
            runtime()?.block_on(commands::run_update(
                &doc,
                transform.as_ref().map(|t| t as &dyn Transform),
                options,
                &mut out,
            ))
        }
        Commands::Archive {
            doc,
            out: out_path,
            filter,
        } => {
            let config = load_config(&doc, explicit_config)?;
            commands::run_archive(
                &doc,
                &config,
                &out_path,
                filter.to_filter().as_ref(),
                &mut out,
            )
        }
        Commands::Exec {
            doc,
            command,
            keep,
            filter,
        } => {
            let config = load_config(&doc, explicit_config)?;
            let filter = filter.to_filter();
            let options = ExecOptions {
                command: &command,
                keep,
                filter: filter.as_ref(),
            };
            runtime()?.block_on(commands::run_exec(&doc, &config, options, &mut out))
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "mdcode", &mut out);
            Ok(())
        }
    }
}

fn load_config(doc: &Path, explicit: Option<&Path>) -> Result<Config> {
    let config = ConfigResolver::new()
        .project_dir(commands::doc_dir(doc))
        .explicit(explicit.map(PathBuf::from))
        .resolve()?;
    Ok(config)
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
