mod commands;
mod config;
mod diagnostics;
mod error;
mod info;
mod pipeline;
mod prefix;
mod reference;
mod registry;
mod resolver;
mod scanner;
mod tokens;
mod types;
mod walker;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::Format;

#[derive(Parser)]
#[command(
    name = "anchor-prefixes",
    about = "Rewrite prefixed shorthand links in markdown into API reference URLs"
)]
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Output a reference document for link syntax, formats, and current state
    Info {
        /// Emit JSON instead of markdown
        #[arg(long)]
        json: bool,
    },
    /// Manage registered prefixes in .anchor-prefixes.toml
    Prefixes {
        /// Prefix action.
        #[command(subcommand)]
        action: PrefixAction,
    },
    /// Render markdown files to HTML with prefixed links rewritten
    Render {
        /// Markdown files to render, printed in order.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the URL a prefixed link resolves to
    Resolve {
        /// Link as it would appear in a markdown link target.
        link: String,
    },
    /// List prefixed links in markdown files and how each resolves
    Scan,
}

#[derive(Subcommand)]
enum PrefixAction {
    /// Register a prefix
    Add {
        /// Prefix name, without the colon.
        name: String,
        /// Base URL of resolved links.
        base: String,
        /// Output format for links using this prefix.
        #[arg(long, value_enum)]
        format: Option<Format>,
    },
    /// List registered prefixes
    List,
    /// Remove a prefix
    Remove {
        /// Prefix name, without the colon.
        name: String,
    },
}

/// Send `tracing` output to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| return EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Info { json } => {
            commands::info(json);
            Ok(ExitCode::SUCCESS)
        },
        Commands::Prefixes { action } => run_prefix_action(action),
        Commands::Render { files } => commands::render(&files).map(|()| return ExitCode::SUCCESS),
        Commands::Resolve { link } => commands::resolve(&link),
        Commands::Scan => commands::scan(),
    };

    return match result {
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(3)
        },
        Ok(code) => code,
    };
}

/// Dispatch a `prefixes` subcommand.
///
/// # Errors
///
/// Returns errors from config reading or writing.
fn run_prefix_action(action: PrefixAction) -> Result<ExitCode, error::Error> {
    match action {
        PrefixAction::Add { name, base, format } => registry::cmd_add(&name, &base, format)?,
        PrefixAction::List => registry::cmd_list()?,
        PrefixAction::Remove { name } => registry::cmd_remove(&name)?,
    }
    return Ok(ExitCode::SUCCESS);
}
