//! cursor-rules: CLI for browsing curated Cursor rules and applying them
//! to a project's .cursorrules file
//!
//! Rules come from a community-maintained list that is synced at most once
//! a day and cached locally, so the tool stays usable offline.

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;

mod commands;
mod config;
mod protocol;
mod rules;

#[derive(Parser)]
#[command(name = "cursor-rules")]
#[command(about = "Browse curated Cursor rules and apply them to .cursorrules", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available rules
    List {
        /// Only rules carrying this tag
        #[arg(long, short)]
        tag: Option<String>,

        /// Only rules targeting this library
        #[arg(long, short)]
        lib: Option<String>,

        /// Pattern to match against slug or title
        #[arg(long, short)]
        filter: Option<String>,

        /// Sort by: source, slug, title (default: source)
        #[arg(long, short, default_value = "source")]
        sort: String,

        /// Reverse sort order
        #[arg(long, short)]
        reverse: bool,

        /// Limit number of results
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show a single rule
    Show {
        /// Rule slug (see `list`)
        slug: String,

        /// Print only the rule content, suitable for piping
        #[arg(long)]
        raw: bool,
    },

    /// Write a rule into a workspace's .cursorrules file
    Apply {
        /// Rule slug (see `list`)
        slug: String,

        /// Workspace directory (defaults to the current directory)
        #[arg(long, short)]
        dir: Option<PathBuf>,

        /// Overwrite an existing .cursorrules without asking
        #[arg(short, long)]
        yes: bool,

        /// Show what would be done without making changes
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Fetch the rule list now, regardless of cache freshness
    Sync,

    /// Show cache and sync state
    Status {
        /// Also probe whether the rule source is reachable
        #[arg(long)]
        probe: bool,
    },

    /// Serve the editor protocol over stdio (one JSON message per line)
    Serve {
        /// Workspace directory for setRule requests (defaults to the current directory)
        #[arg(long, short)]
        workspace: Option<PathBuf>,

        /// Overwrite an existing .cursorrules on setRule requests
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List {
            tag,
            lib,
            filter,
            sort,
            reverse,
            limit,
        } => {
            let options = commands::list::ListOptions {
                tag,
                lib,
                filter,
                sort,
                reverse,
                limit,
            };
            let output = commands::list::execute(options)?;
            println!("{}", output);
        }

        Commands::Show { slug, raw } => {
            commands::show::execute(&slug, raw)?;
        }

        Commands::Apply {
            slug,
            dir,
            yes,
            dry_run,
        } => {
            if dry_run {
                println!("{}", "(DRY-RUN MODE - no changes will be made)".blue());
            }
            commands::apply::execute(&slug, dir, yes, dry_run)?;
        }

        Commands::Sync => {
            commands::sync::execute()?;
        }

        Commands::Status { probe } => {
            let status = commands::status::status(probe)?;
            println!("{}", commands::status::format_status(&status));
        }

        Commands::Serve { workspace, force } => {
            commands::serve::execute(workspace, force)?;
        }
    }

    Ok(())
}
