//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod extract;
mod parse;
mod suggest;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use jobscout::config::load_settings;

#[derive(Parser)]
#[command(name = "jobscout")]
#[command(about = "Extract job postings from job board URLs")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip the page metadata fetch when parsing URLs
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check for the verbose flag before the parser runs, so logging can be set
/// up first.
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Read job details from a URL without scraping the page
    Parse {
        /// Job posting URL
        url: String,
    },

    /// Scrape a job posting (plain HTTP first, then a browser session)
    Extract {
        /// Job posting URL
        url: String,
    },

    /// List job title or company suggestions
    Suggest {
        #[command(subcommand)]
        kind: SuggestCommands,
    },
}

#[derive(Subcommand)]
enum SuggestCommands {
    /// Common job titles
    Titles {
        /// Case-insensitive filter
        query: Option<String>,
    },
    /// Common companies
    Companies {
        /// Case-insensitive filter
        query: Option<String>,
    },
}

/// Print a value as pretty JSON on stdout.
fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Parse { url } => parse::cmd_parse(&settings, &url, cli.offline).await,
        Commands::Extract { url } => extract::cmd_extract(&settings, &url).await,
        Commands::Suggest { kind } => match kind {
            SuggestCommands::Titles { query } => suggest::cmd_suggest_titles(query.as_deref()),
            SuggestCommands::Companies { query } => {
                suggest::cmd_suggest_companies(query.as_deref())
            }
        },
    }
}
