//! Command-line interface definitions.
//!
//! Without flags the terminal dashboard starts. The one-shot flags run a
//! single operation against the store and exit.

use std::path::PathBuf;

use clap::Parser;

/// Scrape ballet news into a local store and explore it.
///
/// # Examples
///
/// ```sh
/// # Open the dashboard
/// ballet-news
///
/// # Scrape once and print the counts
/// ballet-news --scrape
///
/// # Print the analytics for Detik in 2025 as JSON
/// ballet-news --stats --source Detik --year 2025
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to config.toml (defaults to the user config directory)
    #[arg(short, long, env = "BALLET_NEWS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Scrape and save the latest articles, then exit
    #[arg(long, conflicts_with_all = ["stats", "dedupe"])]
    pub scrape: bool,

    /// Print analytics as JSON, then exit
    #[arg(long, conflicts_with = "dedupe")]
    pub stats: bool,

    /// Year for the monthly breakdown (with --stats)
    #[arg(long, requires = "stats")]
    pub year: Option<i32>,

    /// Only include these sources (with --stats, repeatable)
    #[arg(long = "source", requires = "stats")]
    pub sources: Vec<String>,

    /// Remove duplicate links and add a unique index, then exit
    #[arg(long)]
    pub dedupe: bool,
}
