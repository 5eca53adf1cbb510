//! AI Tool Finder main entry point
//!
//! This is the command-line interface for the tool directory crawler.

use ai_tool_finder::config::{load_effective_config, Config};
use ai_tool_finder::crawler::run_crawl;
use ai_tool_finder::output::{load_statistics, print_statistics, search_as_json};
use ai_tool_finder::storage::open_storage;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// AI Tool Finder: a polite tool directory crawler
///
/// Crawls the directory's tool sitemaps while respecting robots.txt and a
/// minimum delay between requests, and stores every tool in a searchable
/// SQLite catalog.
#[derive(Parser, Debug)]
#[command(name = "ai-tool-finder")]
#[command(version = "1.0.0")]
#[command(about = "A polite AI tool directory crawler", long_about = None)]
struct Cli {
    /// Optional TOML configuration file, applied before environment variables
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show catalog statistics from the database and exit
    #[arg(long, conflicts_with = "search")]
    stats: bool,

    /// Search stored tools and print the matches as JSON
    #[arg(long, value_name = "QUERY", conflicts_with = "stats")]
    search: Option<String>,

    /// Maximum number of search results
    #[arg(long, default_value_t = 20, requires = "search")]
    limit: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_effective_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e).context("invalid configuration");
        }
    };

    if cli.stats {
        handle_stats(&config)
    } else if let Some(query) = cli.search.as_deref() {
        handle_search(&config, query, cli.limit)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ai_tool_finder=info,warn"),
            1 => EnvFilter::new("ai_tool_finder=debug,info"),
            2 => EnvFilter::new("ai_tool_finder=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_url);

    let storage = open_storage(&config.output.database_url).context("opening the catalog")?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --search mode: prints matching tools as JSON
fn handle_search(config: &Config, query: &str, limit: usize) -> anyhow::Result<()> {
    let storage = open_storage(&config.output.database_url).context("opening the catalog")?;
    println!("{}", search_as_json(&storage, query, limit)?);
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} as {} (delay {}s, max {} tools)",
        config.crawler.base_url,
        config.user_agent.header_value(),
        config.crawler.crawl_delay,
        config.crawler.max_tools
    );

    match run_crawl(config).await {
        Ok(report) => {
            tracing::info!(
                "Crawl finished: {} saved, {} already present, {} fetch failures, {} save failures",
                report.tools_saved,
                report.already_present,
                report.fetch_failures,
                report.save_failures
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
