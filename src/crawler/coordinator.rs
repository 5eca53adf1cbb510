//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the pieces together:
//! - Opening storage and ensuring the schema
//! - Loading robots.txt and building the politeness gate
//! - Walking tool sitemaps and fetching each tool page
//! - Extracting records and saving them, up to the per-run cap

use crate::config::Config;
use crate::crawler::clock::{Clock, SystemClock};
use crate::crawler::extractor::extract;
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::crawler::gate::PolitenessGate;
use crate::crawler::sitemap::{list_tool_sitemaps, list_tool_urls};
use crate::robots::fetch_robots;
use crate::storage::{open_storage, SaveOutcome, SqliteStorage, Storage};
use crate::FinderError;
use std::time::{Duration, Instant};
use url::Url;

/// Lifecycle of one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    /// Constructed, not started
    Idle,
    /// Reading the sitemap index
    Listing,
    /// Walking tool sitemaps and pages
    PerToolFetching,
    /// Sitemaps exhausted or the cap reached
    Done,
}

/// Counters describing a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    pub sitemaps_processed: usize,
    pub urls_seen: usize,
    pub pages_fetched: usize,
    /// Tool pages that were denied by robots.txt or failed to download
    pub fetch_failures: usize,
    /// Pages whose extracted name was empty
    pub empty_records: usize,
    pub tools_saved: u32,
    pub already_present: usize,
    pub save_failures: usize,
    /// Whether the run stopped because `max-tools` was reached
    pub cap_reached: bool,
    pub phase: CrawlPhase,
}

impl Default for CrawlReport {
    fn default() -> Self {
        Self {
            sitemaps_processed: 0,
            urls_seen: 0,
            pages_fetched: 0,
            fetch_failures: 0,
            empty_records: 0,
            tools_saved: 0,
            already_present: 0,
            save_failures: 0,
            cap_reached: false,
            phase: CrawlPhase::Idle,
        }
    }
}

/// Main crawler coordinator structure
///
/// Owns the storage connection and the gated fetcher; the saved-tool counter
/// lives here and is reset only by building a new coordinator.
pub struct Coordinator<C: Clock = SystemClock> {
    config: Config,
    storage: SqliteStorage,
    fetcher: Fetcher<C>,
    phase: CrawlPhase,
    report: CrawlReport,
}

impl Coordinator<SystemClock> {
    /// Creates a coordinator driven by wall-clock time
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Storage ready, robots.txt loaded
    /// * `Err(FinderError)` - Storage or HTTP client could not be initialized
    pub async fn new(config: Config) -> Result<Self, FinderError> {
        Self::with_clock(config, SystemClock).await
    }
}

impl<C: Clock> Coordinator<C> {
    /// Creates a coordinator with an explicit clock
    ///
    /// Opens the database (creating the schema), builds the HTTP client and
    /// loads robots.txt once for the whole run.
    pub async fn with_clock(config: Config, clock: C) -> Result<Self, FinderError> {
        let site = Url::parse(&config.crawler.base_url)?;

        let storage = open_storage(&config.output.database_url)?;
        tracing::info!("Storage ready at {}", config.output.database_url);

        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout),
        )?;

        let robots = fetch_robots(&client, &config.crawler.base_url).await;
        let gate = PolitenessGate::new(
            robots,
            &config.user_agent.header_value(),
            Duration::from_secs(config.crawler.crawl_delay),
            clock,
        );
        tracing::info!(
            "Minimum interval between requests to {}: {:?}",
            site.host_str().unwrap_or_default(),
            gate.min_interval()
        );

        Ok(Self::from_parts(config, storage, Fetcher::new(client, gate)))
    }

    /// Assembles a coordinator from already-built parts
    pub fn from_parts(config: Config, storage: SqliteStorage, fetcher: Fetcher<C>) -> Self {
        Self {
            config,
            storage,
            fetcher,
            phase: CrawlPhase::Idle,
            report: CrawlReport::default(),
        }
    }

    /// Runs the crawl to completion
    ///
    /// Per-URL failures are logged and skipped; the run itself cannot fail
    /// once the coordinator exists.
    pub async fn run(&mut self) -> CrawlReport {
        let start_time = Instant::now();
        let base_url = self.config.crawler.base_url.clone();
        let max_tools = self.config.crawler.max_tools;

        tracing::info!("Starting crawl of {} (max {} tools)", base_url, max_tools);

        self.phase = CrawlPhase::Listing;
        let sitemaps = list_tool_sitemaps(&mut self.fetcher, &base_url).await;

        self.phase = CrawlPhase::PerToolFetching;
        'sitemaps: for sitemap_url in &sitemaps {
            if self.cap_reached() {
                break;
            }

            let urls = list_tool_urls(&mut self.fetcher, sitemap_url).await;
            self.report.sitemaps_processed += 1;

            for url in &urls {
                if self.cap_reached() {
                    break 'sitemaps;
                }

                self.report.urls_seen += 1;
                self.process_url(url).await;

                if self.report.urls_seen % 10 == 0 {
                    tracing::info!(
                        "Progress: {} URLs seen, {} tools saved, {:.1}s elapsed",
                        self.report.urls_seen,
                        self.report.tools_saved,
                        start_time.elapsed().as_secs_f64()
                    );
                }
            }
        }

        if self.cap_reached() {
            self.report.cap_reached = true;
            tracing::info!("Reached the limit of {} tools", max_tools);
        }

        self.phase = CrawlPhase::Done;
        self.report.phase = CrawlPhase::Done;

        tracing::info!(
            "Crawl completed: {} tools saved, {} already present, {} URLs seen in {:?}",
            self.report.tools_saved,
            self.report.already_present,
            self.report.urls_seen,
            start_time.elapsed()
        );

        self.report.clone()
    }

    /// Fetches, extracts and saves one tool page
    async fn process_url(&mut self, url: &str) {
        let Some(page) = self.fetcher.fetch(url).await else {
            self.report.fetch_failures += 1;
            return;
        };
        self.report.pages_fetched += 1;

        let record = extract(url, &page.body);
        if !record.has_name() {
            tracing::debug!("No tool name found on {}, skipping", url);
            self.report.empty_records += 1;
            return;
        }

        match self.storage.save_tool(&record) {
            Ok(SaveOutcome::Inserted(id)) => {
                self.report.tools_saved += 1;
                tracing::info!("Saved tool: {} (id {})", record.name, id);
            }
            Ok(SaveOutcome::AlreadyExists) => {
                self.report.already_present += 1;
                tracing::info!("Tool already exists: {}", url);
            }
            Err(e) => {
                self.report.save_failures += 1;
                tracing::error!("Error saving tool from {}: {}", url, e);
            }
        }
    }

    fn cap_reached(&self) -> bool {
        self.report.tools_saved >= self.config.crawler.max_tools
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Tools saved by this coordinator so far
    pub fn tools_saved(&self) -> u32 {
        self.report.tools_saved
    }

    pub fn fetcher(&self) -> &Fetcher<C> {
        &self.fetcher
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    pub fn into_storage(self) -> SqliteStorage {
        self.storage
    }
}

/// Runs one complete crawl with the given configuration
///
/// This is the main entry point used by the binary.
pub async fn run_crawl(config: Config) -> Result<CrawlReport, FinderError> {
    let mut coordinator = Coordinator::new(config).await?;
    Ok(coordinator.run().await)
}
