//! Crawler module for tool discovery and extraction
//!
//! This module contains the core crawling logic, including:
//! - The politeness gate and its injectable clock
//! - Gated HTTP fetching
//! - Sitemap walking
//! - Heuristic field extraction
//! - Overall crawl coordination

mod clock;
mod coordinator;
mod extractor;
mod fetcher;
mod gate;
mod sitemap;

pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::{run_crawl, Coordinator, CrawlPhase, CrawlReport};
pub use extractor::{extract, DESCRIPTION_MAX_CHARS, MAX_CATEGORIES, PRICING_MAX_CHARS};
pub use fetcher::{build_http_client, fetch_url, FetchResult, FetchedPage, Fetcher};
pub use gate::PolitenessGate;
pub use sitemap::{
    list_tool_sitemaps, list_tool_urls, parse_sitemap_locs, select_tool_sitemaps,
    sitemap_index_url, MAX_TOOL_SITEMAPS, SITEMAP_NS, TOOL_SITEMAP_MARKER,
};
