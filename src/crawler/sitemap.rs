//! Sitemap walker
//!
//! Discovers tool pages through the site's sitemap index. Only child sitemaps
//! whose location carries the tool marker are followed, and only the first few.

use crate::crawler::clock::Clock;
use crate::crawler::fetcher::Fetcher;

/// XML namespace of the sitemap protocol
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Substring identifying a tool sitemap in the index
pub const TOOL_SITEMAP_MARKER: &str = "sitemap_tools_";

/// Maximum number of tool sitemaps walked per run
pub const MAX_TOOL_SITEMAPS: usize = 4;

/// Builds the sitemap index URL for a site root
pub fn sitemap_index_url(base_url: &str) -> String {
    format!("{}/sitemap.xml", base_url.trim_end_matches('/'))
}

/// Parses sitemap XML and returns every namespaced `<loc>` value in document order
///
/// Works for both sitemap indexes and URL sets. Values are trimmed; empty
/// ones are skipped. `<loc>` elements outside the sitemap namespace are ignored.
pub fn parse_sitemap_locs(xml: &str) -> Result<Vec<String>, roxmltree::Error> {
    let xml = xml.trim_start_matches('\u{feff}');
    let doc = roxmltree::Document::parse(xml)?;

    let locs = doc
        .descendants()
        .filter(|node| node.has_tag_name((SITEMAP_NS, "loc")))
        .filter_map(|node| node.text())
        .map(str::trim)
        .filter(|loc| !loc.is_empty())
        .map(str::to_string)
        .collect();

    Ok(locs)
}

/// Keeps the tool sitemaps from an index listing, capped at [`MAX_TOOL_SITEMAPS`]
pub fn select_tool_sitemaps(locs: Vec<String>) -> Vec<String> {
    locs.into_iter()
        .filter(|loc| loc.contains(TOOL_SITEMAP_MARKER))
        .take(MAX_TOOL_SITEMAPS)
        .collect()
}

/// Lists the tool sitemaps referenced by `<base_url>/sitemap.xml`
///
/// A failed fetch or malformed XML yields an empty list.
pub async fn list_tool_sitemaps<C: Clock>(fetcher: &mut Fetcher<C>, base_url: &str) -> Vec<String> {
    let index_url = sitemap_index_url(base_url);

    let Some(page) = fetcher.fetch(&index_url).await else {
        return Vec::new();
    };

    match parse_sitemap_locs(&page.body) {
        Ok(locs) => {
            let sitemaps = select_tool_sitemaps(locs);
            tracing::info!("Found {} tool sitemaps in {}", sitemaps.len(), index_url);
            sitemaps
        }
        Err(e) => {
            tracing::error!("Error parsing sitemap index {}: {}", index_url, e);
            Vec::new()
        }
    }
}

/// Lists every tool URL in one tool sitemap
///
/// A failed fetch or malformed XML yields an empty list.
pub async fn list_tool_urls<C: Clock>(fetcher: &mut Fetcher<C>, sitemap_url: &str) -> Vec<String> {
    let Some(page) = fetcher.fetch(sitemap_url).await else {
        return Vec::new();
    };

    match parse_sitemap_locs(&page.body) {
        Ok(urls) => {
            tracing::info!("Found {} tool URLs in {}", urls.len(), sitemap_url);
            urls
        }
        Err(e) => {
            tracing::error!("Error parsing sitemap {}: {}", sitemap_url, e);
            Vec::new()
        }
    }
}
