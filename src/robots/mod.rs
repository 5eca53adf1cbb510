//! Robots.txt handling module
//!
//! This module provides functionality for fetching and parsing the directory
//! site's robots.txt. The policy is loaded once per run, before crawling.

mod parser;

pub use parser::ParsedRobots;

use reqwest::{Client, StatusCode};

/// Builds the robots.txt URL for a site root
pub fn robots_url(base_url: &str) -> String {
    format!("{}/robots.txt", base_url.trim_end_matches('/'))
}

/// Extracts the robots.txt product token from a full User-Agent value
///
/// `AIToolFinderBot/1.0 (+https://...)` becomes `AIToolFinderBot`.
pub fn product_token(user_agent: &str) -> &str {
    user_agent
        .split(|c: char| c == '/' || c.is_whitespace())
        .next()
        .unwrap_or(user_agent)
}

/// Fetches robots.txt for the site
///
/// The request bypasses the politeness gate. Outcomes:
/// - 2xx: the body is parsed
/// - 401/403: everything is disallowed
/// - 5xx: the policy is unavailable, so everything is disallowed
/// - any other status: everything is allowed
/// - network or read failure: everything is disallowed, with a warning
///
/// # Arguments
///
/// * `client` - The HTTP client carrying the crawler's user agent
/// * `base_url` - Root URL of the site
pub async fn fetch_robots(client: &Client, base_url: &str) -> ParsedRobots {
    let url = robots_url(base_url);
    tracing::debug!("Fetching robots.txt from {}", url);

    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(
                "Could not fetch {}: {}; treating the whole site as disallowed",
                url,
                e
            );
            return ParsedRobots::disallow_all();
        }
    };

    let status = response.status();

    let access_refused = status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN;
    if access_refused || status.is_server_error() {
        tracing::warn!("{} returned {}; treating the whole site as disallowed", url, status);
        return ParsedRobots::disallow_all();
    }

    if !status.is_success() {
        tracing::info!("{} returned {}; no restrictions apply", url, status);
        return ParsedRobots::allow_all();
    }

    match response.text().await {
        Ok(body) => {
            tracing::info!("Loaded robots.txt ({} bytes)", body.len());
            ParsedRobots::from_content(&body)
        }
        Err(e) => {
            tracing::warn!(
                "Could not read {}: {}; treating the whole site as disallowed",
                url,
                e
            );
            ParsedRobots::disallow_all()
        }
    }
}
