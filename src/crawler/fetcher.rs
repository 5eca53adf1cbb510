//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the crawler's user agent and timeout
//! - GET requests to fetch page and sitemap content
//! - Error classification
//! - Gating every request through the politeness gate

use crate::config::UserAgentConfig;
use crate::crawler::clock::{Clock, SystemClock};
use crate::crawler::gate::PolitenessGate;
use reqwest::Client;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The server answered with a status outside 2xx/3xx
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// A page retrieved through the gate
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested
    pub url: String,
    pub status_code: u16,
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Whole-request timeout
///
/// # Example
///
/// ```no_run
/// use ai_tool_finder::config::UserAgentConfig;
/// use ai_tool_finder::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs one GET and classifies the outcome
///
/// Redirects are followed by the client. Any 2xx or 3xx final status is a
/// success; no retries are attempted.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();

            if !(status.is_success() || status.is_redirection()) {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    final_url,
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                },
            }
        }
        Err(e) => {
            // Classify error
            if e.is_timeout() {
                FetchResult::NetworkError {
                    error: "Request timeout".to_string(),
                }
            } else if e.is_connect() {
                FetchResult::NetworkError {
                    error: format!("Connection failed: {}", e),
                }
            } else {
                FetchResult::NetworkError {
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Sequential fetcher that consults the politeness gate before every request
pub struct Fetcher<C: Clock = SystemClock> {
    client: Client,
    gate: PolitenessGate<C>,
}

impl<C: Clock> Fetcher<C> {
    pub fn new(client: Client, gate: PolitenessGate<C>) -> Self {
        Self { client, gate }
    }

    pub fn gate(&self) -> &PolitenessGate<C> {
        &self.gate
    }

    /// Fetches `url` if robots.txt allows it
    ///
    /// Returns `None` when the URL is disallowed (logged as a warning, no
    /// request made, timing untouched) or when the request fails (logged as
    /// an error). The caller simply skips the URL.
    pub async fn fetch(&mut self, url: &str) -> Option<FetchedPage> {
        if !self.gate.can_fetch(url) {
            tracing::warn!("Robots.txt disallows: {}", url);
            return None;
        }

        self.gate.acquire().await;

        match fetch_url(&self.client, url).await {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => {
                if final_url != url {
                    tracing::debug!("{} redirected to {}", url, final_url);
                }
                tracing::debug!("Fetched {} ({}, {} bytes)", url, status_code, body.len());
                Some(FetchedPage {
                    url: url.to_string(),
                    status_code,
                    body,
                })
            }
            FetchResult::HttpError { status_code } => {
                tracing::error!("Error fetching {}: HTTP {}", url, status_code);
                None
            }
            FetchResult::NetworkError { error } => {
                tracing::error!("Error fetching {}: {}", url, error);
                None
            }
        }
    }
}
