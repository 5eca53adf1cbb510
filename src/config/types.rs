use serde::Deserialize;

/// Main configuration structure for AI Tool Finder
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Root of the directory site; `sitemap.xml` and `robots.txt` live here
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Minimum time between two requests (seconds)
    #[serde(rename = "crawl-delay")]
    pub crawl_delay: u64,

    /// Maximum number of tools saved in a single run
    #[serde(rename = "max-tools")]
    pub max_tools: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.toolify.ai".to_string(),
            crawl_delay: 5,
            max_tools: 1000,
            request_timeout: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler, also the robots.txt product token
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "AIToolFinderBot".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://github.com/amalsp220/ai-tool-finder".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the full User-Agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Database connection string, e.g. `sqlite:///./tools.db`
    #[serde(rename = "database-url")]
    pub database_url: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:///./tools.db".to_string(),
        }
    }
}
