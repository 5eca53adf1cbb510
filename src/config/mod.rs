//! Configuration module for AI Tool Finder
//!
//! Configuration is layered: built-in defaults, an optional TOML file, then
//! environment variables (`CRAWL_DELAY`, `MAX_TOOLS`, `DATABASE_URL`, ...).
//!
//! # Example
//!
//! ```no_run
//! use ai_tool_finder::config::load_effective_config;
//!
//! let config = load_effective_config(None).unwrap();
//! println!("Crawl delay: {}s", config.crawler.crawl_delay);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, load_config, load_effective_config, parse_database_url,
    DatabaseLocation, ENV_BASE_URL, ENV_CRAWL_DELAY, ENV_DATABASE_URL, ENV_MAX_TOOLS,
    ENV_REQUEST_TIMEOUT,
};
pub use validation::validate;
