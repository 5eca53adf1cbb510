//! AI Tool Finder: a polite single-site tool directory crawler
//!
//! This crate crawls a tool directory's sitemaps, extracts a record for every
//! listed tool, and stores the catalog in SQLite with an FTS5 search index.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod robots;
pub mod storage;

use thiserror::Error;

/// Main error type for AI Tool Finder operations
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid value for environment variable {name}: {value:?}")]
    InvalidEnv { name: String, value: String },
}

/// Result type alias for AI Tool Finder operations
pub type Result<T> = std::result::Result<T, FinderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{extract, Coordinator, CrawlPhase, CrawlReport};
pub use model::{Category, Tool, ToolRecord};
pub use storage::{SaveOutcome, SqliteStorage, Storage};
