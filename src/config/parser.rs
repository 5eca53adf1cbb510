use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::{Path, PathBuf};

/// Environment variable holding the crawl delay in seconds
pub const ENV_CRAWL_DELAY: &str = "CRAWL_DELAY";
/// Environment variable holding the per-run tool cap
pub const ENV_MAX_TOOLS: &str = "MAX_TOOLS";
/// Environment variable holding the database connection string
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Environment variable overriding the directory site root
pub const ENV_BASE_URL: &str = "CRAWL_BASE_URL";
/// Environment variable holding the request timeout in seconds
pub const ENV_REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT";

/// Where the SQLite database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    Memory,
}

/// Loads and parses a configuration file from the given path
///
/// Keys missing from the file keep their built-in defaults.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use ai_tool_finder::config::load_config;
///
/// let config = load_config(Path::new("finder.toml")).unwrap();
/// println!("Max tools: {}", config.crawler.max_tools);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Builds the effective configuration: defaults, then the optional file,
/// then the process environment
pub fn load_effective_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate(&config)?;
    Ok(config)
}

/// Applies environment overrides using the given variable lookup
///
/// The lookup is injected so callers (and tests) are not tied to the
/// process environment.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_CRAWL_DELAY) {
        config.crawler.crawl_delay = parse_env(ENV_CRAWL_DELAY, &value)?;
    }

    if let Some(value) = lookup(ENV_MAX_TOOLS) {
        config.crawler.max_tools = parse_env(ENV_MAX_TOOLS, &value)?;
    }

    if let Some(value) = lookup(ENV_REQUEST_TIMEOUT) {
        config.crawler.request_timeout = parse_env(ENV_REQUEST_TIMEOUT, &value)?;
    }

    if let Some(value) = lookup(ENV_BASE_URL) {
        config.crawler.base_url = value.trim().trim_end_matches('/').to_string();
    }

    if let Some(value) = lookup(ENV_DATABASE_URL) {
        config.output.database_url = value.trim().to_string();
    }

    Ok(())
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// Resolves a database connection string to a location
///
/// Accepted forms: `sqlite:///path`, `sqlite://path`, `sqlite::memory:`,
/// `:memory:`, or a bare filesystem path.
pub fn parse_database_url(database_url: &str) -> Result<DatabaseLocation, ConfigError> {
    let trimmed = database_url.trim();

    if trimmed.is_empty() {
        return Err(ConfigError::Validation(
            "database_url cannot be empty".to_string(),
        ));
    }

    if trimmed == ":memory:" || trimmed == "sqlite::memory:" || trimmed == "sqlite://:memory:" {
        return Ok(DatabaseLocation::Memory);
    }

    let path = if let Some(rest) = trimmed.strip_prefix("sqlite:///") {
        // sqlite:///./tools.db is relative, sqlite:////var/db is absolute
        rest
    } else if let Some(rest) = trimmed.strip_prefix("sqlite://") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("sqlite:") {
        rest
    } else if trimmed.contains("://") {
        return Err(ConfigError::Validation(format!(
            "only sqlite database URLs are supported, got '{}'",
            trimmed
        )));
    } else {
        trimmed
    };

    if path.is_empty() {
        return Err(ConfigError::Validation(format!(
            "database URL '{}' has no path",
            trimmed
        )));
    }

    Ok(DatabaseLocation::File(PathBuf::from(path)))
}
