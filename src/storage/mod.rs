//! Storage module for persisting the tool catalog
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Idempotent tool upserts with lazily created categories
//! - The FTS5 search index, kept in sync by triggers
//! - Catalog lookups and statistics

mod schema;
mod sqlite;
mod traits;

pub use schema::{initialize_schema, SCHEMA_SQL};
pub use sqlite::SqliteStorage;
pub use traits::{SaveOutcome, Storage, StorageError, StorageResult};

use crate::config::{parse_database_url, DatabaseLocation};
use crate::FinderError;

/// Opens the storage database named by a connection string
///
/// # Arguments
///
/// * `database_url` - e.g. `sqlite:///./tools.db` or `sqlite::memory:`
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Database opened and schema ensured
/// * `Err(FinderError)` - Invalid URL, or the database could not be initialized
pub fn open_storage(database_url: &str) -> Result<SqliteStorage, FinderError> {
    match parse_database_url(database_url)? {
        DatabaseLocation::Memory => SqliteStorage::new_in_memory(),
        DatabaseLocation::File(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            SqliteStorage::new(&path)
        }
    }
}
