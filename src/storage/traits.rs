//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::model::{Category, Tool, ToolRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid tool URL: {0:?}")]
    InvalidUrl(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Outcome of saving an extracted tool record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new tool row was created with this id
    Inserted(i64),
    /// A tool with the same URL was already stored; nothing was written
    AlreadyExists,
}

/// Trait for storage backend implementations
///
/// This trait defines every catalog operation the crawler and the CLI need.
pub trait Storage {
    // ===== Writes =====

    /// Inserts a tool unless its URL is already stored
    ///
    /// Categories are looked up by exact name and created when missing. The
    /// category resolution, tool insert and attachments commit together or
    /// not at all.
    fn save_tool(&mut self, record: &ToolRecord) -> StorageResult<SaveOutcome>;

    /// Rebuilds the full-text index from the `tools` table
    fn rebuild_search_index(&mut self) -> StorageResult<()>;

    // ===== Tool Lookups =====

    /// Gets a tool by id, with its categories
    fn get_tool(&self, tool_id: i64) -> StorageResult<Tool>;

    /// Gets a tool by URL, with its categories
    fn get_tool_by_url(&self, url: &str) -> StorageResult<Option<Tool>>;

    /// Full-text search over tool names and descriptions, best match first
    fn search_tools(&self, query: &str, limit: usize) -> StorageResult<Vec<Tool>>;

    // ===== Category Lookups =====

    /// Gets a category by exact name
    fn get_category_by_name(&self, name: &str) -> StorageResult<Option<Category>>;

    /// Lists every category with its tool count, most used first
    fn list_categories(&self) -> StorageResult<Vec<Category>>;

    // ===== Statistics =====

    /// Counts stored tools
    fn count_tools(&self) -> StorageResult<u64>;

    /// Counts stored categories
    fn count_categories(&self) -> StorageResult<u64>;

    /// Counts tool-category attachments
    fn count_associations(&self) -> StorageResult<u64>;
}
