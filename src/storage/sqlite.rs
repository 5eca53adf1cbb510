//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::model::{Category, Tool, ToolRecord};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{SaveOutcome, Storage, StorageError, StorageResult};
use crate::FinderError;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::path::Path;

const TOOL_COLUMNS: &str =
    "id, name, description, url, pricing, rating, created_at, updated_at";

const CATEGORY_COLUMNS: &str = "c.id, c.name, c.description, c.created_at, COUNT(tc.tool_id)";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// Opens (or creates) the database file and makes sure the schema,
    /// search index and triggers exist.
    pub fn new(path: &Path) -> Result<Self, FinderError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, FinderError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn load_categories_for(&self, tool_id: i64) -> StorageResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CATEGORY_COLUMNS}
             FROM categories c
             JOIN tool_categories own ON own.category_id = c.id AND own.tool_id = ?1
             LEFT JOIN tool_categories tc ON tc.category_id = c.id
             GROUP BY c.id
             ORDER BY c.id"
        ))?;

        let categories = stmt
            .query_map(params![tool_id], category_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    fn attach_categories(&self, mut tool: Tool) -> StorageResult<Tool> {
        tool.categories = self.load_categories_for(tool.id)?;
        Ok(tool)
    }
}

/// Looks up a category by exact name, creating it when missing
fn resolve_category(tx: &Transaction<'_>, name: &str, now: &str) -> StorageResult<i64> {
    let existing: Option<i64> = tx
        .query_row(
            "SELECT id FROM categories WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;

    if let Some(id) = existing {
        return Ok(id);
    }

    tx.execute(
        "INSERT INTO categories (name, created_at) VALUES (?1, ?2)",
        params![name, now],
    )?;

    Ok(tx.last_insert_rowid())
}

fn parse_timestamp(value: Option<String>) -> Option<DateTime<Utc>> {
    value.and_then(|s| s.parse::<DateTime<Utc>>().ok())
}

fn tool_from_row(row: &Row<'_>) -> rusqlite::Result<Tool> {
    Ok(Tool {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        url: row.get(3)?,
        pricing: row.get(4)?,
        rating: row.get(5)?,
        categories: Vec::new(),
        created_at: parse_timestamp(row.get(6)?),
        updated_at: parse_timestamp(row.get(7)?),
    })
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: parse_timestamp(row.get(3)?),
        tool_count: row.get::<_, i64>(4)? as u64,
    })
}

/// Turns free text into an FTS5 query that matches every word
///
/// Each word is quoted so operators and punctuation in user input are
/// treated as plain text.
fn fts_query(query: &str) -> Option<String> {
    let terms: Vec<String> = query
        .split_whitespace()
        .map(|term| format!("\"{}\"", term.replace('"', "\"\"")))
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" "))
    }
}

impl Storage for SqliteStorage {
    // ===== Writes =====

    fn save_tool(&mut self, record: &ToolRecord) -> StorageResult<SaveOutcome> {
        if record.url.trim().is_empty() {
            return Err(StorageError::InvalidUrl(record.url.clone()));
        }

        let tx = self.conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM tools WHERE url = ?1",
                params![record.url],
                |row| row.get(0),
            )
            .optional()?;

        if existing.is_some() {
            return Ok(SaveOutcome::AlreadyExists);
        }

        let now = Utc::now().to_rfc3339();

        let mut category_ids: Vec<i64> = Vec::with_capacity(record.categories.len());
        for name in &record.categories {
            let id = resolve_category(&tx, name, &now)?;
            if !category_ids.contains(&id) {
                category_ids.push(id);
            }
        }

        tx.execute(
            "INSERT INTO tools (name, description, url, pricing, rating, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                record.name,
                record.description,
                record.url,
                record.pricing,
                record.rating,
                now
            ],
        )?;
        let tool_id = tx.last_insert_rowid();

        for category_id in category_ids {
            tx.execute(
                "INSERT INTO tool_categories (tool_id, category_id) VALUES (?1, ?2)",
                params![tool_id, category_id],
            )?;
        }

        tx.commit()?;

        Ok(SaveOutcome::Inserted(tool_id))
    }

    fn rebuild_search_index(&mut self) -> StorageResult<()> {
        self.conn
            .execute("INSERT INTO tools_fts(tools_fts) VALUES ('rebuild')", [])?;
        Ok(())
    }

    // ===== Tool Lookups =====

    fn get_tool(&self, tool_id: i64) -> StorageResult<Tool> {
        let tool = self
            .conn
            .query_row(
                &format!("SELECT {TOOL_COLUMNS} FROM tools WHERE id = ?1"),
                params![tool_id],
                tool_from_row,
            )
            .optional()?
            .ok_or_else(|| StorageError::ToolNotFound(format!("Tool ID {}", tool_id)))?;

        self.attach_categories(tool)
    }

    fn get_tool_by_url(&self, url: &str) -> StorageResult<Option<Tool>> {
        let tool = self
            .conn
            .query_row(
                &format!("SELECT {TOOL_COLUMNS} FROM tools WHERE url = ?1"),
                params![url],
                tool_from_row,
            )
            .optional()?;

        match tool {
            Some(tool) => Ok(Some(self.attach_categories(tool)?)),
            None => Ok(None),
        }
    }

    fn search_tools(&self, query: &str, limit: usize) -> StorageResult<Vec<Tool>> {
        let Some(match_expr) = fts_query(query) else {
            return Ok(Vec::new());
        };

        let mut stmt = self.conn.prepare(
            "SELECT rowid FROM tools_fts WHERE tools_fts MATCH ?1 ORDER BY rank LIMIT ?2",
        )?;

        let ids = stmt
            .query_map(params![match_expr, limit as i64], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        ids.into_iter().map(|id| self.get_tool(id)).collect()
    }

    // ===== Category Lookups =====

    fn get_category_by_name(&self, name: &str) -> StorageResult<Option<Category>> {
        let category = self
            .conn
            .query_row(
                &format!(
                    "SELECT {CATEGORY_COLUMNS}
                     FROM categories c
                     LEFT JOIN tool_categories tc ON tc.category_id = c.id
                     WHERE c.name = ?1
                     GROUP BY c.id"
                ),
                params![name],
                category_from_row,
            )
            .optional()?;

        Ok(category)
    }

    fn list_categories(&self) -> StorageResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CATEGORY_COLUMNS}
             FROM categories c
             LEFT JOIN tool_categories tc ON tc.category_id = c.id
             GROUP BY c.id
             ORDER BY COUNT(tc.tool_id) DESC, c.name ASC"
        ))?;

        let categories = stmt
            .query_map([], category_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    // ===== Statistics =====

    fn count_tools(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tools", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_categories(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_associations(&self) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM tool_categories", [], |row| {
                    row.get(0)
                })?;
        Ok(count as u64)
    }
}
