//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the tool catalog,
//! including the FTS5 search index and the triggers that keep it in sync.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Tools listed on the directory, unique by page URL
CREATE TABLE IF NOT EXISTS tools (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    url TEXT NOT NULL UNIQUE,
    pricing TEXT,
    rating REAL,
    created_at TEXT,
    updated_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_tools_name ON tools(name);

-- Categories, created on first sight
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    created_at TEXT
);

-- Tool <-> category join
CREATE TABLE IF NOT EXISTS tool_categories (
    tool_id INTEGER NOT NULL REFERENCES tools(id),
    category_id INTEGER NOT NULL REFERENCES categories(id),
    PRIMARY KEY (tool_id, category_id)
);

CREATE INDEX IF NOT EXISTS idx_tool_categories_category ON tool_categories(category_id);

-- Full-text index over tools(name, description)
CREATE VIRTUAL TABLE IF NOT EXISTS tools_fts USING fts5(
    name,
    description,
    content='tools',
    content_rowid='id'
);

CREATE TRIGGER IF NOT EXISTS tools_fts_insert AFTER INSERT ON tools
BEGIN
    INSERT INTO tools_fts(rowid, name, description)
    VALUES (new.id, new.name, new.description);
END;

CREATE TRIGGER IF NOT EXISTS tools_fts_delete AFTER DELETE ON tools
BEGIN
    INSERT INTO tools_fts(tools_fts, rowid, name, description)
    VALUES ('delete', old.id, old.name, old.description);
END;

CREATE TRIGGER IF NOT EXISTS tools_fts_update AFTER UPDATE ON tools
BEGIN
    INSERT INTO tools_fts(tools_fts, rowid, name, description)
    VALUES ('delete', old.id, old.name, old.description);
    INSERT INTO tools_fts(rowid, name, description)
    VALUES (new.id, new.name, new.description);
END;
"#;

/// Initializes the database schema
///
/// Every statement is `IF NOT EXISTS`, so this is safe on an existing
/// database and never discards the search index.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
