use chrono::{DateTime, Utc};
use serde::Serialize;

/// A tool category, unique by exact name
///
/// Serializes to `{id, name, description, tool_count}`; the creation
/// timestamp stays out of the dictionary form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(skip)]
    pub created_at: Option<DateTime<Utc>>,
    /// Number of tools attached to this category
    pub tool_count: u64,
}
