//! Search result rendering

use crate::model::Tool;
use crate::storage::Storage;
use crate::FinderError;

/// Runs a full-text search and renders the hits as pretty JSON
///
/// The output is an array of tools in their dictionary form, best match first.
pub fn search_as_json(
    storage: &dyn Storage,
    query: &str,
    limit: usize,
) -> Result<String, FinderError> {
    let tools = storage.search_tools(query, limit)?;
    tracing::debug!("Search {:?} matched {} tools", query, tools.len());
    render_tools(&tools)
}

/// Serializes tools as a pretty-printed JSON array
pub fn render_tools(tools: &[Tool]) -> Result<String, FinderError> {
    Ok(serde_json::to_string_pretty(tools)?)
}
