use crate::model::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pricing summary used when a page gives no pricing hint
pub const DEFAULT_PRICING: &str = "Unknown";

/// A tool as extracted from one directory page, not yet persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRecord {
    pub url: String,
    pub name: String,
    pub description: String,
    pub pricing: String,
    pub categories: Vec<String>,
    /// Never derived by the current extraction rules
    pub rating: Option<f64>,
}

impl ToolRecord {
    /// Creates an empty record for `url` with every field at its default
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: String::new(),
            description: String::new(),
            pricing: DEFAULT_PRICING.to_string(),
            categories: Vec::new(),
            rating: None,
        }
    }

    /// A record without a name carries nothing worth storing
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }
}

/// A stored tool with its categories
///
/// Serializes to the catalog's dictionary form:
/// `{id, name, description, url, pricing, rating, categories, created_at, updated_at}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tool {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub pricing: Option<String>,
    pub rating: Option<f64>,
    pub categories: Vec<Category>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Tool {
    /// Category names in the order they were loaded
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }
}
