//! Statistics generation from the catalog database
//!
//! This module provides functionality for extracting and displaying
//! catalog statistics from the storage layer.

use crate::model::Category;
use crate::storage::Storage;
use crate::FinderError;

/// Number of categories listed in the statistics report
pub const TOP_CATEGORY_COUNT: usize = 10;

/// Catalog statistics summary
#[derive(Debug, Clone)]
pub struct CatalogStatistics {
    /// Total number of stored tools
    pub total_tools: u64,

    /// Total number of categories
    pub total_categories: u64,

    /// Total number of tool-category attachments
    pub total_associations: u64,

    /// Most used categories, most tools first
    pub top_categories: Vec<Category>,
}

impl CatalogStatistics {
    /// Average categories per tool
    pub fn categories_per_tool(&self) -> f64 {
        if self.total_tools == 0 {
            0.0
        } else {
            self.total_associations as f64 / self.total_tools as f64
        }
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(CatalogStatistics)` - Successfully loaded statistics
/// * `Err(FinderError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<CatalogStatistics, FinderError> {
    let total_tools = storage.count_tools()?;
    let total_categories = storage.count_categories()?;
    let total_associations = storage.count_associations()?;

    let mut top_categories = storage.list_categories()?;
    top_categories.truncate(TOP_CATEGORY_COUNT);

    Ok(CatalogStatistics {
        total_tools,
        total_categories,
        total_associations,
        top_categories,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CatalogStatistics) {
    println!("=== Catalog Statistics ===\n");

    println!("Overview:");
    println!("  Tools: {}", stats.total_tools);
    println!("  Categories: {}", stats.total_categories);
    println!(
        "  Category links: {} ({:.2} per tool)",
        stats.total_associations,
        stats.categories_per_tool()
    );
    println!();

    if !stats.top_categories.is_empty() {
        println!("Top Categories:");
        for category in &stats.top_categories {
            println!("  {}: {}", category.name, category.tool_count);
        }
        println!();
    }
}
