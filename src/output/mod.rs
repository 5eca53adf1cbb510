//! Output module for reporting on the stored catalog
//!
//! This module handles:
//! - Catalog statistics for the `--stats` mode
//! - JSON rendering of search results for the `--search` mode

mod search;
pub mod stats;

pub use search::{render_tools, search_as_json};
pub use stats::{load_statistics, print_statistics, CatalogStatistics};
