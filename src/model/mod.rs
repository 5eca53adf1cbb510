//! Catalog domain model
//!
//! `Tool` and `Category` are the stored entities (many-to-many), and
//! `ToolRecord` is what the extractor produces from a single page before it
//! is saved.

mod category;
mod tool;

pub use category::Category;
pub use tool::{Tool, ToolRecord, DEFAULT_PRICING};
