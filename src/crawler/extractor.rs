//! Heuristic field extraction from tool pages
//!
//! This module turns a fetched HTML page into a [`ToolRecord`]:
//! - name from the first `<h1>`, falling back to `<title>`
//! - description from the meta description, falling back to the first `<p>`
//! - pricing from the first text mentioning a price keyword
//! - categories from category/tag links
//!
//! Extraction never fails; missing fields keep their defaults.

use crate::model::ToolRecord;
use scraper::{ElementRef, Html, Node, Selector};

/// Maximum characters kept from a paragraph description
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Maximum characters kept from a pricing snippet
pub const PRICING_MAX_CHARS: usize = 100;

/// Maximum number of categories taken from one page
pub const MAX_CATEGORIES: usize = 5;

const PRICING_KEYWORDS: [&str; 4] = ["free", "paid", "pricing", "price"];
const CATEGORY_CLASS_MARKERS: [&str; 2] = ["category", "tag"];

/// Extracts a tool record from a page
///
/// # Arguments
///
/// * `url` - The page URL, stored as the tool's identity
/// * `html` - The page body
///
/// # Example
///
/// ```
/// use ai_tool_finder::crawler::extract;
///
/// let html = r#"<html><head><meta name="description" content="Great tool"></head>
///     <body><h1>Acme AI</h1></body></html>"#;
/// let record = extract("https://example.com/tool/acme", html);
/// assert_eq!(record.name, "Acme AI");
/// assert_eq!(record.description, "Great tool");
/// assert_eq!(record.pricing, "Unknown");
/// ```
pub fn extract(url: &str, html: &str) -> ToolRecord {
    let document = Html::parse_document(html);
    let mut record = ToolRecord::new(url);

    if let Some(name) = extract_name(&document) {
        record.name = name;
    }
    if let Some(description) = extract_description(&document) {
        record.description = description;
    }
    if let Some(pricing) = extract_pricing(&document) {
        record.pricing = pricing;
    }
    record.categories = extract_categories(&document);

    record
}

fn extract_name(document: &Html) -> Option<String> {
    // An empty <h1> still wins over <title>
    first_match(document, "h1")
        .or_else(|| first_match(document, "title"))
        .map(|element| element_text(&element))
}

fn extract_description(document: &Html) -> Option<String> {
    let meta = first_match(document, r#"meta[name="description"]"#)
        .and_then(|element| element.value().attr("content"))
        .filter(|content| !content.is_empty());

    if let Some(content) = meta {
        return Some(content.to_string());
    }

    first_match(document, "p")
        .map(|element| truncate_chars(&element_text(&element), DESCRIPTION_MAX_CHARS))
}

fn extract_pricing(document: &Html) -> Option<String> {
    let text_node = document.tree.root().descendants().find(|node| match node.value() {
        Node::Text(text) => {
            let lower = text.to_lowercase();
            PRICING_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
        }
        _ => false,
    })?;

    let snippet = match text_node.parent().and_then(ElementRef::wrap) {
        Some(parent) => element_text(&parent),
        None => match text_node.value() {
            Node::Text(text) => text.trim().to_string(),
            _ => String::new(),
        },
    };

    Some(truncate_chars(&snippet, PRICING_MAX_CHARS))
}

fn extract_categories(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[class]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|link| {
            let class = link.value().attr("class").unwrap_or("").to_lowercase();
            CATEGORY_CLASS_MARKERS
                .iter()
                .any(|marker| class.contains(marker))
        })
        .take(MAX_CATEGORIES)
        .map(|link| element_text(&link))
        .collect()
}

fn first_match<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

/// Text fragments under an element, each trimmed, joined without a separator
fn element_text(element: &ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Truncates to at most `max` characters, never splitting a character
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((index, _)) => text[..index].to_string(),
        None => text.to_string(),
    }
}
