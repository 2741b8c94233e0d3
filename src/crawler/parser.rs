//! HTML link extractor
//!
//! Walks every `a[href]` element of a parsed page and partitions the raw
//! hrefs into the link categories, preserving document order within each
//! category. Links matching no category are dropped silently.

use crate::storage::ClassifiedLinks;
use crate::url::classify;
use scraper::{Html, Selector};

/// Extracts and classifies every hyperlink in the document
pub fn extract_links(document: &Html) -> ClassifiedLinks {
    let mut links = ClassifiedLinks::default();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(category) = classify(href) {
                    links.push(category, href.to_string());
                }
            }
        }
    }

    links
}

/// Convenience wrapper that parses the HTML first
pub fn extract_links_from_html(html: &str) -> ClassifiedLinks {
    extract_links(&Html::parse_document(html))
}
