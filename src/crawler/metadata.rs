//! Citation page metadata extraction
//!
//! Pulls title, authors, abstract, submission date, and subjects out of a
//! parsed citation main page via structural selectors. Every field has a
//! defined fallback when its block is absent; the one deliberate exception
//! is a dateline that is present but malformed, which is an error for the
//! whole page.

use crate::CrawlError;
use chrono::NaiveDate;
use scraper::{Html, Selector};

/// Bibliographic metadata extracted from a citation main page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperMetadata {
    /// Paper title, `"No title found"` when the title block is absent
    pub title: String,
    /// Full authors string, empty when the authors block is absent
    pub authors: String,
    /// First-listed author, `"Unknown"` when the authors block is absent
    pub author: String,
    /// Abstract text, empty when the abstract block is absent
    pub description: String,
    /// Submission date, `None` when the dateline block is absent
    pub submitted_date: Option<NaiveDate>,
    /// Subject strings, empty when the subjects block is absent
    pub subjects: Vec<String>,
}

/// Extracts metadata from a parsed citation page
///
/// # Errors
///
/// [`CrawlError::DateParse`] when a dateline block exists but its text does
/// not parse as `day month(abbrev) year`. All other missing or odd content
/// falls back per field.
pub fn extract_metadata(document: &Html) -> Result<PaperMetadata, CrawlError> {
    let title = select_text(document, "#abs-outer #abs .title")
        .map(|text| text.replace("Title:", "").trim().to_string())
        .unwrap_or_else(|| "No title found".to_string());

    let (authors, author) = match select_text(document, "#abs-outer #abs .authors") {
        Some(text) => {
            let authors = text.replace("Authors:", "").trim().to_string();
            // First-listed author: everything before the first comma
            let author = authors.split(',').next().unwrap_or("").to_string();
            (authors, author)
        }
        None => (String::new(), "Unknown".to_string()),
    };

    let description = select_text(document, "#abs-outer #abs blockquote.abstract")
        .map(|text| text.replace("Abstract:", "").trim().to_string())
        .unwrap_or_default();

    let submitted_date = match select_text(document, "#abs-outer #abs .dateline") {
        Some(text) => {
            let cleaned = text
                .replace("Submitted on", "")
                .replace(['[', ']'], "")
                .trim()
                .to_string();
            let date = NaiveDate::parse_from_str(&cleaned, "%d %b %Y").map_err(|source| {
                CrawlError::DateParse {
                    text: cleaned.clone(),
                    source,
                }
            })?;
            Some(date)
        }
        None => None,
    };

    let subjects = select_text(document, "#abs-outer #abs .subjects")
        .map(|text| {
            text.replace("Subjects:", "")
                .split(';')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(PaperMetadata {
        title,
        authors,
        author,
        description,
        submitted_date,
        subjects,
    })
}

/// Returns the trimmed text of the first element matching the selector
fn select_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
}
