//! Crawler module: fetching, extraction, and crawl orchestration
//!
//! This module contains the breadth-first crawl core:
//! - HTTP fetching for HTML pages and PDFs
//! - Link extraction and classification
//! - Citation page metadata extraction
//! - The crawl engine and the fire-and-forget job trigger

mod engine;
mod fetcher;
mod metadata;
mod parser;
mod pdf;

pub use engine::{start_crawl, CrawlEngine, CrawlHandle};
pub use fetcher::{build_http_client, fetch_page};
pub use metadata::{extract_metadata, PaperMetadata};
pub use parser::{extract_links, extract_links_from_html};
pub use pdf::{extract_pdf_text, text_from_pdf_bytes};
