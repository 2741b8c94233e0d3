//! URL handling module for Arxiv-Trawler
//!
//! Provides link classification against the fixed arXiv path grammars and
//! relative-URL resolution against the configured base domain.

mod classify;
mod normalize;

pub use classify::{classify, LinkCategory};
pub use normalize::ensure_absolute;
