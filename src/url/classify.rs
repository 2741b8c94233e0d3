use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Semantic categories for links discovered on arXiv pages
///
/// Each category is defined by a whole-string pattern: an optional
/// `scheme://host` prefix followed by a fixed path shape. The enum order is
/// the classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkCategory {
    /// A paper's abstract page, e.g. `/abs/2504.10784`
    CitationMain,
    /// A paper's PDF, e.g. `/pdf/2504.10784`
    CitationPdf,
    /// A paper's alternate-format page, e.g. `/format/2504.10784`
    CitationFormat,
    /// A search results page, e.g. `/search/?searchtype=author&query=...`
    Search,
    /// A next/prev navigation link, e.g.
    /// `/prevnext?id=2504.11419&function=next&context=cs.AI`
    PrevNext,
}

static CITATION_MAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:https?://[^/]+)?/abs/\d+\.\d+$").expect("valid pattern"));

static CITATION_PDF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:https?://[^/]+)?/pdf/\d+\.\d+$").expect("valid pattern"));

static CITATION_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:https?://[^/]+)?/format/\d+\.\d+$").expect("valid pattern"));

static SEARCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:https?://[^/]+)?/search/\?[^"' >]+$"#).expect("valid pattern")
});

static PREVNEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:https?://[^/]+)?/prevnext\?id=\d+\.\d+&function=(?:next|prev)&context=[^"' >]+$"#)
        .expect("valid pattern")
});

impl LinkCategory {
    /// All categories in classification priority order
    pub const ALL: [LinkCategory; 5] = [
        LinkCategory::CitationMain,
        LinkCategory::CitationPdf,
        LinkCategory::CitationFormat,
        LinkCategory::Search,
        LinkCategory::PrevNext,
    ];

    /// Returns the category's wire-format name
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkCategory::CitationMain => "citation_main",
            LinkCategory::CitationPdf => "citation_pdf",
            LinkCategory::CitationFormat => "citation_format",
            LinkCategory::Search => "search",
            LinkCategory::PrevNext => "prevnext",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            LinkCategory::CitationMain => &CITATION_MAIN,
            LinkCategory::CitationPdf => &CITATION_PDF,
            LinkCategory::CitationFormat => &CITATION_FORMAT,
            LinkCategory::Search => &SEARCH,
            LinkCategory::PrevNext => &PREVNEXT,
        }
    }
}

/// Classifies a raw link string against the fixed category grammars
///
/// Categories are tested in the priority order of [`LinkCategory::ALL`] and
/// the first whole-string match wins, so a link gets at most one category
/// even if the grammars were ever to overlap. Links matching no grammar
/// return `None` and are dropped by callers.
///
/// # Examples
///
/// ```
/// use arxiv_trawler::url::{classify, LinkCategory};
///
/// assert_eq!(classify("/abs/2504.10784"), Some(LinkCategory::CitationMain));
/// assert_eq!(
///     classify("https://arxiv.org/pdf/2504.10784"),
///     Some(LinkCategory::CitationPdf)
/// );
/// assert_eq!(classify("/about"), None);
/// ```
pub fn classify(link: &str) -> Option<LinkCategory> {
    LinkCategory::ALL
        .iter()
        .copied()
        .find(|category| category.pattern().is_match(link))
}
