use crate::url::LinkCategory;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a crawl job
///
/// `Completed` and `Failed` are absorbing: once a job reaches either, the
/// store refuses further status writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// Converts the status to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Parses a status from its database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(JobStatus::Pending),
            "running" => Some(JobStatus::Running),
            "completed" => Some(JobStatus::Completed),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }

    /// Returns true for the absorbing terminal states
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// One crawl invocation's durable record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlJob {
    /// Opaque job id
    pub id: String,
    /// The seed URL this job was started with
    pub url: String,
    pub status: JobStatus,
    /// Human-readable failure detail, set only on `Failed`
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CrawlJob {
    /// Creates a fresh pending job
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            status: JobStatus::Pending,
            error: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// Per-page partition of hyperlinks into the five link categories
///
/// Document order is preserved within each category. Unclassified links are
/// not represented at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedLinks {
    pub citation_main: Vec<String>,
    pub citation_pdf: Vec<String>,
    pub citation_format: Vec<String>,
    pub search: Vec<String>,
    pub prevnext: Vec<String>,
}

impl ClassifiedLinks {
    /// Appends a raw href to the given category's list
    pub fn push(&mut self, category: LinkCategory, href: String) {
        self.list_mut(category).push(href);
    }

    /// Returns the ordered raw hrefs for a category
    pub fn get(&self, category: LinkCategory) -> &[String] {
        match category {
            LinkCategory::CitationMain => &self.citation_main,
            LinkCategory::CitationPdf => &self.citation_pdf,
            LinkCategory::CitationFormat => &self.citation_format,
            LinkCategory::Search => &self.search,
            LinkCategory::PrevNext => &self.prevnext,
        }
    }

    /// Total number of classified links across all categories
    pub fn len(&self) -> usize {
        LinkCategory::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn list_mut(&mut self, category: LinkCategory) -> &mut Vec<String> {
        match category {
            LinkCategory::CitationMain => &mut self.citation_main,
            LinkCategory::CitationPdf => &mut self.citation_pdf,
            LinkCategory::CitationFormat => &mut self.citation_format,
            LinkCategory::Search => &mut self.search,
            LinkCategory::PrevNext => &mut self.prevnext,
        }
    }
}

/// One successfully processed citation page
///
/// Created once per citation main page and never mutated afterwards. Owned
/// by the job referenced through `job_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Archive {
    /// Opaque archive id
    pub id: String,
    /// Id of the job that produced this archive
    pub job_id: String,
    /// The citation main page URL
    pub url: String,
    pub title: String,
    /// Abstract text, truncated to the configured bound
    pub description: String,
    /// All classified links found on the citation page, in document order
    pub extracted_links: ClassifiedLinks,
    /// Full text extracted from the PDF, empty when extraction failed
    pub pdf_text: String,
    /// Absolute URL of the paper's PDF
    pub pdf_url: String,
    /// First-listed author, `"Unknown"` when the authors block is absent
    pub author: String,
    /// Full authors string as shown on the page
    pub authors: String,
    pub submitted_date: Option<NaiveDate>,
    pub subjects: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
