//! Crawl engine: breadth-first traversal and job lifecycle
//!
//! One engine drives one or more crawl jobs. Each job is an independent
//! unit of work: a FIFO queue seeded with one URL, a visit counter bounded
//! by the configured cap, and a single top-level failure handler that turns
//! any error inside the loop into a `failed` job record. Archives persisted
//! before a failure remain visible.

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::metadata::{extract_metadata, PaperMetadata};
use crate::crawler::parser::extract_links;
use crate::crawler::pdf::extract_pdf_text;
use crate::storage::{Archive, ClassifiedLinks, CrawlJob, JobStatus, JobStore};
use crate::url::{classify, ensure_absolute, LinkCategory};
use crate::CrawlError;
use chrono::Utc;
use reqwest::Client;
use scraper::Html;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Link categories whose members are enqueued for traversal
const FOLLOWED_CATEGORIES: [LinkCategory; 3] = [
    LinkCategory::CitationMain,
    LinkCategory::Search,
    LinkCategory::PrevNext,
];

/// The crawl engine
///
/// Holds the injected store handle and the shared HTTP client. Cheap to
/// share behind an `Arc`; jobs running concurrently on the same engine
/// share nothing mutable but the store.
pub struct CrawlEngine {
    config: Arc<Config>,
    store: Arc<dyn JobStore>,
    client: Client,
}

/// Handle returned by [`start_crawl`]
///
/// The caller may await `task` for completion or drop the handle and poll
/// job status through the store instead; the crawl proceeds either way.
pub struct CrawlHandle {
    pub job_id: String,
    pub task: JoinHandle<()>,
}

impl CrawlEngine {
    /// Creates an engine over the given store
    pub fn new(config: Config, store: Arc<dyn JobStore>) -> Result<Self, CrawlError> {
        let client = build_http_client(&config.user_agent, config.crawler.fetch_timeout_secs)?;
        Ok(Self {
            config: Arc::new(config),
            store,
            client,
        })
    }

    /// Runs one crawl job to its terminal status
    ///
    /// The job transitions `running -> completed` when the queue drains or
    /// the visit cap is reached, and `running -> failed` with the error
    /// detail on any uncaught failure inside the loop. The terminal write
    /// happens exactly once.
    pub async fn run(&self, job_id: &str, seed_url: &str) {
        if let Err(e) = self
            .store
            .update_job_status(job_id, JobStatus::Running, None)
        {
            tracing::error!("Failed to mark job {} running: {}", job_id, e);
            return;
        }

        match self.crawl(job_id, seed_url).await {
            Ok(pages) => {
                tracing::info!("Job {} completed after {} page fetches", job_id, pages);
                if let Err(e) = self
                    .store
                    .update_job_status(job_id, JobStatus::Completed, None)
                {
                    tracing::error!("Failed to mark job {} completed: {}", job_id, e);
                }
            }
            Err(e) => {
                tracing::error!("Job {} failed: {}", job_id, e);
                if let Err(store_err) =
                    self.store
                        .update_job_status(job_id, JobStatus::Failed, Some(&e.to_string()))
                {
                    tracing::error!("Failed to mark job {} failed: {}", job_id, store_err);
                }
            }
        }
    }

    /// The breadth-first crawl loop
    ///
    /// Returns the number of pages fetched. Any error propagating out of an
    /// iteration ends the run; the caller records it on the job.
    async fn crawl(&self, job_id: &str, seed_url: &str) -> Result<u32, CrawlError> {
        let base = &self.config.crawler.base_domain;
        let cap = self.config.crawler.visit_cap;

        let mut queue = VecDeque::new();
        queue.push_back(ensure_absolute(seed_url, base));

        let mut fetched: u32 = 0;
        let mut seen: HashSet<String> = HashSet::new();

        while let Some(url) = queue.pop_front() {
            if self.config.crawler.dedup_visited && !seen.insert(url.clone()) {
                continue;
            }

            // The counter is checked before it moves, so a run performs at
            // most cap + 1 fetches.
            if fetched > cap {
                tracing::info!("Job {} hit the visit cap of {}", job_id, cap);
                break;
            }
            fetched += 1;

            tracing::info!("Processing URL: {}", url);
            let body = fetch_page(&self.client, &url).await?;

            let is_citation_main = classify(&url) == Some(LinkCategory::CitationMain);

            // Html is not Send: parse and extract inside a block so the
            // document is dropped before the next await point.
            let (links, metadata) = {
                let document = Html::parse_document(&body);
                let links = extract_links(&document);
                let metadata = if is_citation_main {
                    Some(extract_metadata(&document)?)
                } else {
                    None
                };
                (links, metadata)
            };

            if let Some(metadata) = metadata {
                let pdf_link = links
                    .get(LinkCategory::CitationPdf)
                    .first()
                    .ok_or_else(|| CrawlError::MissingPdfLink { url: url.clone() })?;
                let pdf_url = ensure_absolute(pdf_link, base);
                let pdf_text = extract_pdf_text(&self.client, &pdf_url).await;

                let archive =
                    self.build_archive(job_id, &url, metadata, links.clone(), pdf_url, pdf_text);
                tracing::info!("Archiving {} ({})", archive.title, url);
                self.store.create_archive(&archive)?;
            }

            for category in FOLLOWED_CATEGORIES {
                for link in links.get(category) {
                    queue.push_back(ensure_absolute(link, base));
                }
            }
        }

        Ok(fetched)
    }

    fn build_archive(
        &self,
        job_id: &str,
        url: &str,
        metadata: PaperMetadata,
        extracted_links: ClassifiedLinks,
        pdf_url: String,
        pdf_text: String,
    ) -> Archive {
        let now = Utc::now();
        Archive {
            id: Uuid::new_v4().to_string(),
            job_id: job_id.to_string(),
            url: url.to_string(),
            title: metadata.title,
            description: truncate_chars(
                &metadata.description,
                self.config.crawler.description_max_len,
            ),
            extracted_links,
            pdf_text,
            pdf_url,
            author: metadata.author,
            authors: metadata.authors,
            submitted_date: metadata.submitted_date,
            subjects: metadata.subjects,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Creates a job record and launches its crawl as a background task
///
/// Fire-and-forget from the caller's perspective: the job id is available
/// immediately for status polling through the store, and the returned
/// handle can additionally be awaited.
pub fn start_crawl(
    engine: Arc<CrawlEngine>,
    seed_url: impl Into<String>,
) -> Result<CrawlHandle, CrawlError> {
    let seed_url = seed_url.into();
    let job_id = Uuid::new_v4().to_string();

    engine
        .store
        .create_job(&CrawlJob::new(job_id.clone(), seed_url.clone()))?;
    tracing::info!("Created crawl job {} for {}", job_id, seed_url);

    let task_job_id = job_id.clone();
    let task = tokio::spawn(async move {
        engine.run(&task_job_id, &seed_url).await;
    });

    Ok(CrawlHandle { job_id, task })
}

/// Truncates a string to at most `max` characters, on a char boundary
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
