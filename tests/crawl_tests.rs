//! Integration tests for the crawl engine
//!
//! These tests run full crawl jobs against a wiremock HTTP server and
//! assert on the persisted job and archive state.

use arxiv_trawler::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use arxiv_trawler::storage::{JobStore, MemoryStore, SqliteStore};
use arxiv_trawler::url::LinkCategory;
use arxiv_trawler::{start_crawl, CrawlEngine, JobStatus};
use chrono::NaiveDate;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(base_domain: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            base_domain: base_domain.to_string(),
            visit_cap: 50,
            fetch_timeout_secs: 5,
            description_max_len: 500,
            dedup_visited: false,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestTrawler".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact: "test@example.com".to_string(),
        },
        output: OutputConfig {
            database_path: ":memory:".to_string(),
        },
    }
}

fn citation_page_body(title: &str, pdf_path: &str, extra_links: &str) -> String {
    format!(
        r#"<html><body>
        <div id="abs-outer"><div id="abs">
            <h1 class="title">Title: {title}</h1>
            <div class="authors">Authors: Ada Lovelace, Charles Babbage</div>
            <blockquote class="abstract">Abstract: A very thorough abstract.</blockquote>
            <div class="dateline">[Submitted on 15 Apr 2025]</div>
            <div class="subjects">Subjects: cs.AI; cs.LG</div>
        </div></div>
        <a href="{pdf_path}">Download PDF</a>
        {extra_links}
        </body></html>"#
    )
}

async fn run_job(
    store: Arc<dyn JobStore>,
    config: Config,
    seed: &str,
) -> (String, JobStatus, Option<String>) {
    let engine = Arc::new(CrawlEngine::new(config, store.clone()).expect("engine"));
    let handle = start_crawl(engine, seed).expect("trigger");
    handle.task.await.expect("task join");

    let job = store.get_job(&handle.job_id).expect("job");
    (handle.job_id, job.status, job.error)
}

#[tokio::test]
async fn test_crawl_citation_seed_produces_archive() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/abs/2504.10784"))
        .respond_with(ResponseTemplate::new(200).set_body_string(citation_page_body(
            "A Study of Queues",
            "/pdf/2504.10784",
            "",
        )))
        .mount(&server)
        .await;

    // PDF fetch fails; the archive still gets created with empty text
    Mock::given(method("GET"))
        .and(path("/pdf/2504.10784"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let seed = format!("{}/abs/2504.10784", base);
    let (job_id, status, error) = run_job(store.clone(), test_config(&base), &seed).await;

    assert_eq!(status, JobStatus::Completed);
    assert!(error.is_none());

    let archives = store.list_archives_by_job(&job_id).unwrap();
    assert_eq!(archives.len(), 1);

    let archive = &archives[0];
    assert_eq!(archive.title, "A Study of Queues");
    assert_eq!(archive.author, "Ada Lovelace");
    assert_eq!(archive.authors, "Ada Lovelace, Charles Babbage");
    assert_eq!(archive.description, "A very thorough abstract.");
    assert_eq!(archive.submitted_date, NaiveDate::from_ymd_opt(2025, 4, 15));
    assert_eq!(archive.subjects, ["cs.AI", "cs.LG"]);
    assert_eq!(archive.pdf_url, format!("{}/pdf/2504.10784", base));
    assert_eq!(archive.pdf_text, "");
    assert_eq!(archive.job_id, job_id);
    assert_eq!(
        archive.extracted_links.get(LinkCategory::CitationPdf),
        ["/pdf/2504.10784"]
    );
}

#[tokio::test]
async fn test_crawl_follows_citation_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/abs/1111.1111"))
        .respond_with(ResponseTemplate::new(200).set_body_string(citation_page_body(
            "First Paper",
            "/pdf/1111.1111",
            r#"<a href="/abs/2222.2222">Second paper</a>"#,
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/abs/2222.2222"))
        .respond_with(ResponseTemplate::new(200).set_body_string(citation_page_body(
            "Second Paper",
            "/pdf/2222.2222",
            "",
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let seed = format!("{}/abs/1111.1111", base);
    let (job_id, status, _) = run_job(store.clone(), test_config(&base), &seed).await;

    assert_eq!(status, JobStatus::Completed);

    let archives = store.list_archives_by_job(&job_id).unwrap();
    assert_eq!(archives.len(), 2);
    assert_eq!(archives[0].title, "First Paper");
    assert_eq!(archives[1].title, "Second Paper");
}

#[tokio::test]
async fn test_seed_without_tracked_links_completes_after_one_fetch() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Not a citation page, no classifiable links anywhere
    Mock::given(method("GET"))
        .and(path("/list/cs.AI/recent"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><a href="/about">About</a><p>nothing else</p></body></html>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let seed = format!("{}/list/cs.AI/recent", base);
    let (job_id, status, error) = run_job(store.clone(), test_config(&base), &seed).await;

    assert_eq!(status, JobStatus::Completed);
    assert!(error.is_none());
    assert!(store.list_archives_by_job(&job_id).unwrap().is_empty());
    // Mock expectation (exactly one request) is verified on drop
}

#[tokio::test]
async fn test_failed_seed_fetch_fails_job() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/abs/1234.5678"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let seed = format!("{}/abs/1234.5678", base);
    let (job_id, status, error) = run_job(store.clone(), test_config(&base), &seed).await;

    assert_eq!(status, JobStatus::Failed);
    assert!(error.is_some_and(|e| !e.is_empty()));
    assert!(store.list_archives_by_job(&job_id).unwrap().is_empty());
}

#[tokio::test]
async fn test_visit_cap_bounds_self_linking_page() {
    let server = MockServer::start().await;
    let base = server.uri();

    // The page links back to itself, so the queue never drains; only the
    // cap ends the crawl. Cap 3 means at most 4 fetches.
    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><a href="/search/?query=loop">again</a></body></html>"#,
        ))
        .expect(4)
        .mount(&server)
        .await;

    let mut config = test_config(&base);
    config.crawler.visit_cap = 3;

    let store = Arc::new(MemoryStore::new());
    let seed = format!("{}/search/?query=loop", base);
    let (job_id, status, error) = run_job(store.clone(), config, &seed).await;

    // Hitting the cap is not an error
    assert_eq!(status, JobStatus::Completed);
    assert!(error.is_none());
    assert!(store.list_archives_by_job(&job_id).unwrap().is_empty());
}

#[tokio::test]
async fn test_dedup_mode_visits_each_url_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><a href="/search/?query=loop">again</a></body></html>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&base);
    config.crawler.dedup_visited = true;

    let store = Arc::new(MemoryStore::new());
    let seed = format!("{}/search/?query=loop", base);
    let (_, status, _) = run_job(store.clone(), config, &seed).await;

    assert_eq!(status, JobStatus::Completed);
}

#[tokio::test]
async fn test_citation_page_without_pdf_link_fails_job() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/abs/1234.5678"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
            <div id="abs-outer"><div id="abs">
                <h1 class="title">Title: No PDF Here</h1>
            </div></div>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let seed = format!("{}/abs/1234.5678", base);
    let (job_id, status, error) = run_job(store.clone(), test_config(&base), &seed).await;

    assert_eq!(status, JobStatus::Failed);
    assert!(error.is_some_and(|e| e.contains("no PDF link")));
    assert!(store.list_archives_by_job(&job_id).unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_dateline_fails_job() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/abs/1234.5678"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
            <div id="abs-outer"><div id="abs">
                <h1 class="title">Title: Bad Date</h1>
                <div class="dateline">[Submitted on someday soon]</div>
            </div></div>
            <a href="/pdf/1234.5678">PDF</a>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let seed = format!("{}/abs/1234.5678", base);
    let (_, status, error) = run_job(store.clone(), test_config(&base), &seed).await;

    assert_eq!(status, JobStatus::Failed);
    assert!(error.is_some_and(|e| e.contains("dateline")));
}

#[tokio::test]
async fn test_archives_persisted_before_failure_remain() {
    let server = MockServer::start().await;
    let base = server.uri();

    // First citation page archives fine and links onward to a page whose
    // fetch fails, aborting the rest of the run.
    Mock::given(method("GET"))
        .and(path("/abs/1111.1111"))
        .respond_with(ResponseTemplate::new(200).set_body_string(citation_page_body(
            "Survivor",
            "/pdf/1111.1111",
            r#"<a href="/abs/2222.2222">broken link</a>"#,
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/abs/2222.2222"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pdf/1111.1111"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let seed = format!("{}/abs/1111.1111", base);
    let (job_id, status, error) = run_job(store.clone(), test_config(&base), &seed).await;

    assert_eq!(status, JobStatus::Failed);
    assert!(error.is_some());

    let archives = store.list_archives_by_job(&job_id).unwrap();
    assert_eq!(archives.len(), 1);
    assert_eq!(archives[0].title, "Survivor");
}

#[tokio::test]
async fn test_end_to_end_with_sqlite_store() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/abs/2504.10784"))
        .respond_with(ResponseTemplate::new(200).set_body_string(citation_page_body(
            "Durable Paper",
            "/pdf/2504.10784",
            "",
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pdf/2504.10784"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not really a pdf"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("trawl.db");
    let store = Arc::new(SqliteStore::new(&db_path).unwrap());

    let seed = format!("{}/abs/2504.10784", base);
    let (job_id, status, _) = run_job(store.clone(), test_config(&base), &seed).await;

    assert_eq!(status, JobStatus::Completed);

    // Re-open the database to confirm the state is durable
    let reopened = SqliteStore::new(&db_path).unwrap();
    let job = reopened.get_job(&job_id).unwrap();
    assert_eq!(job.status, JobStatus::Completed);

    let archives = reopened.list_archives_by_job(&job_id).unwrap();
    assert_eq!(archives.len(), 1);
    assert_eq!(archives[0].title, "Durable Paper");
    // Unparsable PDF bytes degrade to empty text
    assert_eq!(archives[0].pdf_text, "");
}

#[tokio::test]
async fn test_trigger_returns_before_completion() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>slow page</body></html>")
                .set_delay(std::time::Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let engine = Arc::new(CrawlEngine::new(test_config(&base), store.clone()).unwrap());

    let handle = start_crawl(engine, format!("{}/list", base)).unwrap();

    // The job row exists immediately, before the crawl has finished
    let job = store.get_job(&handle.job_id).unwrap();
    assert!(matches!(job.status, JobStatus::Pending | JobStatus::Running));

    handle.task.await.unwrap();
    assert_eq!(
        store.get_job(&handle.job_id).unwrap().status,
        JobStatus::Completed
    );
}
