//! HTTP fetcher implementation
//!
//! Builds the shared HTTP client and performs single-GET page fetches.
//! There are no retries anywhere: a failed fetch aborts the crawl step that
//! issued it, and the engine's top-level handler decides what that means.

use crate::config::UserAgentConfig;
use crate::CrawlError;
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client used for all fetches in one crawl engine
///
/// The user agent is formatted as `Name/Version (+Contact)`. The request
/// timeout applies to every HTML and PDF fetch and is the only guard
/// against indefinite suspension: there is no overall job timeout.
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout_secs: u64,
) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{})",
        config.crawler_name, config.crawler_version, config.contact
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns the response body
///
/// # Errors
///
/// * [`CrawlError::HttpStatus`] - non-2xx response
/// * [`CrawlError::Timeout`] - request timed out
/// * [`CrawlError::Http`] - connection or transfer failure
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, CrawlError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CrawlError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| classify_error(url, e))
}

fn classify_error(url: &str, error: reqwest::Error) -> CrawlError {
    if error.is_timeout() {
        CrawlError::Timeout {
            url: url.to_string(),
        }
    } else {
        CrawlError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
