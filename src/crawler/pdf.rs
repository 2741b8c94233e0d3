//! PDF text extraction
//!
//! Fetches a PDF by URL and extracts the text of every page, in page order,
//! with no separator. Every failure mode here is absorbed as empty text and
//! logged: a missing or unparsable PDF degrades the archive, it does not
//! abort the crawl.

use lopdf::Document;
use reqwest::Client;

/// Fetches a PDF and extracts its full text
///
/// Returns an empty string on non-success HTTP status, network failure, or
/// unparsable PDF bytes.
pub async fn extract_pdf_text(client: &Client, url: &str) -> String {
    tracing::debug!("Fetching citation PDF: {}", url);

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Failed to fetch PDF {}: {}", url, e);
            return String::new();
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("Failed to fetch PDF {}: HTTP {}", url, status.as_u16());
        return String::new();
    }

    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Failed to read PDF body from {}: {}", url, e);
            return String::new();
        }
    };

    text_from_pdf_bytes(&bytes)
}

/// Extracts and concatenates the text of every page of a PDF
///
/// Pages that yield no text contribute nothing; there is no separator
/// between pages. Returns an empty string for bytes that do not parse as a
/// PDF.
pub fn text_from_pdf_bytes(bytes: &[u8]) -> String {
    let document = match Document::load_mem(bytes) {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!("Error reading PDF: {}", e);
            return String::new();
        }
    };

    let mut text = String::new();
    // get_pages returns a BTreeMap, so iteration is page order
    for page_number in document.get_pages().keys() {
        match document.extract_text(&[*page_number]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => {
                tracing::debug!("No text extracted from page {}: {}", page_number, e);
            }
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UserAgentConfig;
    use crate::crawler::fetcher::build_http_client;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client() -> Client {
        build_http_client(
            &UserAgentConfig {
                crawler_name: "TestTrawler".to_string(),
                crawler_version: "1.0".to_string(),
                contact: "admin@example.com".to_string(),
            },
            30,
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_bytes_yield_empty_text() {
        assert_eq!(text_from_pdf_bytes(b"this is not a pdf"), "");
        assert_eq!(text_from_pdf_bytes(b""), "");
    }

    #[tokio::test]
    async fn test_http_404_yields_empty_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pdf/1234.5678"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let text = extract_pdf_text(&test_client(), &format!("{}/pdf/1234.5678", server.uri())).await;
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_non_pdf_body_yields_empty_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pdf/1234.5678"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not a pdf</html>"))
            .mount(&server)
            .await;

        let text = extract_pdf_text(&test_client(), &format!("{}/pdf/1234.5678", server.uri())).await;
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_connection_failure_yields_empty_text() {
        let text = extract_pdf_text(&test_client(), "http://127.0.0.1:1/pdf/1234.5678").await;
        assert_eq!(text, "");
    }
}
