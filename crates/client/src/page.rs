//! Page text extraction.
//!
//! Fetches the raw response body of a generic URL and keeps a bounded
//! character sample of it. Markup is not parsed or stripped.

use async_trait::async_trait;
use synthese_core::{AppConfig, Error};

use crate::fetch::{FetchClient, FetchConfig};

/// Default number of characters kept from a page body.
pub const DEFAULT_PAGE_TEXT_LIMIT: usize = 500;

/// Source of raw page text.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch `url` and return at most the configured number of characters of its body.
    async fn extract_page_text(&self, url: &str) -> Result<String, Error>;
}

/// HTTP implementation of [`PageSource`].
#[derive(Debug, Clone)]
pub struct PageTextExtractor {
    client: FetchClient,
    limit: usize,
}

impl PageTextExtractor {
    pub fn new(client: FetchClient, limit: usize) -> Self {
        Self { client, limit }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Ok(Self::new(FetchClient::new(FetchConfig::from(config))?, config.page_text_limit))
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[async_trait]
impl PageSource for PageTextExtractor {
    async fn extract_page_text(&self, url: &str) -> Result<String, Error> {
        let response = self.client.fetch(url).await?;
        let text = truncate_chars(response.text_lossy(), self.limit);
        tracing::debug!(
            url = %response.final_url,
            bytes = response.bytes.len(),
            chars = text.chars().count(),
            "extracted page text"
        );
        Ok(text)
    }
}

/// Keep at most `limit` characters of `text`.
pub fn truncate_chars(mut text: String, limit: usize) -> String {
    if let Some((idx, _)) = text.char_indices().nth(limit) {
        text.truncate(idx);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthese_core::ErrorKind;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn extractor(limit: usize) -> PageTextExtractor {
        PageTextExtractor::new(FetchClient::new(FetchConfig::default()).unwrap(), limit)
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello".into(), 10), "hello");
        assert_eq!(truncate_chars("hello".into(), 5), "hello");
        assert_eq!(truncate_chars("hello".into(), 3), "hel");
        assert_eq!(truncate_chars("hello".into(), 0), "");
    }

    #[test]
    fn test_truncate_never_splits_characters() {
        let text = "été à la plage, naïve idée".to_string();
        let truncated = truncate_chars(text, 4);
        assert_eq!(truncated, "été ");
        assert_eq!(truncated.chars().count(), 4);
    }

    #[tokio::test]
    async fn test_extract_truncates_body() {
        let server = MockServer::start().await;
        let body = format!("<html><body>{}</body></html>", "Lorem ipsum. ".repeat(100));
        Mock::given(method("GET"))
            .and(path("/article"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.as_bytes()))
            .mount(&server)
            .await;

        let url = format!("{}/article", server.uri());
        let text = extractor(DEFAULT_PAGE_TEXT_LIMIT).extract_page_text(&url).await.unwrap();
        assert_eq!(text.chars().count(), DEFAULT_PAGE_TEXT_LIMIT);
        assert!(body.starts_with(&text));
    }

    #[tokio::test]
    async fn test_extract_short_body_kept_whole() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/short"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes("Short page.".as_bytes()))
            .mount(&server)
            .await;

        let text = extractor(500).extract_page_text(&format!("{}/short", server.uri())).await.unwrap();
        assert_eq!(text, "Short page.");
    }

    #[tokio::test]
    async fn test_extract_invalid_utf8_is_lossy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latin1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'c', b'a', b'f', 0xE9]))
            .mount(&server)
            .await;

        let text = extractor(500).extract_page_text(&format!("{}/latin1", server.uri())).await.unwrap();
        assert_eq!(text, "caf\u{FFFD}");
    }

    #[tokio::test]
    async fn test_extract_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).and(path("/gone")).respond_with(ResponseTemplate::new(410)).mount(&server).await;

        let err = extractor(500).extract_page_text(&format!("{}/gone", server.uri())).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fetch);
    }
}
