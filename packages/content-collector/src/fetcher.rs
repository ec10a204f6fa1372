use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::config::{CollectorConfig, USER_AGENT};
use crate::error::CollectError;

/// A fetched page before normalization
#[derive(Debug, Clone)]
pub struct RawPage {
    pub html: String,
}

/// Trait for page fetchers (to allow mocking)
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RawPage, CollectError>;
}

/// HTTP fetcher with a bounded timeout and a fixed identifying user agent.
///
/// One outbound request per call, no retries; retry policy belongs to the
/// caller.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<RawPage, CollectError> {
        tracing::debug!(url = %url, "Fetching page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| CollectError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let html = decode_body(url, response).await?;

        Ok(RawPage { html })
    }
}

/// Decode a response body as page text.
///
/// Bodies are decoded per the charset declared in `Content-Type` (UTF-8
/// when absent), so legacy-encoded pages still collect; only responses whose
/// `Content-Type` is not text at all (images, binaries) are rejected.
async fn decode_body(url: &str, response: reqwest::Response) -> Result<String, CollectError> {
    if !is_text_body(&response) {
        return Err(CollectError::Parse {
            url: url.to_string(),
        });
    }

    response.text().await.map_err(|source| CollectError::Fetch {
        url: url.to_string(),
        source,
    })
}

fn is_text_body(response: &reqwest::Response) -> bool {
    let Some(content_type) = response.headers().get(reqwest::header::CONTENT_TYPE) else {
        // No declared type; assume text like the pages themselves do.
        return true;
    };
    let Ok(value) = content_type.to_str() else {
        return false;
    };

    let mime = value
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime.is_empty()
        || mime.starts_with("text/")
        || mime == "application/xhtml+xml"
        || mime == "application/xml"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canned_response(content_type: Option<&str>, body: &[u8]) -> reqwest::Response {
        let mut builder = http::Response::builder().status(200);
        if let Some(value) = content_type {
            builder = builder.header(http::header::CONTENT_TYPE, value);
        }
        builder.body(body.to_vec()).unwrap().into()
    }

    #[tokio::test]
    async fn test_decode_body_accepts_utf8_html() {
        let response = canned_response(Some("text/html; charset=utf-8"), b"<html>ok</html>");
        let body = decode_body("https://a.test/x", response).await.unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_decode_body_honors_declared_legacy_charset() {
        // "Café" in ISO-8859-1; the 0xE9 byte is not valid UTF-8 on its own.
        let response = canned_response(
            Some("text/html; charset=ISO-8859-1"),
            b"<html>Caf\xe9</html>",
        );
        let body = decode_body("https://a.test/pricing", response).await.unwrap();
        assert_eq!(body, "<html>Café</html>");
    }

    #[tokio::test]
    async fn test_decode_body_without_content_type_is_text() {
        let response = canned_response(None, b"<html>bare</html>");
        let body = decode_body("https://a.test/x", response).await.unwrap();
        assert_eq!(body, "<html>bare</html>");
    }

    #[tokio::test]
    async fn test_decode_body_rejects_non_text_content_type() {
        let response = canned_response(Some("image/png"), &[0x89, 0x50, 0x4e, 0x47]);
        let err = decode_body("https://a.test/logo.png", response)
            .await
            .unwrap_err();
        assert!(matches!(err, CollectError::Parse { .. }));
    }

    #[test]
    fn test_fetcher_builds_from_config() {
        assert!(HttpFetcher::new(&CollectorConfig::default()).is_ok());
    }
}
