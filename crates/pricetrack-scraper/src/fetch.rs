//! Page-fetch capability: the narrow interface the pipeline uses to obtain
//! rendered HTML, plus blocked-page detection.
//!
//! Two transports exist in production: this crate's plain HTTP client and a
//! stealth-capable rendered-browser session owned by an external process.
//! Both sit behind [`PageFetcher`]; the pipeline is agnostic to which one is
//! in use.

use std::future::Future;
use std::time::Duration;

use reqwest::header;

use crate::error::ScrapeError;

/// Markers that identify an anti-automation challenge page instead of
/// product content.
const BLOCK_MARKERS: &[&str] = &["Verify Your Identity", "Bot Protection"];

/// Returns `true` when the fetched document is a bot-protection challenge
/// rather than the requested page. Checked before any parsing.
#[must_use]
pub fn is_blocked(html: &str) -> bool {
    BLOCK_MARKERS.iter().any(|marker| html.contains(marker))
}

/// Supplies HTML for a URL.
pub trait PageFetcher {
    /// Fetches the document at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] on transport failure and
    /// [`ScrapeError::UnexpectedStatus`] on a non-2xx response. A blocked
    /// challenge page is NOT an error at this layer; it comes back as
    /// ordinary HTML and is classified by [`is_blocked`].
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, ScrapeError>> + Send;
}

/// Plain HTTP transport with a browser-like header set.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates an `HttpFetcher` with configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScrapeError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static("en-CA,en-US;q=0.9,en;q=0.8"),
        );
        headers.insert(
            header::REFERER,
            header::HeaderValue::from_static("https://www.google.com/"),
        );
        headers.insert(
            header::CONNECTION,
            header::HeaderValue::from_static("keep-alive"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn detects_identity_verification_page() {
        let html = "<html><body><h1>Verify Your Identity</h1></body></html>";
        assert!(is_blocked(html));
    }

    #[test]
    fn detects_bot_protection_banner() {
        assert!(is_blocked("<div class=\"challenge\">Bot Protection</div>"));
    }

    #[test]
    fn product_page_is_not_blocked() {
        assert!(!is_blocked("<html><h1>Chicken Breast</h1>$4.99</html>"));
    }

    #[tokio::test]
    async fn fetches_body_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/p/eggs"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>eggs</html>"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(5, "pricetrack-test").unwrap();
        let html = fetcher
            .fetch(&format!("{}/p/eggs", server.uri()))
            .await
            .unwrap();
        assert_eq!(html, "<html>eggs</html>");
    }

    #[tokio::test]
    async fn non_success_status_is_a_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/p/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(5, "pricetrack-test").unwrap();
        let err = fetcher
            .fetch(&format!("{}/p/gone", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::UnexpectedStatus { status: 404, ref url } if url.contains("/p/gone")
        ));
    }
}
