//! HTTP client for blog pages and embedded images.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

/// Raw bytes of a fetched resource with the content type the server sent.
#[derive(Debug, Clone)]
pub struct FetchedBytes {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// HTTP client for the source blog.
///
/// Maps 429, 404 and other non-2xx responses to typed errors. Transient
/// errors (429, network failures) are retried with exponential backoff up to
/// `max_retries` additional attempts; everything else fails immediately.
#[derive(Debug, Clone)]
pub struct BlogClient {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl BlogClient {
    /// Creates a `BlogClient` with configured timeout, `User-Agent`, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches a page and returns its body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries exhausted.
    /// - [`ScraperError::NotFound`]: HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status (not retried).
    /// - [`ScraperError::Http`]: network, TLS or body decode failure after all retries.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let response = self.get_checked(url).await?;
            Ok(response.text().await?)
        })
        .await
    }

    /// Fetches a binary resource such as an image.
    ///
    /// # Errors
    ///
    /// Same as [`BlogClient::fetch_html`].
    pub async fn fetch_bytes(&self, url: &str) -> Result<FetchedBytes, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let response = self.get_checked(url).await?;
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let bytes = response.bytes().await?.to_vec();
            Ok(FetchedBytes {
                bytes,
                content_type,
            })
        })
        .await
    }

    async fn get_checked(&self, url: &str) -> Result<Response, ScraperError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ScraperError::RateLimited {
                domain: extract_domain(url),
                retry_after_secs,
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response)
    }
}

/// Extracts the hostname from a URL for use in error messages.
///
/// Falls back to the full URL string if parsing fails.
fn extract_domain(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}
