use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("missing {what} on {url}")]
    MissingElement { url: String, what: &'static str },

    #[error("invalid publish date \"{value}\" on {url}")]
    InvalidDate { url: String, value: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("image element has no src attribute")]
    MissingImageSource,

    #[error("no filename in image URL {url}")]
    NoFilename { url: String },

    #[error("upload of {key} failed: {reason}")]
    Upload { key: String, reason: String },
}

impl ScraperError {
    /// Returns `true` for transient conditions worth another attempt.
    ///
    /// Only rate limiting and network-level failures qualify; a missing page,
    /// an unexpected status or a page without the expected markup would fail
    /// the same way again.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, ScraperError::RateLimited { .. } | ScraperError::Http(_))
    }
}
