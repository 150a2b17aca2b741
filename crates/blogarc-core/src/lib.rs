mod app_config;
mod config;

pub use app_config::{AppConfig, DatabaseConfig, StorageConfig};
pub use config::{load_app_config, load_app_config_from_env};

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length, in characters, of an article preview.
pub const PREVIEW_MAX_CHARS: usize = 300;

/// An article scraped from the source site, ready to be persisted.
///
/// `content` is already rehosted, attribute-stripped and normalized, and
/// `preview` was derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    pub preview: String,
    pub published_at: NaiveDate,
    pub source_link: String,
    pub keywords: Vec<String>,
}

/// An image that could not be rehosted, kept for manual follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenImageLink {
    pub image_url: String,
    pub article_title: String,
}

impl BrokenImageLink {
    /// Renders the report line `<image-url>,<article-title>`.
    ///
    /// A field containing a comma, a double quote or a line break is wrapped
    /// in double quotes with inner quotes doubled; other fields are written
    /// as is.
    #[must_use]
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{}",
            csv_field(&self.image_url),
            csv_field(&self.article_title)
        )
    }
}

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
