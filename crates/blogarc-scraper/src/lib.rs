pub mod client;
pub mod error;
pub mod html;
pub mod images;
pub mod page;
pub(crate) mod rate_limit;
pub mod store;

pub use client::{BlogClient, FetchedBytes};
pub use error::ScraperError;
pub use html::{normalize_fragment, normalize_html, strip_attributes, Fragment, NormalizedHtml};
pub use images::{ImageOutcome, ImageRehoster, RehostReport};
pub use page::{ArticlePage, SiteLayout};
pub use store::{MemoryObjectStore, ObjectStore, S3ObjectStore};
