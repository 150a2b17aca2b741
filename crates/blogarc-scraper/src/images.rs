//! Rehosting of article images to durable storage.
//!
//! Every `<img>` of an article is fetched from its original location,
//! uploaded to the object store and pointed at its canonical public URL.
//! A failing image is recorded as a [`BrokenImageLink`] and left untouched;
//! it never stops the remaining images or the article.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::{Mutex, PoisonError};

use blogarc_core::BrokenImageLink;
use sha2::{Digest, Sha256};

use crate::client::BlogClient;
use crate::error::ScraperError;
use crate::html::{Fragment, Node};
use crate::store::ObjectStore;

/// What happened to one image, in document order.
#[derive(Debug)]
pub enum ImageOutcome {
    Rehosted {
        source_url: String,
        public_url: String,
    },
    Broken {
        link: BrokenImageLink,
        error: ScraperError,
    },
}

/// Per-article result of [`ImageRehoster::rehost`].
#[derive(Debug, Default)]
pub struct RehostReport {
    pub outcomes: Vec<ImageOutcome>,
}

impl RehostReport {
    #[must_use]
    pub fn rehosted_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ImageOutcome::Rehosted { .. }))
            .count()
    }

    #[must_use]
    pub fn into_broken_links(self) -> Vec<BrokenImageLink> {
        self.outcomes
            .into_iter()
            .filter_map(|o| match o {
                ImageOutcome::Broken { link, .. } => Some(link),
                ImageOutcome::Rehosted { .. } => None,
            })
            .collect()
    }
}

/// Moves article images into an [`ObjectStore`] under `{folder}/{filename}`.
///
/// Keys are claimed per run: when a second, different source URL maps to a
/// key already taken, it is stored as `{folder}/{hash}-{filename}` instead,
/// where `hash` is the first 12 hex digits of the SHA-256 of its URL. The
/// same URL always maps to the same key.
#[derive(Debug)]
pub struct ImageRehoster<S> {
    client: BlogClient,
    store: S,
    folder: String,
    claimed_keys: Mutex<HashMap<String, String>>,
}

impl<S: ObjectStore> ImageRehoster<S> {
    #[must_use]
    pub fn new(client: BlogClient, store: S, folder: &str) -> Self {
        Self {
            client,
            store,
            folder: folder.trim_matches('/').to_owned(),
            claimed_keys: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Rehosts every image of `content` in document order and rewrites the
    /// references of the ones that succeeded.
    ///
    /// A rehosted image gets its `src` and `href` set to the canonical URL,
    /// and its immediate parent element gets the same `href`, whatever its
    /// tag.
    /// Relative image URLs are resolved against `page_url`.
    pub async fn rehost(
        &self,
        content: &mut Fragment,
        article_title: &str,
        page_url: &str,
    ) -> RehostReport {
        let mut sources: Vec<Option<String>> = Vec::new();
        content.for_each_element(&mut |element| {
            if element.name == "img" {
                sources.push(element.attr("src").map(str::to_owned));
            }
        });

        let mut report = RehostReport::default();
        let mut canonical: Vec<Option<String>> = Vec::with_capacity(sources.len());
        for source in sources {
            match self.rehost_one(source.as_deref(), page_url).await {
                Ok(public_url) => {
                    canonical.push(Some(public_url.clone()));
                    report.outcomes.push(ImageOutcome::Rehosted {
                        source_url: source.unwrap_or_default(),
                        public_url,
                    });
                }
                Err(error) => {
                    let image_url = source.unwrap_or_default();
                    tracing::warn!(
                        image_url = %image_url,
                        article = article_title,
                        error = %error,
                        "image could not be rehosted"
                    );
                    canonical.push(None);
                    report.outcomes.push(ImageOutcome::Broken {
                        link: BrokenImageLink {
                            image_url,
                            article_title: article_title.to_owned(),
                        },
                        error,
                    });
                }
            }
        }

        let mut next = 0;
        rewrite_images(&mut content.children, &canonical, &mut next);
        report
    }

    async fn rehost_one(
        &self,
        source: Option<&str>,
        page_url: &str,
    ) -> Result<String, ScraperError> {
        let source = source.ok_or(ScraperError::MissingImageSource)?;
        let url = resolve_image_url(page_url, source)?;
        let filename = image_filename(&url)?;

        let image = self.client.fetch_bytes(url.as_str()).await?;
        let key = self.claim_key(url.as_str(), &filename);
        self.store
            .put(&key, image.bytes, image.content_type.as_deref())
            .await?;

        tracing::debug!(key, source, "image rehosted");
        Ok(self.store.public_url(&key))
    }

    fn claim_key(&self, source_url: &str, filename: &str) -> String {
        let plain = self.key_for(filename);
        let mut claimed = self
            .claimed_keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match claimed.get(&plain) {
            None => {
                claimed.insert(plain.clone(), source_url.to_owned());
                plain
            }
            Some(owner) if owner == source_url => plain,
            Some(_) => {
                let digest = Sha256::digest(source_url.as_bytes());
                let mut hash = String::with_capacity(12);
                for byte in &digest[..6] {
                    let _ = write!(hash, "{byte:02x}");
                }
                let key = self.key_for(&format!("{hash}-{filename}"));
                tracing::info!(
                    taken = %plain,
                    key = %key,
                    source_url,
                    "image filename collision, using hashed key"
                );
                claimed
                    .entry(key.clone())
                    .or_insert_with(|| source_url.to_owned());
                key
            }
        }
    }

    fn key_for(&self, filename: &str) -> String {
        if self.folder.is_empty() {
            filename.to_owned()
        } else {
            format!("{}/{}", self.folder, filename)
        }
    }
}

/// Applies `canonical[i]` to the i-th image in document order. Returns the
/// URL of the last rewritten image among the direct children of `nodes`, so
/// the caller can point the enclosing element at it.
fn rewrite_images(
    nodes: &mut [Node],
    canonical: &[Option<String>],
    next: &mut usize,
) -> Option<String> {
    let mut rewritten = None;
    for node in nodes {
        let Node::Element(element) = node else {
            continue;
        };

        if element.name == "img" {
            if let Some(Some(url)) = canonical.get(*next) {
                element.set_attr("src", url);
                element.set_attr("href", url);
                rewritten = Some(url.clone());
            }
            *next += 1;
            continue;
        }

        if let Some(url) = rewrite_images(&mut element.children, canonical, next) {
            element.set_attr("href", &url);
        }
    }
    rewritten
}

fn resolve_image_url(page_url: &str, source: &str) -> Result<reqwest::Url, ScraperError> {
    let invalid = |reason: String| ScraperError::InvalidUrl {
        url: source.to_owned(),
        reason,
    };
    let base = reqwest::Url::parse(page_url).map_err(|e| invalid(e.to_string()))?;
    base.join(source.trim()).map_err(|e| invalid(e.to_string()))
}

/// Final path segment of the image URL; query and fragment are ignored.
fn image_filename(url: &reqwest::Url) -> Result<String, ScraperError> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| ScraperError::NoFilename {
            url: url.to_string(),
        })
}
