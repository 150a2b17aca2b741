//! Root → archive page → article traversal with a single writer.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use blogarc_core::BrokenImageLink;
use blogarc_scraper::{BlogClient, ImageRehoster, ObjectStore, ScraperError, SiteLayout};
use futures::stream::{self, StreamExt};

use super::pipeline::{process_article, ArticleOutcome};
use super::sink::ArticleSink;

/// Counters for one ingest run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct IngestSummary {
    pub archives_visited: usize,
    pub archives_skipped: usize,
    pub articles_stored: usize,
    pub articles_skipped: usize,
    pub broken_images: usize,
    pub interrupted: bool,
}

#[derive(Debug, Default)]
pub(crate) struct CrawlOutcome {
    pub summary: IngestSummary,
    pub broken_links: Vec<BrokenImageLink>,
}

/// Everything a crawl reads; the sink is passed separately because it is the
/// only thing written to.
pub(crate) struct Crawler<'a, S> {
    pub client: &'a BlogClient,
    pub layout: &'a SiteLayout,
    pub rehoster: &'a ImageRehoster<S>,
    pub max_concurrent_articles: usize,
    pub shutdown: &'a AtomicBool,
}

impl<S: ObjectStore> Crawler<'_, S> {
    /// Crawls the site from `root_url` and hands every finished article to
    /// `sink`.
    ///
    /// Articles of one archive page are processed concurrently, up to
    /// `max_concurrent_articles`; archive pages are visited in order. Failed
    /// archive pages and articles are logged and skipped.
    ///
    /// # Errors
    ///
    /// Fails if the root page cannot be fetched or has no archive list, or if
    /// the sink fails. A sink failure stops the run immediately.
    pub(crate) async fn run<K: ArticleSink>(
        &self,
        root_url: &str,
        sink: &mut K,
    ) -> anyhow::Result<CrawlOutcome> {
        let root_html = self
            .client
            .fetch_html(root_url)
            .await
            .with_context(|| format!("failed to fetch site root {root_url}"))?;
        let archives = self
            .layout
            .archive_links(&root_html, root_url)
            .context("failed to discover archive pages")?;
        tracing::info!(archives = archives.len(), "archive pages discovered");

        let mut outcome = CrawlOutcome::default();
        for archive_url in &archives {
            if self.stopping() {
                outcome.summary.interrupted = true;
                break;
            }

            let links = match self.article_links(archive_url).await {
                Ok(links) => links,
                Err(error) => {
                    tracing::warn!(archive = %archive_url, error = %error, "skipping archive page");
                    outcome.summary.archives_skipped += 1;
                    continue;
                }
            };
            outcome.summary.archives_visited += 1;
            tracing::info!(
                archive = %archive_url,
                articles = links.len(),
                "processing archive page"
            );

            let mut results = stream::iter(links)
                .map(|url| process_article(self.client, self.layout, self.rehoster, url))
                .buffer_unordered(self.max_concurrent_articles.max(1));

            while let Some(result) = results.next().await {
                match result {
                    ArticleOutcome::Ready {
                        draft,
                        broken_links,
                    } => {
                        sink.store(&draft).await?;
                        outcome.summary.articles_stored += 1;
                        outcome.summary.broken_images += broken_links.len();
                        outcome.broken_links.extend(broken_links);
                    }
                    ArticleOutcome::Skipped { url, error } => {
                        tracing::warn!(url = %url, error = %error, "skipping article");
                        outcome.summary.articles_skipped += 1;
                    }
                }

                if self.stopping() {
                    outcome.summary.interrupted = true;
                    break;
                }
            }

            if outcome.summary.interrupted {
                break;
            }
        }

        Ok(outcome)
    }

    async fn article_links(&self, archive_url: &str) -> Result<Vec<String>, ScraperError> {
        let html = self.client.fetch_html(archive_url).await?;
        self.layout.article_links(&html, archive_url)
    }

    fn stopping(&self) -> bool {
        let stopping = self.shutdown.load(Ordering::SeqCst);
        if stopping {
            tracing::warn!("shutdown requested, stopping crawl");
        }
        stopping
    }
}

#[cfg(test)]
#[path = "crawler_test.rs"]
mod tests;
