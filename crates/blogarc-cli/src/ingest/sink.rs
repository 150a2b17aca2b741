//! Destinations for finished articles.

use anyhow::Context;
use blogarc_core::{AppConfig, ArticleDraft};

/// Receives finished articles from the single writer of an ingest run.
pub(crate) trait ArticleSink {
    /// Persists one article with its author and keyword links.
    async fn store(&mut self, draft: &ArticleDraft) -> anyhow::Result<()>;
}

/// Writes articles to Postgres, one transaction per article.
pub(crate) struct PgArticleSink<'a> {
    pool: &'a sqlx::PgPool,
    author_id: i64,
    blogsite_id: i64,
    published_from: Option<&'a str>,
}

impl<'a> PgArticleSink<'a> {
    /// Looks up the configured author and blogsite rows once for the run.
    ///
    /// # Errors
    ///
    /// Fails if either reference row is missing or the lookup fails.
    pub(crate) async fn resolve(
        pool: &'a sqlx::PgPool,
        config: &'a AppConfig,
    ) -> anyhow::Result<Self> {
        let author_id = blogarc_db::find_author_id_by_name(pool, &config.author_name)
            .await
            .with_context(|| format!("author '{}' must exist before ingest", config.author_name))?;
        let blogsite_id = blogarc_db::find_blogsite_id(pool, config.blogsite_name.as_deref())
            .await
            .context("a blogsite row must exist before ingest")?;

        tracing::info!(author_id, blogsite_id, "resolved reference rows");
        Ok(Self {
            pool,
            author_id,
            blogsite_id,
            published_from: config.published_from.as_deref(),
        })
    }
}

impl ArticleSink for PgArticleSink<'_> {
    async fn store(&mut self, draft: &ArticleDraft) -> anyhow::Result<()> {
        let article = blogarc_db::NewArticle {
            title: &draft.title,
            content: &draft.content,
            preview: &draft.preview,
            blogsite_id: self.blogsite_id,
            published_at: draft.published_at,
            source_link: &draft.source_link,
            published_from: self.published_from,
        };
        let article_id = blogarc_db::insert_article_with_links(
            self.pool,
            &article,
            self.author_id,
            &draft.keywords,
        )
        .await
        .with_context(|| format!("failed to store article {}", draft.source_link))?;

        tracing::info!(
            article_id,
            title = %draft.title,
            keywords = draft.keywords.len(),
            "article stored"
        );
        Ok(())
    }
}

/// Prints what would be stored and writes nothing.
#[derive(Debug, Default)]
pub(crate) struct DryRunSink {
    pub(crate) seen: usize,
}

impl ArticleSink for DryRunSink {
    async fn store(&mut self, draft: &ArticleDraft) -> anyhow::Result<()> {
        self.seen += 1;
        println!(
            "dry-run: would store \"{}\" ({}, {} keywords, {} bytes)",
            draft.title,
            draft.published_at,
            draft.keywords.len(),
            draft.content.len()
        );
        Ok(())
    }
}
