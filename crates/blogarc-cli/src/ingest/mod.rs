//! The `ingest` command: crawl the source blog and store its articles.
//!
//! Archive discovery failures abort the run. Archive pages and articles that
//! fail to fetch or parse are logged and skipped; images that fail to rehost
//! end up in the broken image report. Database failures abort the run.

mod crawler;
mod pipeline;
mod sink;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use blogarc_core::AppConfig;
use blogarc_scraper::{BlogClient, ImageRehoster, MemoryObjectStore, S3ObjectStore, SiteLayout};

use crate::report;
use crawler::{CrawlOutcome, Crawler, IngestSummary};
use sink::{DryRunSink, PgArticleSink};

/// Runs one full ingest and writes the broken image report.
///
/// With `dry_run` images are fetched but kept in memory and articles are
/// printed instead of stored. The report is written either way.
///
/// # Errors
///
/// Fails if the report already exists, the HTTP client cannot be built, the
/// crawl fails (see [`Crawler::run`]) or the report cannot be written.
pub(crate) async fn run_ingest(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    report_path: &Path,
    dry_run: bool,
) -> anyhow::Result<()> {
    report::ensure_absent(report_path)?;

    let client = BlogClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        config.scraper_max_retries,
        config.scraper_retry_backoff_base_secs,
    )?;
    let layout = SiteLayout::blogger();
    let shutdown = Arc::new(AtomicBool::new(false));
    watch_for_interrupt(Arc::clone(&shutdown));

    let outcome = if dry_run {
        let store = MemoryObjectStore::new(&config.storage.bucket_url);
        let rehoster = ImageRehoster::new(client.clone(), store, &config.storage.image_folder);
        let crawler = Crawler {
            client: &client,
            layout: &layout,
            rehoster: &rehoster,
            max_concurrent_articles: config.scraper_max_concurrent_articles,
            shutdown: &shutdown,
        };
        let mut sink = DryRunSink::default();
        let outcome = crawler.run(&config.root_url, &mut sink).await?;
        println!(
            "dry-run: {} articles and {} images would be stored",
            sink.seen,
            rehoster.store().keys().len()
        );
        outcome
    } else {
        let store = S3ObjectStore::new(&config.storage);
        let rehoster = ImageRehoster::new(client.clone(), store, &config.storage.image_folder);
        let crawler = Crawler {
            client: &client,
            layout: &layout,
            rehoster: &rehoster,
            max_concurrent_articles: config.scraper_max_concurrent_articles,
            shutdown: &shutdown,
        };
        let mut sink = PgArticleSink::resolve(pool, config).await?;
        crawler.run(&config.root_url, &mut sink).await?
    };

    let CrawlOutcome {
        summary,
        broken_links,
    } = outcome;
    report::write_report(report_path, &broken_links)?;
    log_summary(&summary);
    println!(
        "stored {} articles ({} skipped), {} broken images",
        summary.articles_stored,
        summary.articles_skipped,
        summary.broken_images
    );

    Ok(())
}

fn watch_for_interrupt(shutdown: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, finishing the current article");
            shutdown.store(true, Ordering::SeqCst);
        }
    });
}

fn log_summary(summary: &IngestSummary) {
    tracing::info!(
        archives_visited = summary.archives_visited,
        archives_skipped = summary.archives_skipped,
        articles_stored = summary.articles_stored,
        articles_skipped = summary.articles_skipped,
        broken_images = summary.broken_images,
        interrupted = summary.interrupted,
        "ingest finished"
    );
    if summary.archives_skipped > 0 || summary.articles_skipped > 0 {
        tracing::warn!(
            archives_skipped = summary.archives_skipped,
            articles_skipped = summary.articles_skipped,
            "some pages were skipped; see warnings above"
        );
    }
}
