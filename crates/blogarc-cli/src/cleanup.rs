//! Re-normalization of stored article markup.
//!
//! Every article is reprocessed on each run; normalization is idempotent,
//! so already-clean content comes back unchanged.

use blogarc_db::ArticleContentRow;
use blogarc_scraper::{normalize_html, NormalizedHtml};

/// Runs the normalizer over every stored article and writes content and
/// preview back. Returns the number of articles updated.
///
/// # Errors
///
/// Any database error aborts the job. Articles updated before the failure
/// keep their new content.
pub(crate) async fn run_cleanup(pool: &sqlx::PgPool) -> anyhow::Result<usize> {
    let rows = blogarc_db::list_article_contents(pool).await?;
    tracing::info!(articles = rows.len(), "re-normalizing stored articles");

    for row in &rows {
        let cleaned = clean_row(row);
        blogarc_db::update_article_content(pool, row.id, &cleaned.content, &cleaned.preview)
            .await?;
        tracing::debug!(article_id = row.id, "article re-normalized");
    }

    Ok(rows.len())
}

fn clean_row(row: &ArticleContentRow) -> NormalizedHtml {
    normalize_html(&row.content)
}
