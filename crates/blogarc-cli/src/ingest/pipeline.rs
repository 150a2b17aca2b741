//! Per-article processing: fetch, parse, rehost, strip, normalize.

use blogarc_core::{ArticleDraft, BrokenImageLink};
use blogarc_scraper::html::{normalize_fragment, strip_attributes};
use blogarc_scraper::{
    ArticlePage, BlogClient, ImageRehoster, ObjectStore, ScraperError, SiteLayout,
};

/// Result of processing one article link.
#[derive(Debug)]
pub(crate) enum ArticleOutcome {
    /// Ready to persist. `broken_links` lists the images that kept their
    /// original URL.
    Ready {
        draft: ArticleDraft,
        broken_links: Vec<BrokenImageLink>,
    },
    /// The page could not be fetched or parsed; nothing of it is stored.
    Skipped { url: String, error: ScraperError },
}

pub(crate) async fn process_article<S: ObjectStore>(
    client: &BlogClient,
    layout: &SiteLayout,
    rehoster: &ImageRehoster<S>,
    url: String,
) -> ArticleOutcome {
    match build_draft(client, layout, rehoster, &url).await {
        Ok((draft, broken_links)) => ArticleOutcome::Ready {
            draft,
            broken_links,
        },
        Err(error) => ArticleOutcome::Skipped { url, error },
    }
}

async fn build_draft<S: ObjectStore>(
    client: &BlogClient,
    layout: &SiteLayout,
    rehoster: &ImageRehoster<S>,
    url: &str,
) -> Result<(ArticleDraft, Vec<BrokenImageLink>), ScraperError> {
    let html = client.fetch_html(url).await?;
    let ArticlePage {
        url: source_link,
        title,
        published_at,
        keywords,
        mut content,
    } = layout.parse_article(&html, url)?;

    // Rehosted src/href must be in place before stripping and pruning.
    let report = rehoster.rehost(&mut content, &title, &source_link).await;
    strip_attributes(&mut content);
    let preview = normalize_fragment(&mut content);

    let draft = ArticleDraft {
        title,
        content: content.to_html(),
        preview,
        published_at,
        source_link,
        keywords,
    };
    Ok((draft, report.into_broken_links()))
}
