//! Extraction of archive links, article links and article fields from
//! Blogger-layout pages.

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

use crate::error::ScraperError;
use crate::html::Fragment;

/// Fields of one article page. `content` is the inner markup of the post
/// body, untouched.
#[derive(Debug, Clone)]
pub struct ArticlePage {
    pub url: String,
    pub title: String,
    pub published_at: NaiveDate,
    pub keywords: Vec<String>,
    pub content: Fragment,
}

/// CSS selectors describing where things live on the source site.
#[derive(Debug, Clone)]
pub struct SiteLayout {
    archive_list: Selector,
    archive_links: Selector,
    article_title: Selector,
    article_title_link: Selector,
    published: Selector,
    keyword_links: Selector,
    content: Selector,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self::blogger()
    }
}

impl SiteLayout {
    /// Selectors for the stock Blogger theme.
    ///
    /// # Panics
    ///
    /// Never in practice: the selectors are constants known to parse.
    #[must_use]
    pub fn blogger() -> Self {
        let selector = |css: &str| Selector::parse(css).expect("valid built-in selector");
        Self {
            archive_list: selector("#BlogArchive1_ArchiveList"),
            archive_links: selector("a[href]"),
            article_title: selector("h3.post-title.entry-title"),
            article_title_link: selector("a[href]"),
            published: selector("time.published[datetime]"),
            keyword_links: selector("div.post-sidebar-item.post-sidebar-labels a[rel=\"tag\"]"),
            content: selector("div.post-body.entry-content.float-container"),
        }
    }

    /// Returns the archive-period links of the site root, absolute and
    /// de-duplicated, in page order.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::MissingElement`] if the page has no archive
    /// list, or [`ScraperError::InvalidUrl`] if `page_url` is not a URL.
    pub fn archive_links(&self, html: &str, page_url: &str) -> Result<Vec<String>, ScraperError> {
        let document = Html::parse_document(html);
        let list = document
            .select(&self.archive_list)
            .next()
            .ok_or_else(|| ScraperError::MissingElement {
                url: page_url.to_owned(),
                what: "archive list",
            })?;

        let hrefs = list
            .select(&self.archive_links)
            .filter_map(|a| a.value().attr("href"));
        resolve_links(page_url, hrefs)
    }

    /// Returns the article links of an archive page, absolute and
    /// de-duplicated, in page order. Titles without a link are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `page_url` is not a URL.
    pub fn article_links(&self, html: &str, page_url: &str) -> Result<Vec<String>, ScraperError> {
        let document = Html::parse_document(html);
        let hrefs = document.select(&self.article_title).filter_map(|title| {
            title
                .select(&self.article_title_link)
                .next()
                .and_then(|a| a.value().attr("href"))
        });
        resolve_links(page_url, hrefs)
    }

    /// Extracts title, publish date, keywords and content from an article page.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::MissingElement`]: no title, date or content container.
    /// - [`ScraperError::InvalidDate`]: the `datetime` attribute does not start
    ///   with a `YYYY-MM-DD` date.
    pub fn parse_article(&self, html: &str, page_url: &str) -> Result<ArticlePage, ScraperError> {
        let document = Html::parse_document(html);
        let missing = |what: &'static str| ScraperError::MissingElement {
            url: page_url.to_owned(),
            what,
        };

        let title = document
            .select(&self.article_title)
            .next()
            .and_then(first_stripped_string)
            .ok_or_else(|| missing("title"))?;

        let datetime = document
            .select(&self.published)
            .next()
            .and_then(|time| time.value().attr("datetime"))
            .ok_or_else(|| missing("publish date"))?;
        let published_at = parse_publish_date(datetime).ok_or_else(|| ScraperError::InvalidDate {
            url: page_url.to_owned(),
            value: datetime.to_owned(),
        })?;

        let mut keywords: Vec<String> = Vec::new();
        for label in document.select(&self.keyword_links) {
            let phrase = label.text().collect::<String>().trim().to_owned();
            if !phrase.is_empty() && !keywords.contains(&phrase) {
                keywords.push(phrase);
            }
        }

        let content = document
            .select(&self.content)
            .next()
            .map(Fragment::from_children_of)
            .ok_or_else(|| missing("content"))?;

        Ok(ArticlePage {
            url: page_url.to_owned(),
            title,
            published_at,
            keywords,
            content,
        })
    }
}

/// First descendant text node that is not blank after trimming.
fn first_stripped_string(element: ElementRef<'_>) -> Option<String> {
    element
        .text()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Parses the date part of an ISO-8601 `datetime` value.
fn parse_publish_date(datetime: &str) -> Option<NaiveDate> {
    let date = datetime.trim().get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Resolves `hrefs` against `base`, keeps http(s) targets only and drops
/// repeats.
fn resolve_links<'a>(
    base: &str,
    hrefs: impl Iterator<Item = &'a str>,
) -> Result<Vec<String>, ScraperError> {
    let base_url = reqwest::Url::parse(base).map_err(|e| ScraperError::InvalidUrl {
        url: base.to_owned(),
        reason: e.to_string(),
    })?;

    let mut links: Vec<String> = Vec::new();
    for href in hrefs {
        let Ok(mut resolved) = base_url.join(href.trim()) else {
            tracing::debug!(href, "skipping unparseable link");
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        resolved.set_fragment(None);
        let resolved = resolved.to_string();
        if !links.contains(&resolved) {
            links.push(resolved);
        }
    }
    Ok(links)
}

#[cfg(test)]
#[path = "page_test.rs"]
mod tests;
