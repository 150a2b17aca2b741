//! Database operations for the `article`, `author_relation` and
//! `keyword_relation` tables.

use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};

use crate::keywords::{find_or_create_keyword, link_keyword};
use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// Column values for a new `article` row.
#[derive(Debug, Clone, Copy)]
pub struct NewArticle<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub preview: &'a str,
    pub blogsite_id: i64,
    pub published_at: NaiveDate,
    pub source_link: &'a str,
    /// Fixed location tag recorded for every ingested article.
    pub published_from: Option<&'a str>,
}

/// The stored markup of one article, as read by the cleanup job.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArticleContentRow {
    pub id: i64,
    pub content: String,
}

// ---------------------------------------------------------------------------
// Statements usable inside a caller-owned transaction
// ---------------------------------------------------------------------------

/// Inserts an `article` row and returns its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including the unique
/// constraint on `source_link`).
pub async fn insert_article(
    conn: &mut PgConnection,
    article: &NewArticle<'_>,
) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO article \
             (title, content, preview, blogsite_id, published_at, source_link, published_from) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING id",
    )
    .bind(article.title)
    .bind(article.content)
    .bind(article.preview)
    .bind(article.blogsite_id)
    .bind(article.published_at)
    .bind(article.source_link)
    .bind(article.published_from)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

/// Links an author to an article.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn link_author(
    conn: &mut PgConnection,
    author_id: i64,
    article_id: i64,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO author_relation (author_id, article_id) \
         VALUES ($1, $2) \
         ON CONFLICT (author_id, article_id) DO NOTHING",
    )
    .bind(author_id)
    .bind(article_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Pool-level operations
// ---------------------------------------------------------------------------

/// Persists one article with its author and keyword links as a single
/// transaction: article row, then author relation, then keyword relations.
///
/// Nothing is committed unless every statement succeeds; on error the
/// transaction is dropped and Postgres rolls it back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement or the commit fails.
pub async fn insert_article_with_links(
    pool: &PgPool,
    article: &NewArticle<'_>,
    author_id: i64,
    keywords: &[String],
) -> Result<i64, DbError> {
    let mut tx = pool.begin().await?;

    let article_id = insert_article(&mut tx, article).await?;
    link_author(&mut tx, author_id, article_id).await?;
    for phrase in keywords {
        let keyword_id = find_or_create_keyword(&mut tx, phrase).await?;
        link_keyword(&mut tx, article_id, keyword_id).await?;
    }

    tx.commit().await?;

    tracing::debug!(
        article_id,
        keywords = keywords.len(),
        source_link = article.source_link,
        "article persisted"
    );
    Ok(article_id)
}

/// Returns the id and stored content of every article, ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_article_contents(pool: &PgPool) -> Result<Vec<ArticleContentRow>, DbError> {
    let rows = sqlx::query_as::<_, ArticleContentRow>(
        "SELECT id, content FROM article ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Overwrites an article's content and preview.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no article has this id, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_article_content(
    pool: &PgPool,
    article_id: i64,
    content: &str,
    preview: &str,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE article \
         SET content = $1, preview = $2, updated_at = NOW() \
         WHERE id = $3",
    )
    .bind(content)
    .bind(preview)
    .bind(article_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound(format!("article {article_id}")));
    }

    Ok(())
}
