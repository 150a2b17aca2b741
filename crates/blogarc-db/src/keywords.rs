//! Database operations for the `keyword` table.

use sqlx::PgConnection;

use crate::DbError;

/// Returns the id of the keyword with exactly this phrase, inserting it first
/// if it does not exist yet.
///
/// The insert tolerates a concurrent writer having created the same phrase:
/// the unique constraint turns the second insert into a no-op and the
/// follow-up select returns the surviving row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either statement fails.
pub async fn find_or_create_keyword(conn: &mut PgConnection, phrase: &str) -> Result<i64, DbError> {
    sqlx::query(
        "INSERT INTO keyword (phrase) VALUES ($1) \
         ON CONFLICT (phrase) DO NOTHING",
    )
    .bind(phrase)
    .execute(&mut *conn)
    .await?;

    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM keyword WHERE phrase = $1")
        .bind(phrase)
        .fetch_one(&mut *conn)
        .await?;

    Ok(id)
}

/// Links a keyword to an article. Linking the same pair twice is a no-op.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn link_keyword(
    conn: &mut PgConnection,
    article_id: i64,
    keyword_id: i64,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO keyword_relation (article_id, keyword_id) \
         VALUES ($1, $2) \
         ON CONFLICT (article_id, keyword_id) DO NOTHING",
    )
    .bind(article_id)
    .bind(keyword_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
