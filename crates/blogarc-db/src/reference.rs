//! Lookups for the read-only `author` and `blogsite` reference rows.

use sqlx::PgPool;

use crate::DbError;

/// Returns the id of the author with exactly this name.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no such author exists, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn find_author_id_by_name(pool: &PgPool, name: &str) -> Result<i64, DbError> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM author WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("author '{name}'")))
}

/// Returns the id of the named blogsite, or of the first blogsite (lowest id)
/// when `name` is `None`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no matching blogsite exists, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn find_blogsite_id(pool: &PgPool, name: Option<&str>) -> Result<i64, DbError> {
    sqlx::query_scalar::<_, i64>(
        "SELECT id FROM blogsite \
         WHERE ($1::TEXT IS NULL OR name = $1) \
         ORDER BY id \
         LIMIT 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| match name {
        Some(name) => DbError::NotFound(format!("blogsite '{name}'")),
        None => DbError::NotFound("any blogsite".to_string()),
    })
}
