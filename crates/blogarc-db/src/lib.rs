use std::time::Duration;

use blogarc_core::{AppConfig, DatabaseConfig};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

// Path relative to crates/blogarc-db/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Translate [`DatabaseConfig`] into sqlx connect options.
///
/// # Errors
///
/// Returns [`sqlx::Error::Configuration`] if a `DATABASE_URL` cannot be parsed.
pub fn connect_options(database: &DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    match database {
        DatabaseConfig::Url(url) => url.parse::<PgConnectOptions>(),
        DatabaseConfig::Parts {
            host,
            name,
            user,
            password,
        } => Ok(PgConnectOptions::new()
            .host(host)
            .database(name)
            .username(user)
            .password(password)),
    }
}

/// Connect to a Postgres pool using explicit database settings and pool config.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the options are invalid or the connection
/// cannot be established.
pub async fn connect_pool(
    database: &DatabaseConfig,
    config: PoolConfig,
) -> Result<PgPool, sqlx::Error> {
    let options = connect_options(database)?;
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await
}

/// Run all pending migrations against the pool.
///
/// # Errors
///
/// Returns [`DbError::Migration`] if any migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Send a `SELECT 1` to verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}


pub mod articles;
pub mod keywords;
pub mod reference;

pub use articles::{
    insert_article, insert_article_with_links, link_author, list_article_contents,
    update_article_content, ArticleContentRow, NewArticle,
};
pub use keywords::{find_or_create_keyword, link_keyword};
pub use reference::{find_author_id_by_name, find_blogsite_id};
