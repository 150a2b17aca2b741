/// Where the Postgres database lives.
///
/// A full `DATABASE_URL` wins; otherwise the discrete host/name/credential
/// variables are used so passwords never need URL-encoding.
#[derive(Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    Url(String),
    Parts {
        host: String,
        name: String,
        user: String,
        password: String,
    },
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseConfig::Url(_) => f.debug_tuple("Url").field(&"[redacted]").finish(),
            DatabaseConfig::Parts {
                host, name, user, ..
            } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("name", name)
                .field("user", user)
                .field("password", &"[redacted]")
                .finish(),
        }
    }
}

/// Object-store settings for rehosted images.
#[derive(Clone)]
pub struct StorageConfig {
    pub bucket_name: String,
    /// Public base URL of the bucket, e.g. `https://bucket.s3.amazonaws.com`.
    pub bucket_url: String,
    pub image_folder: String,
    pub region: String,
    pub access_key: String,
    pub secret_access_key: String,
    /// Custom endpoint for S3-compatible stores.
    pub endpoint_url: Option<String>,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("bucket_name", &self.bucket_name)
            .field("bucket_url", &self.bucket_url)
            .field("image_folder", &self.image_folder)
            .field("region", &self.region)
            .field("access_key", &"[redacted]")
            .field("secret_access_key", &"[redacted]")
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub log_level: String,
    pub root_url: String,
    pub author_name: String,
    pub blogsite_name: Option<String>,
    pub published_from: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_max_concurrent_articles: usize,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database", &self.database)
            .field("storage", &self.storage)
            .field("log_level", &self.log_level)
            .field("root_url", &self.root_url)
            .field("author_name", &self.author_name)
            .field("blogsite_name", &self.blogsite_name)
            .field("published_from", &self.published_from)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field(
                "scraper_max_concurrent_articles",
                &self.scraper_max_concurrent_articles,
            )
            .field("scraper_max_retries", &self.scraper_max_retries)
            .field(
                "scraper_retry_backoff_base_secs",
                &self.scraper_retry_backoff_base_secs,
            )
            .finish()
    }
}
