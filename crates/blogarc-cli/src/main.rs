mod cleanup;
mod ingest;
mod report;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "blogarc-cli")]
#[command(about = "Blog archive ingestion into Postgres")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl the blog archive, rehost images and store every article
    Ingest {
        /// Where to write the broken image report; must not exist yet
        #[arg(long, default_value = report::DEFAULT_REPORT_PATH)]
        report: PathBuf,

        /// Fetch and clean articles without uploading images or writing rows
        #[arg(long)]
        dry_run: bool,
    },
    /// Re-normalize the content and preview of every stored article
    Cleanup,
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = blogarc_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = blogarc_db::PoolConfig::from_app_config(&config);
    let pool = blogarc_db::connect_pool(&config.database, pool_config)
        .await
        .context("failed to connect to the database")?;
    blogarc_db::ping(&pool).await?;

    match cli.command {
        Commands::Ingest { report, dry_run } => {
            ingest::run_ingest(&pool, &config, &report, dry_run).await?;
        }
        Commands::Cleanup => {
            let updated = cleanup::run_cleanup(&pool).await?;
            println!("re-normalized {updated} articles");
        }
        Commands::Migrate => {
            blogarc_db::run_migrations(&pool).await?;
            println!("migrations applied");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
