mod preview;
mod sync;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use spasite_core::{AppConfig, StoreBackend};
use spasite_db::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "spasite-cli")]
#[command(about = "Spa site operator command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Run a sync against the external review source now
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },
    /// Show what the public site would render
    Preview {
        #[command(subcommand)]
        command: PreviewCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the store is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Load services, promotions, gift cards and holiday labels from YAML
    Seed {
        /// Catalog file (defaults to `SPASITE_CATALOG_PATH`)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
enum SyncCommands {
    /// Fetch, filter and store reviews
    Reviews,
    /// Fetch and store business hours
    Hours,
}

#[derive(Debug, Subcommand)]
enum PreviewCommands {
    /// Services with promotional prices resolved at an instant
    Pricing {
        /// Instant to resolve at (RFC 3339 or YYYY-MM-DD); defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// Holiday notice for a day
    Holiday {
        /// Reference day (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = spasite_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("spasite-cli: no command given, see --help");
        return Ok(());
    };

    match command {
        Commands::Db { command } => run_db(&config, command).await,
        Commands::Sync { command } => {
            let store = connect_store(&config).await?;
            match command {
                SyncCommands::Reviews => sync::run_sync_reviews(&config, store.as_ref()).await,
                SyncCommands::Hours => sync::run_sync_hours(&config, store.as_ref()).await,
            }
        }
        Commands::Preview { command } => {
            let store = connect_store(&config).await?;
            match command {
                PreviewCommands::Pricing { at } => {
                    preview::run_preview_pricing(store.as_ref(), at.as_deref()).await
                }
                PreviewCommands::Holiday { date } => {
                    preview::run_preview_holiday(store.as_ref(), date.as_deref()).await
                }
            }
        }
    }
}

async fn run_db(config: &AppConfig, command: DbCommands) -> anyhow::Result<()> {
    match command {
        DbCommands::Ping => {
            let store = connect_store(config).await?;
            store.ping().await?;
            println!("store ok ({})", config.store_backend);
            Ok(())
        }
        DbCommands::Migrate => {
            let pool = connect_pool(config).await?;
            spasite_db::run_migrations(&pool).await?;
            println!("migrations applied");
            Ok(())
        }
        DbCommands::Seed { path } => {
            let path = path.unwrap_or_else(|| config.catalog_path.clone());
            let catalog = spasite_core::load_catalog(&path)?;
            let store = connect_store(config).await?;
            let summary = spasite_db::seed_catalog(store.as_ref(), &catalog).await?;
            println!(
                "seeded {} services, {} promotions, {} gift cards, {} holiday labels from {}",
                summary.services,
                summary.promotions,
                summary.gift_cards,
                summary.holiday_labels,
                path.display()
            );
            Ok(())
        }
    }
}

async fn connect_pool(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .ok_or(spasite_db::DbError::MissingDatabaseUrl)?;
    let pool_config = spasite_db::PoolConfig::from_app_config(config);
    Ok(spasite_db::connect_pool(database_url, pool_config).await?)
}

async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let pool = connect_pool(config).await?;
            spasite_db::run_migrations(&pool).await?;
            Ok(Arc::new(PgDocumentStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("SPASITE_STORE=memory: changes made by this command are discarded on exit");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
    }
}
