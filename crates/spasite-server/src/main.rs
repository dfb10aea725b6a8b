mod api;
mod identity;
mod middleware;
mod rpc;
mod scheduler;

use std::sync::Arc;

use spasite_core::StoreBackend;
use spasite_db::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
use spasite_places::PlacesClient;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AdminAuth,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = spasite_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store = connect_store(&config).await?;
    let places = Arc::new(PlacesClient::new(
        &config.reviews_url,
        &config.hours_url,
        config.upstream_timeout_secs,
    )?);
    let auth = AdminAuth::from_config(&config)?;

    let _scheduler =
        scheduler::build_scheduler(Arc::clone(&store), Arc::clone(&places), &config.sync_cron)
            .await?;

    let app = build_app(
        AppState {
            store,
            places,
            auth,
            promotion_edits: Arc::default(),
        },
        default_rate_limit_state(),
    );

    tracing::info!(bind_addr = %config.bind_addr, env = %config.env, store = %config.store_backend, "spasite-server listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn connect_store(config: &spasite_core::AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or(spasite_db::DbError::MissingDatabaseUrl)?;
            let pool_config = spasite_db::PoolConfig::from_app_config(config);
            let pool = spasite_db::connect_pool(database_url, pool_config).await?;
            spasite_db::run_migrations(&pool).await?;
            Ok(Arc::new(PgDocumentStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
