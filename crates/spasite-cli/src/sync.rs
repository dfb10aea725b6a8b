//! Manual sync command handlers.
//!
//! The same orchestrators the server scheduler runs daily. Failures are
//! returned to `main` so the process exits non-zero.

use spasite_core::AppConfig;
use spasite_db::DocumentStore;
use spasite_places::PlacesClient;

fn places_client(config: &AppConfig) -> anyhow::Result<PlacesClient> {
    PlacesClient::new(
        &config.reviews_url,
        &config.hours_url,
        config.upstream_timeout_secs,
    )
    .map_err(|e| anyhow::anyhow!("failed to build places client: {e}"))
}

pub(crate) async fn run_sync_reviews(
    config: &AppConfig,
    store: &dyn DocumentStore,
) -> anyhow::Result<()> {
    let client = places_client(config)?;
    let summary = spasite_sync::perform_review_sync(&client, store).await?;
    println!(
        "synced {} reviews, {} approved for display",
        summary.total, summary.approved
    );
    Ok(())
}

pub(crate) async fn run_sync_hours(
    config: &AppConfig,
    store: &dyn DocumentStore,
) -> anyhow::Result<()> {
    let client = places_client(config)?;
    let summary = spasite_sync::perform_hours_sync(&client, store).await?;
    println!(
        "synced business hours: {} regular days, {} special dates",
        summary.regular_days, summary.special_days
    );
    Ok(())
}
